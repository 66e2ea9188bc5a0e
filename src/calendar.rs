use crate::dates::{DateKey, month_days, month_name};
use crate::models::{Goal, GoalRecords, GoalType};
use crate::status::{Status, classify};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: DateKey,
    pub day: u32,
    pub status: Status,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub label: String,
    /// Empty cells before day 1 in a Sunday-first week grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub achieved: u32,
    pub partial: u32,
    pub total_minutes: u64,
    pub total_days: u32,
    pub achievement_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub mode: ViewMode,
    pub reference: DateKey,
    pub label: String,
    pub previous: Option<DateKey>,
    pub next: Option<DateKey>,
    pub stats: PeriodStats,
    pub months: Vec<MonthView>,
}

pub fn month_view(
    goal: &Goal,
    records: Option<&GoalRecords>,
    year: i32,
    month: u32,
    today: DateKey,
) -> MonthView {
    let dates = month_days(year, month);
    let leading_blanks = dates.first().map_or(0, |first| first.weekday_from_sunday());
    let days = dates
        .into_iter()
        .map(|date| CalendarDay {
            date,
            day: date.day(),
            status: classify(goal, records.and_then(|records| records.get(&date.as_key()))),
            is_today: date == today,
        })
        .collect();

    MonthView {
        year,
        month,
        label: format!("{} {year}", month_name(month)),
        leading_blanks,
        days,
    }
}

pub fn year_view(goal: &Goal, records: Option<&GoalRecords>, year: i32, today: DateKey) -> Vec<MonthView> {
    (1..=12)
        .map(|month| month_view(goal, records, year, month, today))
        .collect()
}

pub fn period_stats<'a, I>(goal: &Goal, records: Option<&GoalRecords>, days: I) -> PeriodStats
where
    I: IntoIterator<Item = &'a DateKey>,
{
    let mut stats = PeriodStats::default();
    let target = goal.target_time.unwrap_or(0);

    for date in days {
        stats.total_days += 1;
        let value = records.and_then(|records| records.get(&date.as_key()));
        if classify(goal, value).is_achieved() {
            stats.achieved += 1;
        }
        if goal.kind != GoalType::Time {
            continue;
        }
        if let Some(minutes) = value.and_then(|value| value.minutes()) {
            if minutes > 0 && minutes < target {
                stats.partial += 1;
            }
            stats.total_minutes = stats.total_minutes.saturating_add(u64::from(minutes));
        }
    }

    stats.achievement_rate = achievement_rate(stats.achieved, stats.total_days);
    stats
}

/// Whole-number percentage, rounding halves up.
pub fn achievement_rate(achieved: u32, total_days: u32) -> u32 {
    if total_days == 0 {
        return 0;
    }
    let achieved = u64::from(achieved);
    let total = u64::from(total_days);
    ((achieved * 200 + total) / (total * 2)) as u32
}

/// Moves the reference date one period in `direction` (negative for back).
pub fn step(mode: ViewMode, reference: DateKey, direction: i32) -> Option<DateKey> {
    match mode {
        ViewMode::Month => reference.add_months(direction),
        ViewMode::Year => reference.add_years(direction),
    }
}

pub fn history(
    goal: &Goal,
    records: Option<&GoalRecords>,
    mode: ViewMode,
    reference: DateKey,
    today: DateKey,
) -> HistoryView {
    let (label, months) = match mode {
        ViewMode::Month => {
            let view = month_view(goal, records, reference.year(), reference.month(), today);
            (view.label.clone(), vec![view])
        }
        ViewMode::Year => (
            reference.year().to_string(),
            year_view(goal, records, reference.year(), today),
        ),
    };

    let stats = period_stats(
        goal,
        records,
        months.iter().flat_map(|month| month.days.iter().map(|day| &day.date)),
    );

    HistoryView {
        mode,
        reference,
        label,
        previous: step(mode, reference, -1),
        next: step(mode, reference, 1),
        stats,
        months,
    }
}
