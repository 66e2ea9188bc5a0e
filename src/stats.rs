use crate::dates::DateKey;
use crate::models::{AppData, Goal, GoalRecords, GoalType};
use crate::status::classify;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalStats {
    pub streak: u32,
    pub total_achieved: u32,
    pub total_minutes: u64,
}

pub fn compute_stats(data: &AppData, goal_id: &str) -> GoalStats {
    compute_stats_at(DateKey::today(), data, goal_id)
}

/// Zeroed stats for a goal id that does not resolve.
pub fn compute_stats_at(today: DateKey, data: &AppData, goal_id: &str) -> GoalStats {
    match data.goal(goal_id) {
        Some(goal) => goal_stats(goal, data.records_for(goal_id), today),
        None => GoalStats::default(),
    }
}

pub fn goal_stats(goal: &Goal, records: Option<&GoalRecords>, today: DateKey) -> GoalStats {
    let Some(records) = records else {
        return GoalStats::default();
    };

    let mut total_achieved = 0u32;
    let mut total_minutes = 0u64;
    for value in records.values() {
        if classify(goal, Some(value)).is_achieved() {
            total_achieved = total_achieved.saturating_add(1);
        }
        if goal.kind == GoalType::Time {
            if let Some(minutes) = value.minutes() {
                total_minutes = total_minutes.saturating_add(u64::from(minutes));
            }
        }
    }

    GoalStats {
        streak: streak(goal, records, today),
        total_achieved,
        total_minutes,
    }
}

/// Consecutive achieved days ending today. A miss today is forgiven once:
/// the count then starts from yesterday, since today is not over yet.
pub fn streak(goal: &Goal, records: &GoalRecords, today: DateKey) -> u32 {
    let achieved = |day: DateKey| classify(goal, records.get(&day.as_key())).is_achieved();

    let mut cursor = if achieved(today) { Some(today) } else { today.pred() };
    let mut streak = 0u32;
    while let Some(day) = cursor {
        if !achieved(day) {
            break;
        }
        streak = streak.saturating_add(1);
        cursor = day.pred();
    }
    streak
}
