use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

const KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{0}', expected YYYY-MM-DD")]
pub struct DateKeyError(pub String);

/// A calendar day without time of day, keyed as `YYYY-MM-DD` in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        let trimmed = value.trim();
        if trimmed.len() != 10 {
            return Err(DateKeyError(value.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, KEY_FORMAT)
            .map(Self)
            .map_err(|_| DateKeyError(value.to_string()))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn as_key(self) -> String {
        self.0.format(KEY_FORMAT).to_string()
    }

    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// 0 = Sunday through 6 = Saturday.
    pub fn weekday_from_sunday(self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// Steps by whole months, clamping the day to the target month's length.
    pub fn add_months(self, months: i32) -> Option<Self> {
        let step = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(step)
        } else {
            self.0.checked_sub_months(step)
        };
        shifted.map(Self)
    }

    /// Feb 29 lands on Feb 28 in non-leap years.
    pub fn add_years(self, years: i32) -> Option<Self> {
        self.add_months(years.checked_mul(12)?)
    }

    /// Label for the day navigator, e.g. `2026/10/17 (Sat)`.
    pub fn display_label(self) -> String {
        self.0.format("%Y/%-m/%-d (%a)").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Every day of the given month in order; empty for an out-of-range month.
pub fn month_days(year: i32, month: u32) -> Vec<DateKey> {
    (1..=days_in_month(year, month))
        .filter_map(|day| DateKey::from_ymd(year, month, day))
        .collect()
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> DateKey {
        DateKey::parse(value).unwrap()
    }

    #[test]
    fn parse_and_format_are_canonical() {
        let date = key("2024-02-09");
        assert_eq!(date.as_key(), "2024-02-09");
        assert_eq!(date.to_string(), "2024-02-09");
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 9));
    }

    #[test]
    fn parse_rejects_other_shapes() {
        assert!(DateKey::parse("2024-2-9").is_err());
        assert!(DateKey::parse("2024-02-30").is_err());
        assert!(DateKey::parse("2024-02-09T10:00:00Z").is_err());
        assert!(DateKey::parse("").is_err());
        assert!("not-a-date".parse::<DateKey>().is_err());
    }

    #[test]
    fn february_length_follows_leap_years() {
        assert_eq!(month_days(2024, 2).len(), 29);
        assert_eq!(month_days(2023, 2).len(), 28);
        assert_eq!(month_days(2000, 2).len(), 29);
        assert_eq!(month_days(1900, 2).len(), 28);
        assert_eq!(month_days(2024, 13).len(), 0);
    }

    #[test]
    fn month_steps_clamp_to_month_end() {
        assert_eq!(key("2024-01-31").add_months(1), Some(key("2024-02-29")));
        assert_eq!(key("2023-01-31").add_months(1), Some(key("2023-02-28")));
        assert_eq!(key("2024-03-31").add_months(-1), Some(key("2024-02-29")));
        assert_eq!(key("2024-12-15").add_months(1), Some(key("2025-01-15")));
    }

    #[test]
    fn year_steps_clamp_leap_day() {
        assert_eq!(key("2024-02-29").add_years(1), Some(key("2025-02-28")));
        assert_eq!(key("2024-06-10").add_years(-1), Some(key("2023-06-10")));
    }

    #[test]
    fn weekday_counts_from_sunday() {
        // 2024-09-01 was a Sunday, 2026-10-17 a Saturday.
        assert_eq!(key("2024-09-01").weekday_from_sunday(), 0);
        assert_eq!(key("2026-10-17").weekday_from_sunday(), 6);
    }

    #[test]
    fn neighbours_and_label() {
        let date = key("2024-03-01");
        assert_eq!(date.pred(), Some(key("2024-02-29")));
        assert_eq!(date.succ(), Some(key("2024-03-02")));
        assert_eq!(key("2026-10-17").display_label(), "2026/10/17 (Sat)");
    }
}
