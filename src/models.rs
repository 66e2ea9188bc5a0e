use crate::calendar::{MonthView, PeriodStats, ViewMode};
use crate::dates::DateKey;
use crate::stats::GoalStats;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub const STORE_VERSION: u32 = 1;

/// Per-goal record maps: goal id -> `YYYY-MM-DD` -> value.
pub type Records = BTreeMap<String, GoalRecords>;
pub type GoalRecords = BTreeMap<String, RecordValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Boolean,
    Time,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    #[serde(default)]
    pub target_time: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A day's logged value. `Empty` is a cleared entry and reads like no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Flag(bool),
    Minutes(u32),
    Empty,
}

impl RecordValue {
    pub fn minutes(self) -> Option<u32> {
        match self {
            Self::Minutes(minutes) => Some(minutes),
            _ => None,
        }
    }
}

/// Reads record maps one value at a time. A value that is not a flag, a
/// non-negative whole number of minutes or `null` is dropped with a warning
/// so it cannot take the rest of the document down with it.
pub fn deserialize_records<'de, D>(deserializer: D) -> Result<Records, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, BTreeMap<String, Value>>::deserialize(deserializer)?;
    let records = raw
        .into_iter()
        .map(|(goal_id, days)| {
            let days = days
                .into_iter()
                .filter_map(|(date, value)| match RecordValue::deserialize(&value) {
                    Ok(parsed) => Some((date, parsed)),
                    Err(_) => {
                        warn!(goal_id = %goal_id, date = %date, value = %value, "dropping invalid record value");
                        None
                    }
                })
                .collect();
            (goal_id, days)
        })
        .collect();
    Ok(records)
}

fn store_version() -> u32 {
    STORE_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default = "store_version")]
    pub version: u32,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default, deserialize_with = "deserialize_records")]
    pub records: Records,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            goals: Vec::new(),
            records: Records::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    #[serde(default, alias = "targetTime")]
    pub target_time: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub value: RecordValue,
}

#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub mode: Option<ViewMode>,
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WipeRequest {
    #[serde(default)]
    pub confirm: bool,
    #[serde(default)]
    pub confirm_final: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoalDayView {
    pub goal: Goal,
    pub value: Option<RecordValue>,
    pub status: Status,
    pub stats: GoalStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayResponse {
    pub date: DateKey,
    pub label: String,
    pub is_today: bool,
    pub previous: Option<DateKey>,
    pub next: Option<DateKey>,
    pub goals: Vec<GoalDayView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub goal: Goal,
    pub mode: ViewMode,
    pub reference: DateKey,
    pub label: String,
    pub previous: Option<DateKey>,
    pub next: Option<DateKey>,
    pub stats: PeriodStats,
    pub months: Vec<MonthView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_uses_camel_case_layout() {
        let goal = Goal {
            id: "1700000000000".into(),
            name: "Read".into(),
            kind: GoalType::Time,
            target_time: Some(30),
            created_at: None,
        };
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["type"], "time");
        assert_eq!(json["targetTime"], 30);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn record_values_map_to_plain_json() {
        let parsed: GoalRecords =
            serde_json::from_str(r#"{"2024-01-01": true, "2024-01-02": 25, "2024-01-03": null}"#)
                .unwrap();
        assert_eq!(parsed["2024-01-01"], RecordValue::Flag(true));
        assert_eq!(parsed["2024-01-02"], RecordValue::Minutes(25));
        assert_eq!(parsed["2024-01-03"], RecordValue::Empty);
        assert_eq!(serde_json::to_string(&RecordValue::Empty).unwrap(), "null");
    }

    #[test]
    fn invalid_record_values_are_dropped_individually() {
        let data: AppData = serde_json::from_str(
            r#"{
                "goals": [{"id": "g1", "name": "Read", "type": "time", "targetTime": 30}],
                "records": {"g1": {"2024-01-01": -5, "2024-01-02": 40, "2024-01-03": 12.5, "2024-01-04": "x"}}
            }"#,
        )
        .unwrap();
        assert_eq!(data.goals.len(), 1);
        assert_eq!(data.records["g1"].len(), 1);
        assert_eq!(data.records["g1"]["2024-01-02"], RecordValue::Minutes(40));
    }

    #[test]
    fn live_store_tolerates_missing_fields() {
        let data: AppData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, AppData::default());
    }
}
