use crate::dates::DateKey;
use crate::models::{AppData, Goal, GoalRecords, GoalRequest, GoalType, RecordValue};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub const WIPE_PROMPT: &str = "Delete all goals and records?\n\nThis cannot be undone.";
pub const WIPE_FINAL_PROMPT: &str =
    "Final confirmation.\n\nEvery goal and record will be permanently deleted. Continue?";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("goal name must not be empty")]
    EmptyName,
    #[error("enter a target time in minutes")]
    MissingTarget,
    #[error("goal '{0}' not found")]
    NotFound(String),
    #[error("value does not match a {0} goal")]
    ValueMismatch(&'static str),
}

/// A validated goal definition from the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub name: String,
    pub kind: GoalType,
    pub target_time: Option<u32>,
}

impl GoalDraft {
    pub fn validate(request: GoalRequest) -> Result<Self, GoalError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(GoalError::EmptyName);
        }

        let target_time = match request.kind {
            GoalType::Boolean => None,
            GoalType::Time => match request.target_time {
                Some(minutes) if minutes > 0 => Some(minutes),
                _ => return Err(GoalError::MissingTarget),
            },
        };

        Ok(Self {
            name: name.to_string(),
            kind: request.kind,
            target_time,
        })
    }
}

impl AppData {
    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn records_for(&self, id: &str) -> Option<&GoalRecords> {
        self.records.get(id)
    }

    pub fn record(&self, id: &str, date: DateKey) -> Option<&RecordValue> {
        self.records.get(id)?.get(&date.as_key())
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(|records| records.len()).sum()
    }

    pub fn add_goal(&mut self, draft: GoalDraft, now: DateTime<Utc>) -> &Goal {
        let index = self.goals.len();
        self.goals.push(Goal {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            kind: draft.kind,
            target_time: draft.target_time,
            created_at: Some(now),
        });
        &self.goals[index]
    }

    /// Existing records keep their values even when the goal type changes.
    pub fn update_goal(&mut self, id: &str, draft: GoalDraft) -> Result<&Goal, GoalError> {
        let goal = self
            .goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or_else(|| GoalError::NotFound(id.to_string()))?;
        goal.name = draft.name;
        goal.kind = draft.kind;
        goal.target_time = draft.target_time;
        Ok(&*goal)
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<Goal, GoalError> {
        let index = self
            .goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or_else(|| GoalError::NotFound(id.to_string()))?;
        self.records.remove(id);
        Ok(self.goals.remove(index))
    }

    pub fn set_record(&mut self, id: &str, date: DateKey, value: RecordValue) -> Result<(), GoalError> {
        let kind = self
            .goal(id)
            .map(|goal| goal.kind)
            .ok_or_else(|| GoalError::NotFound(id.to_string()))?;
        match (kind, value) {
            (GoalType::Boolean, RecordValue::Minutes(_)) => {
                return Err(GoalError::ValueMismatch("boolean"));
            }
            (GoalType::Time, RecordValue::Flag(_)) => return Err(GoalError::ValueMismatch("time")),
            _ => {}
        }

        self.records
            .entry(id.to_string())
            .or_default()
            .insert(date.as_key(), value);
        Ok(())
    }

    /// Full replacement, never a merge.
    pub fn replace(&mut self, data: AppData) {
        *self = data;
    }

    pub fn clear(&mut self) {
        self.goals.clear();
        self.records.clear();
    }

    /// Clears everything only after two positive confirmations. The second
    /// prompt is skipped when the first is declined.
    pub fn clear_with_confirmation<F>(&mut self, mut confirm: F) -> bool
    where
        F: FnMut(&str) -> bool,
    {
        if !confirm(WIPE_PROMPT) || !confirm(WIPE_FINAL_PROMPT) {
            return false;
        }
        self.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_stats_at;

    fn request(name: &str, kind: GoalType, target_time: Option<u32>) -> GoalRequest {
        GoalRequest {
            name: name.to_string(),
            kind,
            target_time,
        }
    }

    fn day(value: &str) -> DateKey {
        DateKey::parse(value).unwrap()
    }

    #[test]
    fn validation_rejects_blank_name_and_missing_target() {
        assert_eq!(
            GoalDraft::validate(request("   ", GoalType::Boolean, None)),
            Err(GoalError::EmptyName)
        );
        assert_eq!(
            GoalDraft::validate(request("Read", GoalType::Time, None)),
            Err(GoalError::MissingTarget)
        );
        assert_eq!(
            GoalDraft::validate(request("Read", GoalType::Time, Some(0))),
            Err(GoalError::MissingTarget)
        );
    }

    #[test]
    fn boolean_drafts_drop_target_and_trim_name() {
        let draft = GoalDraft::validate(request("  Stretch ", GoalType::Boolean, Some(15))).unwrap();
        assert_eq!(draft.name, "Stretch");
        assert_eq!(draft.target_time, None);
    }

    #[test]
    fn goals_keep_insertion_order_and_unique_ids() {
        let mut data = AppData::default();
        let now = Utc::now();
        let first = data
            .add_goal(GoalDraft::validate(request("A", GoalType::Boolean, None)).unwrap(), now)
            .id
            .clone();
        let second = data
            .add_goal(GoalDraft::validate(request("B", GoalType::Time, Some(20))).unwrap(), now)
            .id
            .clone();
        assert_ne!(first, second);
        let names: Vec<_> = data.goals.iter().map(|goal| goal.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn delete_cascades_to_records() {
        let mut data = AppData::default();
        let draft = GoalDraft::validate(request("Run", GoalType::Boolean, None)).unwrap();
        let id = data.add_goal(draft, Utc::now()).id.clone();
        data.set_record(&id, day("2024-03-01"), RecordValue::Flag(true)).unwrap();
        assert_eq!(data.record_count(), 1);

        data.delete_goal(&id).unwrap();
        assert!(data.goals.is_empty());
        assert!(!data.records.contains_key(&id));
        let stats = compute_stats_at(day("2024-03-01"), &data, &id);
        assert_eq!((stats.streak, stats.total_achieved, stats.total_minutes), (0, 0, 0));
        assert_eq!(data.delete_goal(&id), Err(GoalError::NotFound(id.clone())));
    }

    #[test]
    fn set_record_overwrites_and_checks_kind() {
        let mut data = AppData::default();
        let draft = GoalDraft::validate(request("Read", GoalType::Time, Some(30))).unwrap();
        let id = data.add_goal(draft, Utc::now()).id.clone();
        let date = day("2024-03-01");

        data.set_record(&id, date, RecordValue::Minutes(10)).unwrap();
        data.set_record(&id, date, RecordValue::Minutes(35)).unwrap();
        assert_eq!(data.record(&id, date), Some(&RecordValue::Minutes(35)));

        assert_eq!(
            data.set_record(&id, date, RecordValue::Flag(true)),
            Err(GoalError::ValueMismatch("time"))
        );
        assert_eq!(
            data.set_record("nope", date, RecordValue::Minutes(1)),
            Err(GoalError::NotFound("nope".into()))
        );
    }

    #[test]
    fn type_edit_leaves_records_in_place() {
        let mut data = AppData::default();
        let draft = GoalDraft::validate(request("Read", GoalType::Time, Some(30))).unwrap();
        let id = data.add_goal(draft, Utc::now()).id.clone();
        data.set_record(&id, day("2024-03-01"), RecordValue::Minutes(40)).unwrap();

        let edit = GoalDraft::validate(request("Read daily", GoalType::Boolean, None)).unwrap();
        let goal = data.update_goal(&id, edit).unwrap();
        assert_eq!(goal.kind, GoalType::Boolean);
        assert_eq!(goal.target_time, None);
        assert_eq!(data.record(&id, day("2024-03-01")), Some(&RecordValue::Minutes(40)));
    }

    #[test]
    fn wipe_needs_both_confirmations() {
        let mut data = AppData::default();
        let draft = GoalDraft::validate(request("Run", GoalType::Boolean, None)).unwrap();
        data.add_goal(draft, Utc::now());

        let mut prompts = Vec::new();
        let cleared = data.clear_with_confirmation(|message| {
            prompts.push(message.to_string());
            false
        });
        assert!(!cleared);
        assert_eq!(prompts, [WIPE_PROMPT]);
        assert_eq!(data.goals.len(), 1);

        let mut answers = [true, false].into_iter();
        assert!(!data.clear_with_confirmation(|_| answers.next().unwrap_or(false)));
        assert_eq!(data.goals.len(), 1);

        assert!(data.clear_with_confirmation(|_| true));
        assert!(data.goals.is_empty());
        assert!(data.records.is_empty());
    }
}
