use crate::models::{Goal, GoalType, RecordValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Achieved,
    Partial,
    Missed,
}

impl Status {
    pub fn is_achieved(self) -> bool {
        self == Self::Achieved
    }
}

/// Classifies one day's value against the goal's current type and target.
///
/// Boolean goals never report `Partial`. A value of the other kind, left
/// behind by a type edit, classifies as if the day had no entry.
pub fn classify(goal: &Goal, value: Option<&RecordValue>) -> Status {
    match goal.kind {
        GoalType::Boolean => match value {
            Some(RecordValue::Flag(true)) => Status::Achieved,
            _ => Status::Missed,
        },
        GoalType::Time => match value.and_then(|value| value.minutes()) {
            None => Status::Missed,
            Some(minutes) if minutes >= goal.target_time.unwrap_or(0) => Status::Achieved,
            Some(_) => Status::Partial,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(kind: GoalType, target_time: Option<u32>) -> Goal {
        Goal {
            id: "g".into(),
            name: "goal".into(),
            kind,
            target_time,
            created_at: None,
        }
    }

    #[test]
    fn boolean_goals_are_achieved_only_on_true() {
        let g = goal(GoalType::Boolean, None);
        assert_eq!(classify(&g, Some(&RecordValue::Flag(true))), Status::Achieved);
        assert_eq!(classify(&g, Some(&RecordValue::Flag(false))), Status::Missed);
        assert_eq!(classify(&g, None), Status::Missed);
        assert_eq!(classify(&g, Some(&RecordValue::Empty)), Status::Missed);
        assert_eq!(classify(&g, Some(&RecordValue::Minutes(90))), Status::Missed);
    }

    #[test]
    fn time_goals_compare_against_target() {
        let g = goal(GoalType::Time, Some(30));
        assert_eq!(classify(&g, Some(&RecordValue::Minutes(30))), Status::Achieved);
        assert_eq!(classify(&g, Some(&RecordValue::Minutes(45))), Status::Achieved);
        assert_eq!(classify(&g, Some(&RecordValue::Minutes(25))), Status::Partial);
        assert_eq!(classify(&g, Some(&RecordValue::Minutes(0))), Status::Partial);
        assert_eq!(classify(&g, None), Status::Missed);
        assert_eq!(classify(&g, Some(&RecordValue::Empty)), Status::Missed);
    }

    #[test]
    fn stale_flag_on_time_goal_is_missed() {
        let g = goal(GoalType::Time, Some(30));
        assert_eq!(classify(&g, Some(&RecordValue::Flag(true))), Status::Missed);
    }
}
