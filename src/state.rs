use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Owns the single in-memory store and its load/save lifecycle.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Runs `apply` on a copy of the store under the lock, writes the copy
    /// through and only then makes it live. A failed `apply` or a failed
    /// write leaves the in-memory store untouched.
    pub async fn mutate<T, F>(&self, apply: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut AppData) -> Result<T, AppError>,
    {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let output = apply(&mut next)?;
        persist_data(&self.data_path, &next).await?;
        *data = next;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalType;
    use crate::store::GoalDraft;
    use chrono::Utc;

    fn draft(name: &str) -> GoalDraft {
        GoalDraft {
            name: name.to_string(),
            kind: GoalType::Boolean,
            target_time: None,
        }
    }

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("goal_tracker_state_{tag}_{}_{nanos}", std::process::id()))
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_unchanged() {
        let dir = temp_path("dir");
        std::fs::create_dir_all(&dir).unwrap();
        let state = AppState::new(dir.clone(), AppData::default());

        let result = state
            .mutate(|data| Ok(data.add_goal(draft("Run"), Utc::now()).id.clone()))
            .await;
        let goals = state.data.lock().await.goals.len();
        let _ = std::fs::remove_dir_all(&dir);

        assert!(result.is_err());
        assert_eq!(goals, 0);
    }

    #[tokio::test]
    async fn rejected_change_is_not_applied() {
        let path = temp_path("reject");
        let state = AppState::new(path.clone(), AppData::default());

        let result: Result<(), AppError> = state
            .mutate(|data| {
                data.add_goal(draft("Run"), Utc::now());
                Err(AppError::bad_request("declined"))
            })
            .await;

        assert!(result.is_err());
        assert!(state.data.lock().await.goals.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn successful_change_is_live_and_persisted() {
        let path = temp_path("ok");
        let state = AppState::new(path.clone(), AppData::default());

        state
            .mutate(|data| {
                data.add_goal(draft("Run"), Utc::now());
                Ok(())
            })
            .await
            .unwrap();
        let on_disk: AppData = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(state.data.lock().await.goals.len(), 1);
        assert_eq!(on_disk.goals.len(), 1);
    }
}
