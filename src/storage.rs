use crate::errors::AppError;
use crate::models::AppData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/goals.json"))
}

/// Loads the store once at startup; an unreadable store starts empty.
pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AppData>(&bytes) {
            Ok(data) => {
                info!(goals = data.goals.len(), records = data.record_count(), "loaded store");
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                set_aside(path).await;
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

/// Path an unreadable store is moved to, e.g. `goals.json.corrupt`.
pub fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

async fn set_aside(path: &Path) {
    let target = corrupt_path(path);
    match fs::rename(path, &target).await {
        Ok(()) => warn!("moved unreadable data file to {}", target.display()),
        Err(err) => error!("failed to move unreadable data file aside: {err}"),
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write data file {}: {err}", path.display());
        AppError::internal(err)
    })?;
    Ok(())
}
