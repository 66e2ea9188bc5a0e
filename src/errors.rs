use crate::codec::ImportError;
use crate::dates::DateKeyError;
use crate::store::GoalError;
use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<GoalError> for AppError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::NotFound(_) => Self::not_found(err.to_string()),
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        Self::bad_request(format!("Could not read the backup file: {err}"))
    }
}

impl From<DateKeyError> for AppError {
    fn from(err: DateKeyError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
