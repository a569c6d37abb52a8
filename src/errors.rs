use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the tracker core.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("task service request failed: {0}")]
    Transport(String),

    #[error("state store failure: {0}")]
    Store(String),

    #[error("a submission is already in progress")]
    SubmissionInFlight,

    #[error("no submission is awaiting confirmation")]
    NoPendingConfirmation,
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(err.to_string())
    }
}

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
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        let status = match err {
            TrackerError::Transport(_) => StatusCode::BAD_GATEWAY,
            TrackerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TrackerError::SubmissionInFlight | TrackerError::NoPendingConfirmation => {
                StatusCode::CONFLICT
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
