//! Client-wide error types.

use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid submission: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar access was denied")]
    CalendarPermission,

    #[error("No calendar available on this device")]
    NoCalendar,

    #[error("Calendar error: {0}")]
    Calendar(String),
}

impl BoardError {
    /// Whether repeating the same action may succeed. Validation and
    /// permission failures need the user to change something first.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Calendar(_) => true,
            Self::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Json(_)
            | Self::Validation(_)
            | Self::Url(_)
            | Self::Config(_)
            | Self::CalendarPermission
            | Self::NoCalendar => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
