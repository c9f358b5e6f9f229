//! Records served by the church API and the prayer-request moderation lifecycle.
//!
//! ## Prayer request lifecycle
//!
//! ```text
//! Pending ──► Approved ──► Answered
//!     └──► Rejected
//! ```
//!
//! Only moderators move a request past `Pending`. `Rejected` and `Answered`
//! are terminal. A rejected request is never served by the public feed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, Result};

pub const NAME_MAX_CHARS: usize = 100;
pub const MESSAGE_MAX_CHARS: usize = 500;
pub const DEFAULT_LOCATION: &str = "Igreja PIB do Cordeiro";

/// Moderation state of a prayer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted, waiting for a moderator.
    Pending,
    /// Visible on the public feed when the submitter made it public.
    Approved,
    /// Approved and later marked as answered, optionally with a testimony.
    Answered,
    /// Discarded by a moderator; never surfaced.
    Rejected,
}

impl RequestStatus {
    /// Rebuild the status from the stored flag columns.
    pub fn from_flags(is_approved: bool, is_answered: bool, is_rejected: bool) -> Self {
        match (is_rejected, is_answered, is_approved) {
            (true, _, _) => Self::Rejected,
            (false, true, _) => Self::Answered,
            (false, false, true) => Self::Approved,
            (false, false, false) => Self::Pending,
        }
    }

    /// Forward-only transitions: Pending -> Approved | Rejected, Approved -> Answered.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Answered)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Answered => "answered",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prayer request as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PrayerRequest {
    pub id: String,
    pub name: String,
    pub message: String,
    pub is_public: bool,
    pub is_approved: bool,
    pub is_answered: bool,
    #[serde(skip)]
    pub is_rejected: bool,
    pub testimony: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PrayerRequest {
    pub fn status(&self) -> RequestStatus {
        RequestStatus::from_flags(self.is_approved, self.is_answered, self.is_rejected)
    }
}

/// Body of `POST /api/prayer-requests`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPrayerRequest {
    pub name: String,
    pub message: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

impl NewPrayerRequest {
    /// Trim both fields and enforce the non-empty and length rules.
    pub fn validated(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        let message = self.message.trim().to_string();

        if name.is_empty() {
            return Err(ApiError::Validation("name is required".to_string()));
        }
        if message.is_empty() {
            return Err(ApiError::Validation("message is required".to_string()));
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(ApiError::Validation(format!(
                "name exceeds {NAME_MAX_CHARS} characters"
            )));
        }
        if message.chars().count() > MESSAGE_MAX_CHARS {
            return Err(ApiError::Validation(format!(
                "message exceeds {MESSAGE_MAX_CHARS} characters"
            )));
        }

        Ok(Self {
            name,
            message,
            is_public: self.is_public,
        })
    }
}

/// Query string of `PATCH /api/prayer-requests/:id/answer`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerParams {
    pub testimony: Option<String>,
}

/// A special church event (services, meetings, studies).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

/// Body of `POST /api/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub time: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

/// One day of the yearly Bible reading plan.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReadingPlan {
    pub id: String,
    pub day: i64,
    pub book: String,
    pub chapters: String,
    pub date: DateTime<Utc>,
}
