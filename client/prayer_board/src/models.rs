//! Data served by the church API, as seen by the client.
//!
//! ## Prayer request status
//!
//! The API describes moderation state with independent boolean flags. The
//! client folds them into [`RequestStatus`] so that a request can never be
//! both "answered" and "not approved" once it has been decoded:
//!
//! ```text
//! Pending ──► Approved ──► Answered { testimony }
//!     └──► Rejected
//! ```
//!
//! Every transition past `Pending` belongs to the moderators; the client only
//! observes the result.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Moderation state of a prayer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    /// Waiting for a moderator.
    Pending,
    /// Eligible for the public feed when the submitter made it public.
    Approved,
    /// Approved and answered. The testimony may be missing.
    Answered { testimony: Option<String> },
    /// Discarded by a moderator. The public feed never carries these, so the
    /// client only ever notices a rejection as an absence.
    Rejected,
}

impl RequestStatus {
    /// Fold the wire flags into a status.
    ///
    /// `is_answered` wins over `is_approved`: an answered request is shown as
    /// answered even if the server forgot to mark it approved. Blank
    /// testimony text counts as no testimony, and testimony on a request that
    /// is not answered is ignored.
    pub fn from_flags(is_approved: bool, is_answered: bool, testimony: Option<String>) -> Self {
        let testimony = testimony.filter(|t| !t.trim().is_empty());
        match (is_approved, is_answered) {
            (_, true) => Self::Answered { testimony },
            (true, false) => Self::Approved,
            (false, false) => Self::Pending,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }

    pub fn testimony(&self) -> Option<&str> {
        match self {
            Self::Answered { testimony } => testimony.as_deref(),
            _ => None,
        }
    }

    /// No further moderator action is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Answered { .. } | Self::Rejected)
    }
}

/// A prayer request as served by `GET /api/prayer-requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PrayerRequestRecord", into = "PrayerRequestRecord")]
pub struct PrayerRequest {
    pub id: String,
    pub name: String,
    pub message: String,
    pub is_public: bool,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// The flag-based JSON shape used on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerRequestRecord {
    pub id: String,
    pub name: String,
    pub message: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_answered: bool,
    #[serde(default)]
    pub testimony: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_public() -> bool {
    true
}

impl From<PrayerRequestRecord> for PrayerRequest {
    fn from(record: PrayerRequestRecord) -> Self {
        if record.is_answered && !record.is_approved {
            warn!(
                "Prayer request {} is answered but not approved; showing it as answered",
                record.id
            );
        }
        Self {
            status: RequestStatus::from_flags(
                record.is_approved,
                record.is_answered,
                record.testimony,
            ),
            id: record.id,
            name: record.name,
            message: record.message,
            is_public: record.is_public,
            created_at: record.created_at,
        }
    }
}

impl From<PrayerRequest> for PrayerRequestRecord {
    fn from(request: PrayerRequest) -> Self {
        let (is_approved, is_answered, testimony) = match request.status {
            RequestStatus::Pending | RequestStatus::Rejected => (false, false, None),
            RequestStatus::Approved => (true, false, None),
            RequestStatus::Answered { testimony } => (true, true, testimony),
        };
        Self {
            id: request.id,
            name: request.name,
            message: request.message,
            is_public: request.is_public,
            is_approved,
            is_answered,
            testimony,
            created_at: request.created_at,
        }
    }
}

/// Body of `POST /api/prayer-requests`. Built by
/// [`SubmissionForm::validate`](crate::validation::SubmissionForm::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrayerRequest {
    pub name: String,
    pub message: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    /// Local start time, `HH:MM`
    pub time: String,
    pub location: String,
    /// `culto`, `reuniao`, `estudo`, `evento`...
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurchInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub instagram: String,
    pub maps_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ministry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub leader: String,
    pub contact: String,
    pub schedule: String,
    pub whatsapp_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLinks {
    pub pregacoes: String,
    pub estudos: String,
    pub videos: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingPlan {
    pub id: String,
    pub day: u32,
    pub book: String,
    pub chapters: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
}

/// Accept RFC 3339 timestamps and offset-less ISO-8601 ones (read as UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(approved: bool, answered: bool, testimony: Option<&str>) -> serde_json::Value {
        json!({
            "id": "p1",
            "name": "Maria",
            "message": "Pray for health",
            "is_public": true,
            "is_approved": approved,
            "is_answered": answered,
            "testimony": testimony,
            "created_at": "2024-03-10T12:30:00Z",
        })
    }

    #[test]
    fn flags_fold_into_status() {
        let approved: PrayerRequest = serde_json::from_value(record(true, false, None)).unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);

        let pending: PrayerRequest = serde_json::from_value(record(false, false, None)).unwrap();
        assert_eq!(pending.status, RequestStatus::Pending);

        let answered: PrayerRequest =
            serde_json::from_value(record(true, true, Some("Curada"))).unwrap();
        assert_eq!(
            answered.status,
            RequestStatus::Answered {
                testimony: Some("Curada".to_string())
            }
        );
    }

    #[test]
    fn answered_without_approval_is_still_answered() {
        let req: PrayerRequest = serde_json::from_value(record(false, true, None)).unwrap();
        assert_eq!(req.status, RequestStatus::Answered { testimony: None });
    }

    #[test]
    fn stray_or_blank_testimony_is_dropped() {
        let stray: PrayerRequest =
            serde_json::from_value(record(true, false, Some("early"))).unwrap();
        assert_eq!(stray.status.testimony(), None);

        let blank: PrayerRequest = serde_json::from_value(record(true, true, Some("  "))).unwrap();
        assert!(blank.status.is_answered());
        assert_eq!(blank.status.testimony(), None);
    }

    #[test]
    fn status_serializes_back_to_flags() {
        let req: PrayerRequest = serde_json::from_value(record(true, true, Some("X"))).unwrap();
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["is_approved"], true);
        assert_eq!(value["is_answered"], true);
        assert_eq!(value["testimony"], "X");
        assert!(value.get("status").is_none());
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        let mut value = record(true, false, None);
        value["created_at"] = json!("2024-03-10T12:30:00.123456");
        let req: PrayerRequest = serde_json::from_value(value).unwrap();
        assert_eq!(req.created_at.timestamp(), 1_710_073_800);
    }

    #[test]
    fn event_type_field_is_renamed() {
        let ev: Event = serde_json::from_value(json!({
            "id": "e1",
            "title": "Culto de Domingo",
            "description": "Culto de adoração e palavra",
            "date": "2024-03-10T19:30:00Z",
            "time": "19:30",
            "location": "Igreja PIB do Cordeiro",
            "type": "culto",
        }))
        .unwrap();
        assert_eq!(ev.kind, "culto");
    }

    #[test]
    fn terminal_states() {
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Answered { testimony: None }.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
    }
}
