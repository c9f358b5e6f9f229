//! Client configuration loaded from environment variables.
//!
//! The configuration is built once at startup and shared read-only
//! (usually behind an `Arc`) with every screen that needs it.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

use crate::errors::{BoardError, Result};

pub const DEFAULT_VENUE_ADDRESS: &str = "R. Sete de Setembro, 451, São João dos Patos - MA";
pub const DEFAULT_VENUE_TIMEZONE: &str = "America/Fortaleza";
pub const DEFAULT_VENUE_UTC_OFFSET_HOURS: i32 = -3;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the church API, without the `/api` suffix
    pub backend_url: String,
    /// Optional per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Where the church meets
    pub venue: Venue,
    /// Length of calendar entries created from the schedule
    pub calendar_event_duration: chrono::Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub address: String,
    /// IANA zone name handed to the device calendar
    pub timezone: String,
    /// Offset used to place local service times on the timeline
    pub utc_offset: FixedOffset,
}

impl Default for Venue {
    fn default() -> Self {
        Self {
            address: DEFAULT_VENUE_ADDRESS.to_string(),
            timezone: DEFAULT_VENUE_TIMEZONE.to_string(),
            utc_offset: fixed_offset(DEFAULT_VENUE_UTC_OFFSET_HOURS).unwrap_or(Utc.fix()),
        }
    }
}

impl ClientConfig {
    /// A configuration pointing at `backend_url` with every other knob at its default.
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            request_timeout: None,
            venue: Venue::default(),
            calendar_event_duration: chrono::Duration::hours(2),
        }
    }

    pub fn from_env() -> Result<Self> {
        let backend_url = env_var("BACKEND_URL").map_err(|_| {
            BoardError::Config("BACKEND_URL environment variable is required".to_string())
        })?;

        let mut config = Self::new(backend_url);

        if let Ok(raw) = env_var("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| BoardError::Config("Invalid REQUEST_TIMEOUT_SECS".to_string()))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Ok(address) = env_var("VENUE_ADDRESS") {
            config.venue.address = address;
        }
        if let Ok(timezone) = env_var("VENUE_TIMEZONE") {
            config.venue.timezone = timezone;
        }
        if let Ok(raw) = env_var("VENUE_UTC_OFFSET_HOURS") {
            config.venue.utc_offset = raw
                .parse()
                .ok()
                .and_then(fixed_offset)
                .ok_or_else(|| BoardError::Config("Invalid VENUE_UTC_OFFSET_HOURS".to_string()))?;
        }
        config.calendar_event_duration = chrono::Duration::hours(
            env_var("CALENDAR_EVENT_HOURS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .map_err(|_| BoardError::Config("Invalid CALENDAR_EVENT_HOURS".to_string()))?,
        );

        Ok(config)
    }

    /// Absolute URL for an API path such as `/prayer-requests`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{path}", self.backend_url)
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| BoardError::Config(format!("Missing env var: {key}")))
}

fn fixed_offset(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}
