//! # PIB do Cordeiro client core
//!
//! Everything the church app does beyond drawing pixels:
//!
//! | Concern           | Module                                   |
//! |-------------------|------------------------------------------|
//! | Prayer board      | [`board`], [`validation`], [`presentation`] |
//! | Backend access    | [`store`], [`http`]                      |
//! | Read-only screens | [`screens`], [`schedule`]                |
//! | Device actions    | [`integrations`]                         |
//! | Setup             | [`config`], [`errors`]                   |
//!
//! The prayer board submits requests that then wait for moderation; only
//! approved public requests come back in the feed. The board never decides
//! visibility itself.

pub mod board;
pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod models;
pub mod presentation;
pub mod schedule;
pub mod screens;
pub mod store;
pub mod validation;

pub use board::{FeedState, PrayerBoard, SubmitOutcome};
pub use config::ClientConfig;
pub use errors::{BoardError, Result};
pub use http::ApiClient;
pub use models::{NewPrayerRequest, PrayerRequest, RequestStatus};
pub use presentation::{BoardView, PrayerCard};
pub use store::RequestStore;
pub use validation::{SubmissionForm, ValidationError};

/// Load `.env` (if any) and build the client configuration.
pub fn config_from_env() -> Result<ClientConfig> {
    let _ = dotenvy::dotenv();
    ClientConfig::from_env()
}
