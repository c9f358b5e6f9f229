//! Application configuration loaded from environment variables.

use crate::errors::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Maximum number of prayer requests returned by the public feed
    pub feed_limit: u32,
    /// Insert sample events and a starter reading plan on boot
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./church.db".to_string()),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "8001".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid API_PORT".to_string()))?,
            feed_limit: env_var("FEED_LIMIT")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid FEED_LIMIT".to_string()))?,
            seed_sample_data: parse_bool(
                &env_var("SEED_SAMPLE_DATA").unwrap_or_else(|_| "true".to_string()),
            )
            .ok_or_else(|| ApiError::Config("Invalid SEED_SAMPLE_DATA".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ApiError::Config(format!("Missing env var: {key}")))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
