//! HTTP client for the church API.
//!
//! Every call is a single request: there is no retry and, unless
//! `REQUEST_TIMEOUT_SECS` is set, no timeout. Callers decide how a failure
//! is shown (see [`crate::screens`] for the read side and
//! [`crate::board`] for submissions).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::{BoardError, Result};
use crate::models::{
    ChurchInfo, Event, MediaLinks, Ministry, NewPrayerRequest, PrayerRequest, ReadingPlan,
};
use crate::store::RequestStore;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(config: Arc<ClientConfig>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    /// Reuse an existing `reqwest` client (connection pool, proxies...).
    pub fn with_client(client: Client, config: Arc<ClientConfig>) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /api/events`
    pub async fn events(&self) -> Result<Vec<Event>> {
        self.get_json("/events").await
    }

    /// `GET /api/events/next`, `None` when nothing is scheduled.
    pub async fn next_event(&self) -> Result<Option<Event>> {
        self.get_json("/events/next").await
    }

    /// `GET /api/church-info`
    pub async fn church_info(&self) -> Result<ChurchInfo> {
        self.get_json("/church-info").await
    }

    /// `GET /api/ministries`
    pub async fn ministries(&self) -> Result<Vec<Ministry>> {
        self.get_json("/ministries").await
    }

    /// `GET /api/media-links`
    pub async fn media_links(&self) -> Result<MediaLinks> {
        self.get_json("/media-links").await
    }

    /// `GET /api/reading-plan/today`, `None` when today has no entry.
    pub async fn today_reading(&self) -> Result<Option<ReadingPlan>> {
        self.get_json("/reading-plan/today").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.api_url(path);
        let response = self.client.get(&url).send().await?;
        decode(response, &url).await
    }
}

fn ensure_success(response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(BoardError::Status(status))
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
    ensure_success(&response)?;
    let status = response.status();
    let body = response.bytes().await?;
    debug!("{url} -> {status} ({} bytes)", body.len());
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl RequestStore for ApiClient {
    async fn list_prayer_requests(&self) -> Result<Vec<PrayerRequest>> {
        self.get_json("/prayer-requests").await
    }

    /// Any 2xx status means the request was stored, whatever the body says.
    async fn create_prayer_request(
        &self,
        request: &NewPrayerRequest,
    ) -> Result<Option<PrayerRequest>> {
        let url = self.config.api_url("/prayer-requests");
        let response = self.client.post(&url).json(request).send().await?;
        ensure_success(&response)?;

        match decode(response, &url).await {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                warn!("{url} accepted the prayer request but the reply was unreadable: {e}");
                Ok(None)
            }
        }
    }
}
