//! The seam between the board and whatever persists prayer requests.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{NewPrayerRequest, PrayerRequest};

/// Backend that owns prayer requests and decides what the public feed shows.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// The public feed, in the order the store wants it rendered.
    async fn list_prayer_requests(&self) -> Result<Vec<PrayerRequest>>;

    /// Create a request. The store assigns `id` and `created_at`.
    ///
    /// `Ok(None)` means the store accepted the request but its echo of the
    /// stored record could not be read. The request still counts as sent.
    async fn create_prayer_request(
        &self,
        request: &NewPrayerRequest,
    ) -> Result<Option<PrayerRequest>>;
}
