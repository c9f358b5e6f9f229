//! Read-only screens and the task that loads them.
//!
//! Screen data is nice-to-have: a failed fetch is logged and the screen falls
//! back to its placeholder. The prayer board is the exception and keeps
//! failures visible (see [`crate::board::FeedState`]).

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::http::ApiClient;
use crate::models::{ChurchInfo, Event, MediaLinks, Ministry, ReadingPlan};
use crate::schedule::{ScheduleDay, WEEKLY_SCHEDULE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeScreen {
    pub next_event: Option<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaScreen {
    pub weekly: &'static [ScheduleDay],
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinistriesScreen {
    pub ministries: Vec<Ministry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaScreen {
    pub links: Option<MediaLinks>,
    pub today_reading: Option<ReadingPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactScreen {
    pub church: Option<ChurchInfo>,
}

pub async fn load_home(api: &ApiClient) -> HomeScreen {
    HomeScreen {
        next_event: or_placeholder(api.next_event().await, "next event"),
    }
}

pub async fn load_agenda(api: &ApiClient) -> AgendaScreen {
    AgendaScreen {
        weekly: &WEEKLY_SCHEDULE,
        events: or_placeholder(api.events().await, "events"),
    }
}

pub async fn load_ministries(api: &ApiClient) -> MinistriesScreen {
    MinistriesScreen {
        ministries: or_placeholder(api.ministries().await, "ministries"),
    }
}

pub async fn load_media(api: &ApiClient) -> MediaScreen {
    let (links, reading) = tokio::join!(api.media_links(), api.today_reading());
    MediaScreen {
        links: or_placeholder(links.map(Some), "media links"),
        today_reading: or_placeholder(reading, "today's reading"),
    }
}

pub async fn load_contact(api: &ApiClient) -> ContactScreen {
    ContactScreen {
        church: or_placeholder(api.church_info().await.map(Some), "church info"),
    }
}

fn or_placeholder<T: Default>(result: Result<T>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!("Could not load {what}: {e}");
        T::default()
    })
}

/// A fetch tied to a screen's lifetime.
///
/// Cancelling the task, or dropping it when the screen goes away, stops the
/// fetch and discards whatever it would have produced.
#[derive(Debug)]
pub struct ScreenTask<T> {
    token: CancellationToken,
    handle: Option<JoinHandle<Option<T>>>,
}

impl<T: Send + 'static> ScreenTask<T> {
    pub fn spawn<F>(fetch: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    debug!("Screen fetch cancelled");
                    None
                }
                value = fetch => Some(value),
            }
        });
        Self {
            token,
            handle: Some(handle),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the result. `None` when the task was cancelled first.
    pub async fn join(mut self) -> Option<T> {
        let handle = self.handle.take()?;
        handle.await.ok().flatten()
    }
}

impl<T> Drop for ScreenTask<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn finished_fetch_is_delivered() {
        let task = ScreenTask::spawn(async { 7 });
        assert_eq!(task.join().await, Some(7));
    }

    #[tokio::test]
    async fn cancelled_fetch_is_discarded() {
        let task = ScreenTask::spawn(std::future::pending::<u32>());
        task.cancel();
        assert!(task.is_cancelled());
        assert_eq!(task.join().await, None);
    }

    #[tokio::test]
    async fn leaving_the_screen_stops_the_fetch() {
        let (tx, rx) = oneshot::channel::<()>();
        let task = ScreenTask::spawn(async move {
            let _keep = tx;
            std::future::pending::<()>().await;
        });
        drop(task);

        // The sender is dropped with the fetch future.
        let outcome = tokio::time::timeout(Duration::from_secs(1), rx).await;
        assert!(matches!(outcome, Ok(Err(_))));
    }

    #[test]
    fn placeholder_on_error() {
        let failed: Result<Vec<Ministry>> = Err(crate::errors::BoardError::Status(
            reqwest::StatusCode::BAD_GATEWAY,
        ));
        assert!(or_placeholder(failed, "ministries").is_empty());
        assert_eq!(or_placeholder(Ok(Some(3)), "n"), Some(3));
    }
}
