//! The prayer board: submission form, public feed and the in-flight guard.
//!
//! A board is shared by reference between the presentation layer's event
//! handlers, so all methods take `&self`. Locks are never held across an
//! `.await`.
//!
//! Feed fetches may overlap (a manual pull-to-refresh racing the refresh that
//! follows a submission). Each fetch takes a generation number when it starts
//! and its result is only applied if no later fetch has landed first.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{FixedOffset, Offset, Utc};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::models::PrayerRequest;
use crate::presentation::BoardView;
use crate::store::RequestStore;
use crate::validation::SubmissionForm;

/// What the board knows about the public feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// No answer from the store yet.
    Loading,
    /// The store answered; the list may be empty.
    Loaded(Vec<PrayerRequest>),
    /// The store could not be reached or refused the request.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The store accepted the request. It now waits for moderation.
    ///
    /// Carries the stored record when the store echoed one back readably.
    Submitted(Option<PrayerRequest>),
    /// Another submission from this board has not finished yet; nothing was sent.
    AlreadyInFlight,
}

pub struct PrayerBoard<S> {
    store: S,
    form: Mutex<SubmissionForm>,
    feed: Mutex<FeedSlot>,
    next_generation: AtomicU64,
    submitting: AtomicBool,
    display_offset: FixedOffset,
}

struct FeedSlot {
    /// Generation of the fetch that produced `state`; 0 before any fetch.
    generation: u64,
    state: FeedState,
}

impl<S: RequestStore> PrayerBoard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            form: Mutex::new(SubmissionForm::new()),
            feed: Mutex::new(FeedSlot {
                generation: 0,
                state: FeedState::Loading,
            }),
            next_generation: AtomicU64::new(1),
            submitting: AtomicBool::new(false),
            display_offset: Utc.fix(),
        }
    }

    /// Offset used for the dates printed on cards.
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the form.
    pub fn form(&self) -> SubmissionForm {
        lock(&self.form).clone()
    }

    /// Apply user input to the form.
    pub fn edit_form<R>(&self, edit: impl FnOnce(&mut SubmissionForm) -> R) -> R {
        edit(&mut lock(&self.form))
    }

    pub fn feed(&self) -> FeedState {
        lock(&self.feed).state.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn view(&self) -> BoardView {
        BoardView::from_feed(&lock(&self.feed).state, &self.display_offset)
    }

    /// Fetch the public feed and return the board's feed afterwards.
    ///
    /// A result that arrives after a newer fetch has already been applied is
    /// dropped, and the newer feed is returned instead.
    pub async fn refresh(&self) -> FeedState {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let next = match self.store.list_prayer_requests().await {
            Ok(requests) => {
                debug!("Loaded {} prayer requests", requests.len());
                FeedState::Loaded(requests)
            }
            Err(e) => {
                warn!("Unable to load prayer requests: {e}");
                FeedState::Failed
            }
        };

        let mut slot = lock(&self.feed);
        if generation > slot.generation {
            slot.generation = generation;
            slot.state = next;
        } else {
            debug!("Discarding feed fetch {generation}; {} already applied", slot.generation);
        }
        slot.state.clone()
    }

    /// Validate the form and send it to the store.
    ///
    /// Only one submission per board runs at a time; a call made while
    /// another is pending returns [`SubmitOutcome::AlreadyInFlight`] without
    /// touching the store. On failure the form is left as it was so the user
    /// can retry. On success the name and message are cleared, unless the
    /// user edited them while the request was in flight, and the feed is
    /// fetched again.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let Some(guard) = InFlight::acquire(&self.submitting) else {
            debug!("Submission already in flight; ignoring");
            return Ok(SubmitOutcome::AlreadyInFlight);
        };

        let (request, sent_form) = {
            let form = lock(&self.form);
            (form.validate()?, form.clone())
        };

        let created = match self.store.create_prayer_request(&request).await {
            Ok(created) => created,
            Err(e) => {
                warn!("Prayer request submission failed: {e}");
                return Err(e);
            }
        };
        match &created {
            Some(created) => info!(
                "Submitted prayer request {} (public={})",
                created.id, created.is_public
            ),
            None => info!("Submitted prayer request (public={})", request.is_public),
        }

        {
            let mut form = lock(&self.form);
            if *form == sent_form {
                form.clear();
            } else {
                debug!("Form changed while submitting; keeping the new input");
            }
        }
        drop(guard);

        self.refresh().await;
        Ok(SubmitOutcome::Submitted(created))
    }
}

/// Holds the "submission in progress" flag until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
