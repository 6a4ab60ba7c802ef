use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::FutureExt as _;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{Bubble, BubbleScale, Job, Notice, Scheduler, TaskHandle, View};
use crate::client::ItemApi;
use crate::config::{BubbleConfig, ClientConfig};
use crate::item::{Item, ItemId};

/// Pacing and presentation knobs for a [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSettings {
    pub poll_interval: Duration,
    /// Delay between a successful vote and the follow-up refresh.
    pub resync_delay: Duration,
    pub pulse: Duration,
    pub notice_ttl: Duration,
    pub scale: BubbleScale,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default(), BubbleConfig::default())
    }
}

impl SyncSettings {
    #[must_use]
    pub fn from_config(client: &ClientConfig, bubble: BubbleConfig) -> Self {
        Self {
            poll_interval: client.poll_interval,
            resync_delay: client.resync_delay,
            pulse: client.pulse,
            notice_ttl: client.notice_ttl,
            scale: bubble.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    /// A newer list (or a vote) landed first; this response was dropped.
    Stale,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Counted { votes: u64 },
    Failed,
    /// The item is not on screen, nothing was sent.
    NotVisible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Item),
    /// Blank name, nothing was sent.
    Rejected,
    /// Another add is still in flight.
    Busy,
    /// The server refused or could not be reached; carries the message shown.
    Failed(String),
}

/// Mutable client state. Never locked across a network call.
#[derive(Debug, Default)]
struct Session {
    items: Vec<Item>,
    /// Last sequence number handed to a refresh.
    issued_seq: u64,
    /// Sequence number of the newest data on screen.
    applied_seq: u64,
    poller: Option<TaskHandle>,
    resync: Option<TaskHandle>,
}

struct Inner {
    api: Arc<dyn ItemApi>,
    view: Arc<dyn View>,
    scheduler: Arc<dyn Scheduler>,
    settings: SyncSettings,
    session: Mutex<Session>,
    adding: AtomicBool,
}

/// Clears the add flag however the add future ends.
struct InFlight<'flag>(&'flag AtomicBool);

impl<'flag> InFlight<'flag> {
    fn acquire(flag: &'flag AtomicBool) -> Option<Self> {
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

/// Keeps a local copy of the server's items and drives a [`View`] from it.
///
/// Cloning is cheap and every clone shares the same session. Scheduled jobs
/// hold only a weak reference, so dropping the last clone stops polling.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
}

impl Controller {
    #[must_use]
    pub fn new(
        api: Arc<dyn ItemApi>,
        view: Arc<dyn View>,
        scheduler: Arc<dyn Scheduler>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                view,
                scheduler,
                settings,
                session: Mutex::new(Session::default()),
                adding: AtomicBool::new(false),
            }),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SyncSettings {
        &self.inner.settings
    }

    /// Items as of the last applied refresh or vote.
    pub async fn items(&self) -> Vec<Item> {
        self.inner.session.lock().await.items.clone()
    }

    pub async fn bubbles(&self) -> Vec<Bubble> {
        let scale = self.inner.settings.scale;
        let session = self.inner.session.lock().await;
        session.items.iter().map(|item| scale.bubble(item)).collect()
    }

    #[must_use]
    pub fn is_adding(&self) -> bool {
        self.inner.adding.load(Ordering::Acquire)
    }

    pub async fn is_polling(&self) -> bool {
        self.inner.session.lock().await.poller.is_some()
    }

    /// Initial load, then poll every `poll_interval`.
    pub async fn start(&self) -> RefreshOutcome {
        let outcome = self.refresh().await;
        let interval = self.inner.settings.poll_interval;
        let handle = self.inner.scheduler.every(interval, self.refresh_job());
        let previous = self.inner.session.lock().await.poller.replace(handle);
        drop(previous);
        info!(interval_ms = %interval.as_millis(), "Polling started");
        outcome
    }

    /// Cancel polling and any pending resync. Requests already sent finish.
    pub async fn stop(&self) {
        let (poller, resync) = {
            let mut session = self.inner.session.lock().await;
            (session.poller.take(), session.resync.take())
        };
        if let Some(poller) = poller {
            poller.cancel();
            info!("Polling stopped");
        }
        if let Some(resync) = resync {
            resync.cancel();
        }
    }

    /// Fetch the full list and re-render, unless newer data is already shown.
    pub async fn refresh(&self) -> RefreshOutcome {
        let seq = {
            let mut session = self.inner.session.lock().await;
            session.issued_seq = session.issued_seq.saturating_add(1);
            session.issued_seq
        };

        let items = match self.inner.api.list_items().await {
            Ok(items) => items,
            Err(e) => {
                warn!(seq, error = %e, "Failed to refresh items");
                return RefreshOutcome::Failed;
            }
        };

        let scale = self.inner.settings.scale;
        let mut session = self.inner.session.lock().await;
        if seq <= session.applied_seq {
            debug!(seq, applied = session.applied_seq, "Dropping stale item list");
            return RefreshOutcome::Stale;
        }
        let bubbles: Vec<Bubble> = items.iter().map(|item| scale.bubble(item)).collect();
        session.applied_seq = seq;
        session.items = items;
        // Render under the lock so two overlapping refreshes draw in order.
        self.inner.view.render(&bubbles);
        drop(session);
        debug!(seq, count = bubbles.len(), "Applied item list");
        RefreshOutcome::Applied {
            count: bubbles.len(),
        }
    }

    /// Vote for `id` and reconcile that one bubble from the server's answer.
    pub async fn vote(&self, id: ItemId) -> VoteOutcome {
        let visible = self
            .inner
            .session
            .lock()
            .await
            .items
            .iter()
            .any(|item| item.id == id);
        if !visible {
            debug!(id, "Ignoring vote for item not on screen");
            return VoteOutcome::NotVisible;
        }

        let settings = self.inner.settings;
        self.inner.view.pulse(id, settings.pulse);

        match self.inner.api.vote(id).await {
            Ok(receipt) => {
                if let Some(bubble) = self.apply_vote(id, receipt.votes).await {
                    self.inner.view.update_bubble(&bubble);
                }
                self.inner.view.notify(Notice::success(
                    "Vote counted".to_string(),
                    settings.notice_ttl,
                ));
                self.schedule_resync().await;
                VoteOutcome::Counted {
                    votes: receipt.votes,
                }
            }
            Err(e) => {
                warn!(id, error = %e, "Vote failed");
                let message = e
                    .server_message()
                    .map_or_else(|| "Could not record your vote".to_string(), str::to_string);
                self.inner
                    .view
                    .notify(Notice::error(message, settings.notice_ttl));
                VoteOutcome::Failed
            }
        }
    }

    /// Create an item named `name` (trimmed). At most one add runs at a time.
    pub async fn add_item(&self, name: &str) -> AddOutcome {
        let settings = self.inner.settings;
        let trimmed = name.trim();
        if trimmed.is_empty() {
            self.inner.view.notify(Notice::error(
                "Please enter a name".to_string(),
                settings.notice_ttl,
            ));
            return AddOutcome::Rejected;
        }

        let Some(in_flight) = InFlight::acquire(&self.inner.adding) else {
            debug!("Add already in flight, ignoring submission");
            return AddOutcome::Busy;
        };
        let result = self.inner.api.add_item(trimmed).await;
        drop(in_flight);

        match result {
            Ok(item) => {
                info!(id = item.id, name = %item.name, "Item added");
                self.inner.view.close_dialog();
                self.inner.view.reset_input();
                self.inner.view.notify(Notice::success(
                    format!("Added \"{}\"", item.name),
                    settings.notice_ttl,
                ));
                self.refresh().await;
                AddOutcome::Added(item)
            }
            Err(e) => {
                warn!(name = %trimmed, error = %e, "Add failed");
                let message = e
                    .server_message()
                    .map_or_else(|| "Could not add item".to_string(), str::to_string);
                self.inner
                    .view
                    .notify(Notice::error(message.clone(), settings.notice_ttl));
                AddOutcome::Failed(message)
            }
        }
    }

    /// Record a confirmed vote locally and mark any list fetched before it
    /// as stale.
    async fn apply_vote(&self, id: ItemId, votes: u64) -> Option<Bubble> {
        let scale = self.inner.settings.scale;
        let mut session = self.inner.session.lock().await;
        session.applied_seq = session.issued_seq;
        let item = session.items.iter_mut().find(|item| item.id == id)?;
        item.votes = votes;
        item.voted_by_me = true;
        Some(scale.bubble(item))
    }

    /// Refresh after `resync_delay`, replacing any resync still pending.
    async fn schedule_resync(&self) {
        let delay = self.inner.settings.resync_delay;
        let handle = self.inner.scheduler.after(delay, self.refresh_job());
        let previous = self.inner.session.lock().await.resync.replace(handle);
        drop(previous);
    }

    fn refresh_job(&self) -> Job {
        let shared: Weak<Inner> = Arc::downgrade(&self.inner);
        Arc::new(move || {
            let weak = Weak::clone(&shared);
            async move {
                if let Some(inner) = weak.upgrade() {
                    Controller { inner }.refresh().await;
                }
            }
            .boxed()
        })
    }
}
