//! Periodic refresh of subscribed threads
//!
//! There is no push channel; each subscribed post gets one repeating timer
//! task that re-fetches comments and votes at the configured interval and
//! publishes the result to every subscriber of that post. The task owns a
//! cancellation token which fires when the last [`Subscription`] for the post
//! is dropped, abandoning any fetch still in flight.

use crate::snapshot::{fetch_snapshot, ThreadSnapshot};
use crate::{ClientConfig, ForumError};
use agora_domain::traits::{CommentStore, VoteStore};
use agora_domain::{OrphanPolicy, PostId, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// What subscribers of a post currently see
///
/// A failed refresh keeps the previous snapshot and records the error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollState {
    /// Most recent successful snapshot
    pub snapshot: Option<ThreadSnapshot>,

    /// Error from the most recent refresh, cleared by the next success
    pub last_error: Option<ForumError>,
}

struct Feed {
    cancel: CancellationToken,
    updates: watch::Receiver<PollState>,
    subscribers: usize,
}

type Feeds = Arc<Mutex<HashMap<PostId, Feed>>>;

/// Runs one polling task per subscribed post
///
/// # Examples
///
/// ```no_run
/// use agora_client::{ClientConfig, ThreadPoller};
/// use agora_domain::PostId;
/// use agora_store::SqliteStore;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Arc::new(SqliteStore::new("agora.db")?);
///     let poller = ThreadPoller::new(store, None, ClientConfig::default());
///
///     let mut subscription = poller.subscribe(PostId::new(1));
///     while let Some(state) = subscription.next().await {
///         if let Some(snapshot) = state.snapshot {
///             println!("{} comments, {} likes", snapshot.comment_count(), snapshot.tally.likes);
///         }
///     }
///     Ok(())
/// }
/// ```
pub struct ThreadPoller<S> {
    store: Arc<S>,
    caller: Option<UserId>,
    interval: Duration,
    orphan_policy: OrphanPolicy,
    feeds: Feeds,
}

impl<S> ThreadPoller<S>
where
    S: CommentStore + VoteStore + Send + Sync + 'static,
{
    /// Create a poller; `caller` determines the caller vote in each tally
    ///
    /// A zero interval is raised to one second.
    pub fn new(store: Arc<S>, caller: Option<UserId>, config: ClientConfig) -> Self {
        Self {
            store,
            caller,
            interval: config.poll_interval().max(Duration::from_secs(1)),
            orphan_policy: config.orphan_policy,
            feeds: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to a post, starting its polling task if none is running
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(&self, post_id: PostId) -> Subscription {
        let mut feeds = self.feeds.lock().unwrap_or_else(|e| e.into_inner());

        let updates = match feeds.get_mut(&post_id) {
            Some(feed) => {
                feed.subscribers += 1;
                feed.updates.clone()
            }
            None => {
                let (sender, updates) = watch::channel(PollState::default());
                let cancel = CancellationToken::new();

                tokio::spawn(run_feed(
                    Arc::clone(&self.store),
                    post_id,
                    self.caller.clone(),
                    self.orphan_policy,
                    self.interval,
                    sender,
                    cancel.clone(),
                ));

                feeds.insert(
                    post_id,
                    Feed {
                        cancel,
                        updates: updates.clone(),
                        subscribers: 1,
                    },
                );
                updates
            }
        };

        Subscription {
            post_id,
            updates,
            feeds: Arc::clone(&self.feeds),
        }
    }

    /// True while at least one subscription for `post_id` is alive
    pub fn is_polling(&self, post_id: PostId) -> bool {
        self.feeds
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&post_id)
    }

    /// Number of posts currently being polled
    pub fn active_feeds(&self) -> usize {
        self.feeds.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Stop every polling task; live subscriptions will see their stream end
    pub fn shutdown(&self) {
        let mut feeds = self.feeds.lock().unwrap_or_else(|e| e.into_inner());
        for (_, feed) in feeds.drain() {
            feed.cancel.cancel();
        }
    }
}

/// A live interest in one post's updates
///
/// Dropping the last subscription for a post stops its polling task.
pub struct Subscription {
    post_id: PostId,
    updates: watch::Receiver<PollState>,
    feeds: Feeds,
}

impl Subscription {
    /// Post this subscription follows
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Latest published state, without waiting
    pub fn latest(&self) -> PollState {
        self.updates.borrow().clone()
    }

    /// Wait for the next change
    ///
    /// Returns `None` once the polling task has stopped.
    pub async fn next(&mut self) -> Option<PollState> {
        self.updates.changed().await.ok()?;
        Some(self.updates.borrow_and_update().clone())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut feeds = self.feeds.lock().unwrap_or_else(|e| e.into_inner());
        // A feed restarted after shutdown() is not ours to release.
        let Some(feed) = feeds
            .get_mut(&self.post_id)
            .filter(|feed| feed.updates.same_channel(&self.updates))
        else {
            return;
        };

        feed.subscribers = feed.subscribers.saturating_sub(1);
        if feed.subscribers == 0 {
            if let Some(feed) = feeds.remove(&self.post_id) {
                feed.cancel.cancel();
                tracing::debug!(post = %self.post_id, "Last subscriber left, cancelling poller");
            }
        }
    }
}

async fn run_feed<S>(
    store: Arc<S>,
    post_id: PostId,
    caller: Option<UserId>,
    policy: OrphanPolicy,
    period: Duration,
    updates: watch::Sender<PollState>,
    cancel: CancellationToken,
) where
    S: CommentStore + VoteStore + Send + Sync + 'static,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(post = %post_id, interval = ?period, "Thread poller started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        tracing::debug!(post = %post_id, "Refreshing thread");

        let fetched = tokio::select! {
            _ = cancel.cancelled() => break,
            result = fetch_snapshot(&*store, post_id, caller.as_ref(), policy) => result,
        };

        match fetched {
            Ok(snapshot) => {
                updates.send_if_modified(|state| {
                    let changed = state.snapshot.as_ref() != Some(&snapshot) || state.last_error.is_some();
                    if changed {
                        state.snapshot = Some(snapshot);
                        state.last_error = None;
                    }
                    changed
                });
            }
            Err(e) => {
                tracing::warn!(post = %post_id, error = %e, "Thread refresh failed");
                updates.send_if_modified(|state| {
                    let changed = state.last_error.as_ref() != Some(&e);
                    state.last_error = Some(e);
                    changed
                });
            }
        }
    }

    tracing::info!(post = %post_id, "Thread poller stopped");
}
