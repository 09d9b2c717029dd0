//! Vote resolution against the vote store
//!
//! A vote click is a read (the caller's current vote) followed by one write
//! (insert, update, or delete). The store offers no compare-and-swap, so two
//! clicks racing through read-then-write could both see "no vote" and both
//! insert. The resolver serializes requests per `(post, user)` with an
//! in-process keyed lock; requests for different keys never wait on each
//! other.

use crate::ForumError;
use agora_domain::traits::VoteStore;
use agora_domain::{PostId, UserId, VoteAction, VoteState, VoteValue};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

type VoteKey = (PostId, UserId);

/// Lock table keyed by `(post, user)`
///
/// Entries exist only while some request holds or waits on them.
#[derive(Default)]
struct KeyedLocks {
    locks: Mutex<HashMap<VoteKey, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    fn lease(&self, key: VoteKey) -> Lease<'_> {
        let handle = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        Lease {
            table: self,
            key,
            handle,
        }
    }

    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// A claim on one key's lock; prunes the table entry when the last claim goes
struct Lease<'a> {
    table: &'a KeyedLocks,
    key: VoteKey,
    handle: Arc<AsyncMutex<()>>,
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        let mut locks = self.table.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Two references left means the table and this lease.
        if locks.get(&self.key).is_some_and(|l| Arc::strong_count(l) == 2) {
            locks.remove(&self.key);
        }
    }
}

/// Applies vote clicks with toggle semantics
///
/// # Examples
///
/// ```
/// use agora_client::VoteResolver;
/// use agora_domain::{PostId, UserId, VoteState, VoteValue};
/// use agora_store::SqliteStore;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStore::new(":memory:")?);
/// let resolver = VoteResolver::new(store);
///
/// let user = UserId::new("a");
/// let state = resolver.apply(PostId::new(7), &user, VoteValue::Up).await?;
/// assert_eq!(state, VoteState::Upvoted);
///
/// // Clicking the same button again withdraws the vote
/// let state = resolver.apply(PostId::new(7), &user, VoteValue::Up).await?;
/// assert_eq!(state, VoteState::NoVote);
/// # Ok(())
/// # }
/// ```
pub struct VoteResolver<S> {
    store: Arc<S>,
    locks: KeyedLocks,
}

impl<S: VoteStore> VoteResolver<S> {
    /// Create a resolver over a shared vote store
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: KeyedLocks::default(),
        }
    }

    /// Apply a click of `requested` by `user_id` on `post_id`
    ///
    /// Returns the caller's resulting state. Callers re-fetch the vote set to
    /// observe the new tally.
    ///
    /// # Errors
    ///
    /// - [`ForumError::Unauthenticated`] if `user_id` is blank; no store call is made
    /// - [`ForumError::Store`] if the read or the write fails; a failed read
    ///   means nothing was written
    pub async fn apply(
        &self,
        post_id: PostId,
        user_id: &UserId,
        requested: VoteValue,
    ) -> Result<VoteState, ForumError> {
        if user_id.is_blank() {
            return Err(ForumError::Unauthenticated);
        }

        let lease = self.locks.lease((post_id, user_id.clone()));
        let _serialized = lease.handle.lock().await;

        let existing = self
            .store
            .find_vote(post_id, user_id)
            .await
            .map_err(ForumError::store)?;

        let action = VoteAction::plan(existing.as_ref(), requested);
        tracing::debug!(
            post = %post_id,
            user = %user_id,
            from = ?VoteState::of(existing.as_ref()),
            ?action,
            "Resolving vote"
        );

        match action {
            VoteAction::Insert(value) => {
                self.store
                    .insert_vote(post_id, user_id, value)
                    .await
                    .map_err(ForumError::store)?;
            }
            VoteAction::Update(vote_id, value) => {
                self.store
                    .update_vote(vote_id, value)
                    .await
                    .map_err(ForumError::store)?;
            }
            VoteAction::Delete(vote_id) => {
                self.store
                    .delete_vote(vote_id)
                    .await
                    .map_err(ForumError::store)?;
            }
        }

        Ok(action.outcome())
    }

    /// Number of `(post, user)` keys with a request in progress
    pub fn pending_keys(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use agora_domain::Tally;

    fn setup() -> (Arc<MemoryStore>, VoteResolver<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let resolver = VoteResolver::new(Arc::clone(&store));
        (store, resolver)
    }

    fn tally(store: &MemoryStore, post: i64, caller: &str) -> Tally {
        let votes: Vec<_> = store
            .votes()
            .into_iter()
            .filter(|v| v.post_id == PostId::new(post))
            .collect();
        Tally::aggregate(&votes, Some(&UserId::new(caller)))
    }

    #[tokio::test]
    async fn test_first_vote_inserts() {
        let (store, resolver) = setup();
        let user = UserId::new("a");

        let state = resolver.apply(PostId::new(7), &user, VoteValue::Up).await.unwrap();
        assert_eq!(state, VoteState::Upvoted);

        let votes = store.votes();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].post_id, PostId::new(7));
        assert_eq!(votes[0].user_id, user);
        assert_eq!(votes[0].value, VoteValue::Up);

        let tally = tally(&store, 7, "a");
        assert_eq!((tally.likes, tally.dislikes), (1, 0));
        assert_eq!(tally.caller_vote, Some(VoteValue::Up));
    }

    #[tokio::test]
    async fn test_same_vote_twice_withdraws() {
        let (store, resolver) = setup();
        let user = UserId::new("a");

        resolver.apply(PostId::new(7), &user, VoteValue::Up).await.unwrap();
        let state = resolver.apply(PostId::new(7), &user, VoteValue::Up).await.unwrap();

        assert_eq!(state, VoteState::NoVote);
        assert!(store.votes().is_empty());

        let tally = tally(&store, 7, "a");
        assert_eq!((tally.likes, tally.dislikes), (0, 0));
        assert_eq!(tally.caller_vote, None);
    }

    #[tokio::test]
    async fn test_opposite_vote_flips() {
        let (store, resolver) = setup();
        let user = UserId::new("a");

        resolver.apply(PostId::new(7), &user, VoteValue::Up).await.unwrap();
        let first_id = store.votes()[0].id;

        let state = resolver.apply(PostId::new(7), &user, VoteValue::Down).await.unwrap();
        assert_eq!(state, VoteState::Downvoted);

        let votes = store.votes();
        assert_eq!(votes.len(), 1, "Flip must update, not insert");
        assert_eq!(votes[0].id, first_id);
        assert_eq!(votes[0].value, VoteValue::Down);

        let tally = tally(&store, 7, "a");
        assert_eq!((tally.likes, tally.dislikes), (0, 1));
        assert_eq!(tally.caller_vote, Some(VoteValue::Down));
    }

    #[tokio::test]
    async fn test_alternating_votes_leave_one_record() {
        let (store, resolver) = setup();
        let user = UserId::new("a");

        let sequence = [VoteValue::Up, VoteValue::Down, VoteValue::Up, VoteValue::Down];
        for value in sequence {
            resolver.apply(PostId::new(7), &user, value).await.unwrap();
        }

        let votes = store.votes();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].value, VoteValue::Down);
    }

    #[tokio::test]
    async fn test_blank_user_rejected_without_store_call() {
        let (store, resolver) = setup();

        let result = resolver.apply(PostId::new(7), &UserId::new(""), VoteValue::Up).await;

        assert_eq!(result, Err(ForumError::Unauthenticated));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_surfaced_verbatim() {
        let (store, resolver) = setup();
        store.set_failing(true);

        let result = resolver.apply(PostId::new(7), &UserId::new("a"), VoteValue::Up).await;

        assert_eq!(result, Err(ForumError::Store("connection reset by peer".to_string())));
        assert!(store.votes().is_empty());
        assert_eq!(resolver.pending_keys(), 0);
    }

    /// The racy store really does double-insert when nothing serializes the
    /// read-then-write.
    #[tokio::test]
    async fn test_unserialized_double_click_duplicates() {
        async fn naive_click(store: &MemoryStore, user: &UserId) {
            let existing = store.find_vote(PostId::new(7), user).await.unwrap();
            if let VoteAction::Insert(value) = VoteAction::plan(existing.as_ref(), VoteValue::Up) {
                store.insert_vote(PostId::new(7), user, value).await.unwrap();
            }
        }

        let store = MemoryStore::new();
        let user = UserId::new("a");
        tokio::join!(naive_click(&store, &user), naive_click(&store, &user));

        assert_eq!(store.votes().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_double_click_keeps_at_most_one_vote() {
        let (store, resolver) = setup();
        let user = UserId::new("a");

        let (first, second) = tokio::join!(
            resolver.apply(PostId::new(7), &user, VoteValue::Up),
            resolver.apply(PostId::new(7), &user, VoteValue::Up),
        );

        // Serialized: the first click inserts, the second withdraws.
        assert_eq!(first.unwrap(), VoteState::Upvoted);
        assert_eq!(second.unwrap(), VoteState::NoVote);
        assert!(store.votes().len() <= 1);
        assert_eq!(resolver.pending_keys(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_opposite_clicks_across_threads() {
        let (store, resolver) = setup();
        let resolver = Arc::new(resolver);

        let mut handles = Vec::new();
        for i in 0..16 {
            let resolver = Arc::clone(&resolver);
            let value = if i % 2 == 0 { VoteValue::Up } else { VoteValue::Down };
            handles.push(tokio::spawn(async move {
                resolver.apply(PostId::new(7), &UserId::new("a"), value).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let votes = store.votes();
        assert!(votes.len() <= 1, "Found {} votes for one user", votes.len());
        assert_eq!(resolver.pending_keys(), 0);
    }

    #[tokio::test]
    async fn test_different_users_do_not_interfere() {
        let (store, resolver) = setup();
        let (a, b) = (UserId::new("a"), UserId::new("b"));

        let (ra, rb) = tokio::join!(
            resolver.apply(PostId::new(7), &a, VoteValue::Up),
            resolver.apply(PostId::new(7), &b, VoteValue::Down),
        );
        assert_eq!(ra.unwrap(), VoteState::Upvoted);
        assert_eq!(rb.unwrap(), VoteState::Downvoted);

        let tally = tally(&store, 7, "b");
        assert_eq!((tally.likes, tally.dislikes), (1, 1));
        assert_eq!(tally.caller_vote, Some(VoteValue::Down));
    }
}
