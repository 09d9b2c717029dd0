//! Comment and reply submission
//!
//! Every check runs before the store is touched, so a rejected submission
//! never leaves a partial row behind.

use crate::ForumError;
use agora_domain::traits::CommentStore;
use agora_domain::{Comment, CommentId, NewComment, PostId, UserId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

type SubmissionKey = (UserId, PostId, Option<CommentId>);

/// Marks a submission as in flight until dropped
struct InFlight<'a> {
    pending: &'a Mutex<HashSet<SubmissionKey>>,
    key: SubmissionKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

/// Gatekeeper for new comments
///
/// A second submission from the same user to the same thread position
/// (post + parent) is refused while the first is still pending, the way a
/// submit button stays disabled until its request resolves.
pub struct CommentGate<S> {
    store: Arc<S>,
    pending: Mutex<HashSet<SubmissionKey>>,
}

impl<S: CommentStore> CommentGate<S> {
    /// Create a gate over a shared comment store
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Submit a comment (`parent_id = None`) or a reply
    ///
    /// # Errors
    ///
    /// - [`ForumError::Unauthenticated`] if `user_id` or `author_name` is blank
    /// - [`ForumError::Validation`] if `content` is blank
    /// - [`ForumError::SubmissionPending`] if the same submission is in flight
    /// - [`ForumError::Store`] if the store rejects the insert
    pub async fn submit(
        &self,
        post_id: PostId,
        content: &str,
        parent_id: Option<CommentId>,
        user_id: &UserId,
        author_name: &str,
    ) -> Result<Comment, ForumError> {
        if user_id.is_blank() || author_name.trim().is_empty() {
            return Err(ForumError::Unauthenticated);
        }
        if content.trim().is_empty() {
            return Err(ForumError::Validation("comment cannot be empty".to_string()));
        }

        let _in_flight = self.begin((user_id.clone(), post_id, parent_id))?;

        let comment = self
            .store
            .insert_comment(NewComment {
                post_id,
                parent_id,
                content: content.to_string(),
                author_id: user_id.clone(),
                author_name: author_name.to_string(),
            })
            .await
            .map_err(ForumError::store)?;

        tracing::debug!(post = %post_id, comment = %comment.id, parent = ?parent_id, "Comment submitted");
        Ok(comment)
    }

    /// Number of submissions currently in flight
    pub fn in_flight(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn begin(&self, key: SubmissionKey) -> Result<InFlight<'_>, ForumError> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if !pending.insert(key.clone()) {
            return Err(ForumError::SubmissionPending);
        }
        Ok(InFlight {
            pending: &self.pending,
            key,
        })
    }
}
