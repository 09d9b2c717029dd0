//! One consistent-enough view of a post's discussion

use crate::ForumError;
use agora_domain::traits::{CommentStore, VoteStore};
use agora_domain::{build_forest_with, CommentNode, OrphanPolicy, PostId, Tally, UserId};

/// Comment forest and vote tally for a post, fetched together
///
/// The two reads are independent store calls; other writers may land between
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSnapshot {
    /// Post the snapshot belongs to
    pub post_id: PostId,

    /// Threaded comments in submission order
    pub forest: Vec<CommentNode>,

    /// Like/dislike counts and the caller's vote
    pub tally: Tally,
}

impl ThreadSnapshot {
    /// Number of comments reachable in the forest
    pub fn comment_count(&self) -> usize {
        self.forest.iter().map(CommentNode::len).sum()
    }
}

/// Fetch comments and votes for `post_id` and derive the snapshot
pub async fn fetch_snapshot<S>(
    store: &S,
    post_id: PostId,
    caller: Option<&UserId>,
    policy: OrphanPolicy,
) -> Result<ThreadSnapshot, ForumError>
where
    S: CommentStore + VoteStore,
{
    let comments = store.list_comments(post_id).await.map_err(ForumError::store)?;
    let votes = store.list_votes(post_id).await.map_err(ForumError::store)?;

    Ok(ThreadSnapshot {
        post_id,
        forest: build_forest_with(comments, policy),
        tally: Tally::aggregate(&votes, caller),
    })
}
