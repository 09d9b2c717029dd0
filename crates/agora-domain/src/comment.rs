//! Comment module - flat comment records as the store hands them out

use crate::{CommentId, PostId, UserId};

/// A comment on a post
///
/// Comments are immutable once created. Threading is expressed only through
/// `parent_id`; the tree is rebuilt from the flat list on every fetch
/// (see [`crate::forest`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Store-assigned identifier
    pub id: CommentId,

    /// Post this comment belongs to
    pub post_id: PostId,

    /// Comment this one replies to, `None` for a root comment
    pub parent_id: Option<CommentId>,

    /// Comment body
    pub content: String,

    /// Author identity
    pub author_id: UserId,

    /// Author display name at the time of writing
    pub author_name: String,

    /// Creation time (Unix seconds)
    pub created_at: u64,
}

impl Comment {
    /// True when this comment has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A comment submission, before the store has assigned an id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Post to comment on
    pub post_id: PostId,

    /// Comment being replied to, if any
    pub parent_id: Option<CommentId>,

    /// Comment body
    pub content: String,

    /// Author identity
    pub author_id: UserId,

    /// Author display name
    pub author_name: String,
}
