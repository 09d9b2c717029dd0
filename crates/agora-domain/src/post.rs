//! Posts and communities
//!
//! Plain records; the core passes them through to the store unchanged apart
//! from required-field checks.

use crate::{CommunityId, PostId};

/// A community that groups posts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    /// Store-assigned identifier
    pub id: CommunityId,

    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Creation time (Unix seconds)
    pub created_at: u64,
}

/// A community submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommunity {
    /// Display name (required)
    pub name: String,

    /// Free-form description
    pub description: String,
}

/// A post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Store-assigned identifier
    pub id: PostId,

    /// Title
    pub title: String,

    /// Body
    pub content: String,

    /// Public URL of an already-uploaded image
    pub image_url: Option<String>,

    /// Owning community, if any
    pub community_id: Option<CommunityId>,

    /// Creation time (Unix seconds)
    pub created_at: u64,
}

/// A post submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Title (required)
    pub title: String,

    /// Body (required)
    pub content: String,

    /// Public URL of an already-uploaded image
    pub image_url: Option<String>,

    /// Community to post into
    pub community_id: Option<CommunityId>,
}
