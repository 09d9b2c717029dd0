//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and the remote
//! store / auth collaborators. Implementations live in other crates.
//!
//! Store operations are asynchronous and their futures are `Send`, so callers
//! may drive them from spawned tasks. Stores are shared: every method takes
//! `&self` and implementations must tolerate concurrent writers.

use crate::{
    Comment, Community, CommunityId, CurrentUser, NewComment, NewCommunity, NewPost, Post, PostId,
    UserId, Vote, VoteId, VoteValue,
};
use std::future::Future;

/// Flat comment records, queried by post
///
/// Implemented by the infrastructure layer (agora-store)
pub trait CommentStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// All comments on a post, ordered by `created_at` ascending
    fn list_comments(
        &self,
        post_id: PostId,
    ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send;

    /// Persist a new comment and return it with its assigned id and timestamp
    fn insert_comment(
        &self,
        comment: NewComment,
    ) -> impl Future<Output = Result<Comment, Self::Error>> + Send;
}

/// Vote records, at most one per (post, user)
///
/// Implemented by the infrastructure layer (agora-store)
pub trait VoteStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// All votes on a post
    fn list_votes(&self, post_id: PostId)
        -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send;

    /// The user's vote on a post, if any
    fn find_vote(
        &self,
        post_id: PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send;

    /// Record a first vote
    fn insert_vote(
        &self,
        post_id: PostId,
        user_id: &UserId,
        value: VoteValue,
    ) -> impl Future<Output = Result<Vote, Self::Error>> + Send;

    /// Change the value of an existing vote
    fn update_vote(
        &self,
        vote_id: VoteId,
        value: VoteValue,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove a vote
    fn delete_vote(&self, vote_id: VoteId) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Posts and communities
///
/// Implemented by the infrastructure layer (agora-store)
pub trait PostStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Create a community
    fn create_community(
        &self,
        community: NewCommunity,
    ) -> impl Future<Output = Result<Community, Self::Error>> + Send;

    /// All communities, newest first
    fn list_communities(&self) -> impl Future<Output = Result<Vec<Community>, Self::Error>> + Send;

    /// Create a post
    fn create_post(&self, post: NewPost) -> impl Future<Output = Result<Post, Self::Error>> + Send;

    /// Get a post by id
    fn get_post(&self, id: PostId) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send;

    /// Posts newest first, optionally restricted to one community
    fn list_posts(
        &self,
        community: Option<CommunityId>,
    ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send;
}

/// Source of the caller's identity
///
/// Implemented by the auth collaborator (the CLI reads it from the active profile)
pub trait IdentityProvider {
    /// The signed-in user, `None` when signed out
    fn current_user(&self) -> Option<CurrentUser>;
}

impl IdentityProvider for Option<CurrentUser> {
    fn current_user(&self) -> Option<CurrentUser> {
        self.clone()
    }
}
