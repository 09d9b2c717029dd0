//! Agora Domain Layer
//!
//! This crate contains the core logic and domain model for the Agora forum
//! client. It has ZERO external dependencies and defines the records, the pure
//! algorithms, and the trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Comment**: flat record referencing its parent by id
//! - **Forest**: ordered trees rebuilt from the flat comment list on every fetch
//! - **Vote**: at most one per (post, user); clicking is a three-state toggle
//! - **Tally**: like/dislike counts plus the caller's own vote
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure logic only; no I/O
//! - Store and auth collaborators are described by traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comment;
pub mod forest;
pub mod identity;
pub mod ids;
pub mod post;
pub mod tally;
pub mod traits;
pub mod vote;

// Re-exports for convenience
pub use comment::{Comment, NewComment};
pub use forest::{build_forest, build_forest_with, preorder, CommentNode, OrphanPolicy};
pub use identity::CurrentUser;
pub use ids::{CommentId, CommunityId, PostId, UserId, VoteId};
pub use post::{Community, NewCommunity, NewPost, Post};
pub use tally::Tally;
pub use vote::{Vote, VoteAction, VoteState, VoteValue};
