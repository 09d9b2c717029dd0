//! Agora Client
//!
//! Orchestration over the forum's remote stores: vote resolution, comment
//! submission, thread snapshots, and periodic refresh.
//!
//! # Overview
//!
//! The client is responsible for:
//! - **Vote resolution**: three-state like/dislike toggling, serialized per
//!   (post, user) so concurrent clicks cannot leave two votes behind
//! - **Comment submission**: identity and content checks before any store call,
//!   plus a guard against duplicate in-flight submissions
//! - **Snapshots**: the comment forest and vote tally of a post, rebuilt on
//!   every fetch
//! - **Polling**: one timer task per subscribed post, cancelled when its last
//!   subscriber goes away
//!
//! # Usage
//!
//! ```no_run
//! use agora_client::{ClientConfig, ForumClient};
//! use agora_domain::{CurrentUser, PostId, VoteValue};
//! use agora_store::SqliteStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::new("agora.db")?);
//!     let client = ForumClient::new(
//!         store,
//!         Some(CurrentUser::new("u-1", "alice")),
//!         ClientConfig::default(),
//!     )?;
//!
//!     client.vote(PostId::new(1), VoteValue::Up).await?;
//!
//!     let poller = client.poller();
//!     let mut subscription = poller.subscribe(PostId::new(1));
//!     while let Some(state) = subscription.next().await {
//!         if let Some(snapshot) = state.snapshot {
//!             println!("{} comments", snapshot.comment_count());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! poll_interval_secs = 5
//! orphan_policy = "drop"   # or "promote"
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod gate;
mod poller;
mod resolver;
mod snapshot;

#[cfg(test)]
mod testing;

pub use client::ForumClient;
pub use config::ClientConfig;
pub use error::ForumError;
pub use gate::CommentGate;
pub use poller::{PollState, Subscription, ThreadPoller};
pub use resolver::VoteResolver;
pub use snapshot::{fetch_snapshot, ThreadSnapshot};
