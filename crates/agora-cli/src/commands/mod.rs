//! Command implementations.

pub mod comment;
pub mod community;
pub mod post;
pub mod profile;
pub mod tally;
pub mod thread;
pub mod vote;
pub mod watch;

pub use self::comment::execute_comment;
pub use self::community::execute_community;
pub use self::post::execute_post;
pub use self::profile::execute_profile;
pub use self::tally::execute_tally;
pub use self::thread::execute_thread;
pub use self::vote::execute_vote;
pub use self::watch::execute_watch;

use crate::config::{Config, Profile};
use crate::error::Result;
use agora_client::ForumClient;
use agora_store::SqliteStore;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Forum client bound to the active profile's database and identity.
pub type Client = ForumClient<SqliteStore, Profile>;

/// Open the active profile's database, creating it on first use.
pub fn open_client(config: &Config) -> Result<Client> {
    let profile = config.get_active_profile()?.clone();

    if let Some(parent) = Path::new(&profile.database).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteStore::new(&profile.database)?;
    tracing::debug!(database = %profile.database, profile = %config.active_profile, "Opened forum database");

    Ok(ForumClient::new(Arc::new(store), profile, config.settings.client.clone())?)
}
