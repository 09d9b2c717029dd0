//! Configuration for the forum client
//!
//! Defines the polling cadence and how dangling comment replies are treated.

use crate::ForumError;
use agora_domain::OrphanPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`crate::ForumClient`] and its pollers
///
/// # Examples
///
/// ```
/// use agora_client::ClientConfig;
/// use agora_domain::OrphanPolicy;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.poll_interval_secs, 5);
/// assert_eq!(config.orphan_policy, OrphanPolicy::Drop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// How often subscribed threads are re-fetched (in seconds)
    /// Default: 5 seconds, for comments and votes alike
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Placement of comments whose parent is missing from the fetched set
    /// Default: drop them
    #[serde(default, with = "orphan_policy_format")]
    pub orphan_policy: OrphanPolicy,
}

fn default_poll_interval_secs() -> u64 {
    5
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            orphan_policy: OrphanPolicy::Drop,
        }
    }
}

impl ClientConfig {
    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Reject settings the client cannot run with
    pub fn validate(&self) -> Result<(), ForumError> {
        if self.poll_interval_secs == 0 {
            return Err(ForumError::Config(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

mod orphan_policy_format {
    use agora_domain::OrphanPolicy;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(policy: &OrphanPolicy, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(policy.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OrphanPolicy, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
