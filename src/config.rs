//! Arbiter Configuration
//!
//! Built with `Default` for tests, or from environment variables for the
//! binary and any embedding glue.

use serde::{Deserialize, Serialize};

/// Default broadcast capacity for the event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Collection metadata reported by the issuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Collection name.
    pub name: String,
    /// Collection ticker symbol.
    pub symbol: String,
}

impl Default for CollectionInfo {
    fn default() -> Self {
        Self {
            name: "RPS Victory".to_string(),
            symbol: "RPSV".to_string(),
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterConfig {
    /// Whether the creator of a game may also join it as player 2.
    pub allow_self_join: bool,
    /// Capacity of the service's event broadcast channel.
    pub event_capacity: usize,
    /// Victory collection metadata.
    pub collection: CollectionInfo,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            allow_self_join: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            collection: CollectionInfo::default(),
        }
    }
}

impl ArbiterConfig {
    /// Create config from environment variables.
    ///
    /// - `RPS_ALLOW_SELF_JOIN`: `true`/`1` to permit self-join
    /// - `RPS_EVENT_CAPACITY`: broadcast channel capacity
    /// - `RPS_COLLECTION_NAME`, `RPS_COLLECTION_SYMBOL`: collection metadata
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            allow_self_join: lookup("RPS_ALLOW_SELF_JOIN")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.allow_self_join),
            event_capacity: lookup("RPS_EVENT_CAPACITY")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|c| *c > 0)
                .unwrap_or(defaults.event_capacity),
            collection: CollectionInfo {
                name: lookup("RPS_COLLECTION_NAME").unwrap_or(defaults.collection.name),
                symbol: lookup("RPS_COLLECTION_SYMBOL").unwrap_or(defaults.collection.symbol),
            },
        }
    }

    /// Enable or disable self-join.
    #[must_use]
    pub fn with_self_join(mut self, allow: bool) -> Self {
        self.allow_self_join = allow;
        self
    }
}
