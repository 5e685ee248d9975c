//! Durable snapshot persistence with pluggable backends.
//!
//! The engine saves a full [`Snapshot`] after every successful mutating
//! command (write-through, no batching). [`JsonFileStore`] is the
//! production backend; [`MemoryStore`] backs tests.

mod json;
mod memory;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::domain::{Ledger, Market, MarketId, MarketRegistry};
use crate::error::Result;

/// Serialized engine state: the original state-file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Ledger,
    #[serde(default)]
    pub markets: BTreeMap<MarketId, Market>,
    #[serde(default = "default_next_market_id")]
    pub next_market_id: u64,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

const fn default_next_market_id() -> u64 {
    1
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            users: Ledger::new(),
            markets: BTreeMap::new(),
            next_market_id: default_next_market_id(),
            updated_at: Utc::now(),
        }
    }
}

impl Snapshot {
    /// Capture the current engine state.
    #[must_use]
    pub fn capture(ledger: &Ledger, registry: &MarketRegistry) -> Self {
        Self {
            users: ledger.clone(),
            markets: registry.markets().clone(),
            next_market_id: registry.next_market_id(),
            updated_at: Utc::now(),
        }
    }

    /// Split the snapshot back into live state.
    #[must_use]
    pub fn into_state(self) -> (Ledger, MarketRegistry) {
        let registry = MarketRegistry::from_parts(self.markets, self.next_market_id);
        (self.users, registry)
    }
}

/// Durable load/save of the full engine state.
///
/// `save` runs inside the engine's command lock, so implementations must
/// not leave a half-written snapshot behind on failure.
pub trait StateStore: Send {
    /// Load the last snapshot, or the default when none exists yet.
    fn load(&self) -> Result<Snapshot>;

    /// Persist a snapshot, replacing any previous one atomically.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
