//! In-memory store implementation for testing.

use parking_lot::Mutex;

use super::{Snapshot, StateStore};
use crate::error::Result;

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of markets in the last saved snapshot, if any.
    #[must_use]
    pub fn saved_market_count(&self) -> Option<usize> {
        self.snapshot.lock().as_ref().map(|s| s.markets.len())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.snapshot.lock().clone().unwrap_or_default())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.snapshot.lock() = Some(snapshot.clone());
        Ok(())
    }
}
