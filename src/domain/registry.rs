//! Registry of all markets plus the id sequence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::MarketId;
use super::market::{Market, MarketStatus};

/// Owns every market and the monotonic id counter.
///
/// Ids are never reused, even after cancellation. Listing order is
/// creation time descending, which the map insertion order does not
/// guarantee after a snapshot reload, so listings sort explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRegistry {
    markets: BTreeMap<MarketId, Market>,
    next_market_id: u64,
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self {
            markets: BTreeMap::new(),
            next_market_id: 1,
        }
    }
}

impl MarketRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from snapshot parts.
    #[must_use]
    pub fn from_parts(markets: BTreeMap<MarketId, Market>, next_market_id: u64) -> Self {
        Self {
            markets,
            next_market_id,
        }
    }

    /// Allocate the next market id without storing anything.
    pub fn allocate_id(&mut self) -> MarketId {
        let id = MarketId::from_seq(self.next_market_id);
        self.next_market_id += 1;
        id
    }

    /// Store a newly created market under its id.
    pub fn insert(&mut self, market: Market) {
        self.markets.insert(market.id().clone(), market);
    }

    /// Look up a market.
    pub fn get(&self, id: &MarketId) -> Result<&Market, DomainError> {
        self.markets
            .get(id)
            .ok_or_else(|| DomainError::MarketNotFound { id: id.clone() })
    }

    /// Look up a market for mutation.
    pub fn get_mut(&mut self, id: &MarketId) -> Result<&mut Market, DomainError> {
        self.markets
            .get_mut(id)
            .ok_or_else(|| DomainError::MarketNotFound { id: id.clone() })
    }

    /// All markets, unordered.
    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.markets.values()
    }

    /// Markets matching the status filter, newest first.
    #[must_use]
    pub fn list(&self, status: Option<MarketStatus>) -> Vec<&Market> {
        let mut markets: Vec<&Market> = self
            .markets
            .values()
            .filter(|m| status.map_or(true, |s| m.status() == s))
            .collect();
        // Ids break ties so same-instant creations still list newest first.
        markets.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        markets
    }

    /// Snapshot accessors.
    #[must_use]
    pub fn markets(&self) -> &BTreeMap<MarketId, Market> {
        &self.markets
    }

    #[must_use]
    pub const fn next_market_id(&self) -> u64 {
        self.next_market_id
    }

    /// Number of markets ever opened and still stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}
