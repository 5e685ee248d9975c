//! Core domain types for the betting engine.
//!
//! - [`ledger::Ledger`] - participant accounts and balances
//! - [`market::Market`] - one betting proposition and its stakes
//! - [`registry::MarketRegistry`] - all markets plus the id sequence
//! - [`settlement`] - the payout-distribution algorithm

pub mod error;
pub mod id;
pub mod ledger;
pub mod market;
pub mod registry;
pub mod settlement;

pub use error::DomainError;
pub use id::MarketId;
pub use ledger::{Account, Ledger};
pub use market::{Market, MarketStatus, Stake};
pub use registry::MarketRegistry;
pub use settlement::{Payout, Settlement};
