//! Domain validation errors for the betting state machine.
//!
//! Every variant is recoverable: the adapter renders it as a reply to the
//! caller and the engine state is left untouched.

use thiserror::Error;

use super::id::MarketId;
use super::market::MarketStatus;

/// Errors that occur when a command violates a domain rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Question or outcome list failed validation at market creation.
    #[error("invalid market: {reason}")]
    InvalidMarket { reason: String },

    /// Outcome index out of range for the market.
    #[error("outcome must be between 1 and {outcome_count}")]
    InvalidOutcome { outcome_count: usize },

    /// Stake amount was not a positive number of points.
    #[error("bet amount must be positive")]
    InvalidAmount,

    /// Debit exceeds the account balance.
    #[error("insufficient points: balance is {balance}, tried to stake {requested}")]
    InsufficientFunds { balance: u64, requested: u64 },

    /// Stake placed against a market that is no longer open.
    #[error("market {id} is {status}")]
    MarketClosed { id: MarketId, status: MarketStatus },

    /// Resolve or cancel attempted on a market already in a terminal state.
    #[error("market {id} is already {status}")]
    AlreadyFinalized { id: MarketId, status: MarketStatus },

    /// No market with the given id.
    #[error("market {id} not found")]
    MarketNotFound { id: MarketId },

    /// Stats query for an identity the ledger has never seen.
    #[error("no user named {name}")]
    UserNotFound { name: String },
}
