//! Market-related domain types.
//!
//! - [`Market`] - one betting proposition: outcomes, status, stakes
//! - [`Stake`] - a single placed bet, immutable once recorded
//! - [`MarketStatus`] - the Open → Resolved/Cancelled lifecycle

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::MarketId;

/// A single bet: an amount committed by one participant to one outcome.
///
/// Stakes are owned exclusively by the market they were placed against
/// and never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub bettor: String,
    pub outcome_index: usize,
    pub amount: u64,
    pub placed_at: DateTime<Utc>,
}

impl Stake {
    pub fn new(bettor: impl Into<String>, outcome_index: usize, amount: u64) -> Self {
        Self {
            bettor: bettor.into(),
            outcome_index,
            amount,
            placed_at: Utc::now(),
        }
    }
}

/// Lifecycle state of a market. Resolved and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Open,
    Resolved,
    Cancelled,
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// One betting proposition with its outcome list, status, and stakes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    id: MarketId,
    question: String,
    creator: String,
    outcomes: Vec<String>,
    status: MarketStatus,
    #[serde(default)]
    stakes: Vec<Stake>,
    winning_outcome: Option<usize>,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl Market {
    /// Create an open market after validating the proposition.
    ///
    /// # Errors
    ///
    /// `InvalidMarket` when the question is empty, fewer than two
    /// outcomes are given, an outcome is empty or longer than
    /// `max_outcome_len`, or two outcomes share a display string.
    pub fn try_new(
        id: MarketId,
        question: impl Into<String>,
        creator: impl Into<String>,
        outcomes: Vec<String>,
        max_outcome_len: usize,
    ) -> Result<Self, DomainError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(DomainError::InvalidMarket {
                reason: "question cannot be empty".into(),
            });
        }
        if outcomes.len() < 2 {
            return Err(DomainError::InvalidMarket {
                reason: "provide at least two outcome options".into(),
            });
        }
        for outcome in &outcomes {
            if outcome.trim().is_empty() {
                return Err(DomainError::InvalidMarket {
                    reason: "outcome options cannot be empty".into(),
                });
            }
            if outcome.chars().count() > max_outcome_len {
                return Err(DomainError::InvalidMarket {
                    reason: format!("options must be {max_outcome_len} characters or fewer"),
                });
            }
        }
        for (i, outcome) in outcomes.iter().enumerate() {
            if outcomes[..i].contains(outcome) {
                return Err(DomainError::InvalidMarket {
                    reason: format!("duplicate outcome option `{outcome}`"),
                });
            }
        }

        Ok(Self {
            id,
            question,
            creator: creator.into(),
            outcomes,
            status: MarketStatus::Open,
            stakes: Vec::new(),
            winning_outcome: None,
            created_at: Utc::now(),
            resolved_at: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> &MarketId {
        &self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn creator(&self) -> &str {
        &self.creator
    }

    #[must_use]
    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    #[must_use]
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub const fn status(&self) -> MarketStatus {
        self.status
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }

    #[must_use]
    pub fn stakes(&self) -> &[Stake] {
        &self.stakes
    }

    #[must_use]
    pub const fn winning_outcome(&self) -> Option<usize> {
        self.winning_outcome
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Check that a stake with these parameters would be accepted.
    ///
    /// The caller debits the ledger between this check and
    /// [`Market::place_stake`], so placement is atomic: a failed debit
    /// leaves the market untouched, and a passed check cannot fail later.
    pub fn validate_stake(&self, outcome_index: usize, amount: u64) -> Result<(), DomainError> {
        if !self.is_open() {
            return Err(DomainError::MarketClosed {
                id: self.id.clone(),
                status: self.status,
            });
        }
        if outcome_index >= self.outcomes.len() {
            return Err(DomainError::InvalidOutcome {
                outcome_count: self.outcomes.len(),
            });
        }
        if amount == 0 {
            return Err(DomainError::InvalidAmount);
        }
        Ok(())
    }

    /// Append a stake. Validation is repeated so the method is safe on
    /// its own; the points must already be escrowed from the ledger.
    pub fn place_stake(&mut self, stake: Stake) -> Result<(), DomainError> {
        self.validate_stake(stake.outcome_index, stake.amount)?;
        self.stakes.push(stake);
        Ok(())
    }

    /// Points staked on each outcome, indexed like `outcomes()`.
    #[must_use]
    pub fn pool_by_outcome(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.outcomes.len()];
        for stake in &self.stakes {
            totals[stake.outcome_index] += stake.amount;
        }
        totals
    }

    /// Total points staked across all outcomes.
    #[must_use]
    pub fn total_pool(&self) -> u64 {
        self.stakes.iter().map(|s| s.amount).sum()
    }

    /// Transition Open → Resolved with the winning outcome recorded.
    ///
    /// # Errors
    ///
    /// `AlreadyFinalized` if the market is not open, `InvalidOutcome` if
    /// the index is out of range. The market is unchanged on error.
    pub fn transition_resolved(&mut self, winning_index: usize) -> Result<(), DomainError> {
        if !self.is_open() {
            return Err(DomainError::AlreadyFinalized {
                id: self.id.clone(),
                status: self.status,
            });
        }
        if winning_index >= self.outcomes.len() {
            return Err(DomainError::InvalidOutcome {
                outcome_count: self.outcomes.len(),
            });
        }
        self.status = MarketStatus::Resolved;
        self.winning_outcome = Some(winning_index);
        self.resolved_at = Some(Utc::now());
        Ok(())
    }

    /// Transition Open → Cancelled.
    pub fn transition_cancelled(&mut self) -> Result<(), DomainError> {
        if !self.is_open() {
            return Err(DomainError::AlreadyFinalized {
                id: self.id.clone(),
                status: self.status,
            });
        }
        self.status = MarketStatus::Cancelled;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_market() -> Market {
        Market::try_new(
            MarketId::from_seq(1),
            "Will it rain tomorrow?",
            "alice",
            vec!["Yes".into(), "No".into()],
            40,
        )
        .unwrap()
    }

    #[test]
    fn try_new_starts_open_with_no_stakes() {
        let market = open_market();
        assert_eq!(market.status(), MarketStatus::Open);
        assert!(market.stakes().is_empty());
        assert_eq!(market.winning_outcome(), None);
        assert_eq!(market.total_pool(), 0);
    }

    #[test]
    fn try_new_rejects_empty_question() {
        let result = Market::try_new(
            MarketId::from_seq(1),
            "   ",
            "alice",
            vec!["Yes".into(), "No".into()],
            40,
        );
        assert!(matches!(result, Err(DomainError::InvalidMarket { .. })));
    }

    #[test]
    fn try_new_rejects_single_outcome() {
        let result = Market::try_new(
            MarketId::from_seq(1),
            "Question?",
            "alice",
            vec!["Yes".into()],
            40,
        );
        assert!(matches!(result, Err(DomainError::InvalidMarket { .. })));
    }

    #[test]
    fn try_new_rejects_overlong_outcome() {
        let result = Market::try_new(
            MarketId::from_seq(1),
            "Question?",
            "alice",
            vec!["Yes".into(), "x".repeat(41)],
            40,
        );
        assert!(matches!(result, Err(DomainError::InvalidMarket { .. })));
    }

    #[test]
    fn try_new_rejects_duplicate_outcomes() {
        let result = Market::try_new(
            MarketId::from_seq(1),
            "Question?",
            "alice",
            vec!["Yes".into(), "Yes".into()],
            40,
        );
        assert!(matches!(result, Err(DomainError::InvalidMarket { .. })));
    }

    #[test]
    fn place_stake_appends_in_order() {
        let mut market = open_market();
        market.place_stake(Stake::new("bob", 0, 100)).unwrap();
        market.place_stake(Stake::new("carol", 1, 200)).unwrap();

        assert_eq!(market.stakes().len(), 2);
        assert_eq!(market.stakes()[0].bettor, "bob");
        assert_eq!(market.pool_by_outcome(), vec![100, 200]);
        assert_eq!(market.total_pool(), 300);
    }

    #[test]
    fn place_stake_rejects_bad_index() {
        let mut market = open_market();
        let err = market.place_stake(Stake::new("bob", 2, 100)).unwrap_err();
        assert_eq!(err, DomainError::InvalidOutcome { outcome_count: 2 });
    }

    #[test]
    fn place_stake_rejects_zero_amount() {
        let mut market = open_market();
        let err = market.place_stake(Stake::new("bob", 0, 0)).unwrap_err();
        assert_eq!(err, DomainError::InvalidAmount);
    }

    #[test]
    fn place_stake_rejects_closed_market() {
        let mut market = open_market();
        market.transition_resolved(0).unwrap();

        let err = market.place_stake(Stake::new("bob", 0, 100)).unwrap_err();
        assert!(matches!(err, DomainError::MarketClosed { .. }));
    }

    #[test]
    fn transition_resolved_records_winner_and_timestamp() {
        let mut market = open_market();
        market.transition_resolved(1).unwrap();

        assert_eq!(market.status(), MarketStatus::Resolved);
        assert_eq!(market.winning_outcome(), Some(1));
        assert!(market.resolved_at().is_some());
    }

    #[test]
    fn transition_resolved_rejects_bad_index_while_staying_open() {
        let mut market = open_market();
        let err = market.transition_resolved(5).unwrap_err();
        assert_eq!(err, DomainError::InvalidOutcome { outcome_count: 2 });
        assert!(market.is_open());
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        let mut resolved = open_market();
        resolved.transition_resolved(0).unwrap();
        assert!(matches!(
            resolved.transition_resolved(1),
            Err(DomainError::AlreadyFinalized { .. })
        ));
        assert!(matches!(
            resolved.transition_cancelled(),
            Err(DomainError::AlreadyFinalized { .. })
        ));
        // Winner unchanged by the failed re-resolution.
        assert_eq!(resolved.winning_outcome(), Some(0));

        let mut cancelled = open_market();
        cancelled.transition_cancelled().unwrap();
        assert!(matches!(
            cancelled.transition_resolved(0),
            Err(DomainError::AlreadyFinalized { .. })
        ));
    }
}
