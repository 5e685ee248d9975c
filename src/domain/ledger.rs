//! Participant accounts and the points ledger.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// One participant's account.
///
/// Balances are unsigned, so a negative balance is unrepresentable;
/// [`Ledger::debit`] refuses any debit that would require one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u64,
    #[serde(default)]
    pub lifetime_winnings: u64,
    #[serde(default)]
    pub markets_created: u64,
    #[serde(default)]
    pub bets_placed: u64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    fn new(starting_balance: u64) -> Self {
        Self {
            balance: starting_balance,
            lifetime_winnings: 0,
            markets_created: 0,
            bets_placed: 0,
            created_at: Utc::now(),
        }
    }
}

/// Mapping from participant identity to account.
///
/// Accounts are created lazily on first contact and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    accounts: BTreeMap<String, Account>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently create an account with the starting balance.
    pub fn ensure_account(&mut self, identity: &str, starting_balance: u64) {
        self.accounts
            .entry(identity.to_string())
            .or_insert_with(|| Account::new(starting_balance));
    }

    /// Remove `amount` points from an account.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount` is zero, `InsufficientFunds` if the
    /// balance cannot cover it, `UserNotFound` if the account does not
    /// exist. On error the ledger is unchanged.
    pub fn debit(&mut self, identity: &str, amount: u64) -> Result<(), DomainError> {
        if amount == 0 {
            return Err(DomainError::InvalidAmount);
        }
        let account = self
            .accounts
            .get_mut(identity)
            .ok_or_else(|| DomainError::UserNotFound {
                name: identity.to_string(),
            })?;
        if account.balance < amount {
            return Err(DomainError::InsufficientFunds {
                balance: account.balance,
                requested: amount,
            });
        }
        account.balance -= amount;
        Ok(())
    }

    /// Add `amount` points to an account, creating it if absent.
    ///
    /// Payouts pass `as_winnings = true` so lifetime winnings accumulate;
    /// refunds pass `false` and leave the statistic untouched.
    pub fn credit(&mut self, identity: &str, amount: u64, as_winnings: bool) {
        let account = self
            .accounts
            .entry(identity.to_string())
            .or_insert_with(|| Account::new(0));
        account.balance += amount;
        if as_winnings {
            account.lifetime_winnings += amount;
        }
    }

    /// Current balance, or `None` for an unknown identity.
    #[must_use]
    pub fn balance(&self, identity: &str) -> Option<u64> {
        self.accounts.get(identity).map(|a| a.balance)
    }

    /// Look up an account.
    #[must_use]
    pub fn account(&self, identity: &str) -> Option<&Account> {
        self.accounts.get(identity)
    }

    /// Bump the markets-created counter.
    pub fn record_market_created(&mut self, identity: &str) {
        if let Some(account) = self.accounts.get_mut(identity) {
            account.markets_created += 1;
        }
    }

    /// Bump the bets-placed counter.
    pub fn record_bet_placed(&mut self, identity: &str) {
        if let Some(account) = self.accounts.get_mut(identity) {
            account.bets_placed += 1;
        }
    }

    /// Accounts ordered by balance descending, name ascending on ties.
    #[must_use]
    pub fn leaderboard(&self, limit: usize) -> Vec<(&str, &Account)> {
        let mut rows: Vec<(&str, &Account)> = self
            .accounts
            .iter()
            .map(|(name, account)| (name.as_str(), account))
            .collect();
        // BTreeMap iteration is name-ascending; the stable sort keeps that
        // order for equal balances.
        rows.sort_by(|a, b| b.1.balance.cmp(&a.1.balance));
        rows.truncate(limit);
        rows
    }

    /// Sum of all balances, used by conservation checks.
    #[must_use]
    pub fn total_points(&self) -> u64 {
        self.accounts.values().map(|a| a.balance).sum()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if the ledger has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
