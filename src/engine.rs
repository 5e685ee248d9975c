//! Command execution over ledger, registry, and store.
//!
//! [`Engine`] owns the full engine state and executes one [`Command`] at
//! a time. Callers serialize access (see [`crate::app::App`]); the engine
//! itself performs validation, mutation, and the write-through save as
//! one unit, restoring the pre-command state when the save fails so
//! memory never diverges from disk.

use tracing::{info, warn};

use crate::domain::{
    settlement, DomainError, Ledger, Market, MarketId, MarketRegistry, MarketStatus, Settlement,
    Stake,
};
use crate::error::Result;
use crate::store::{Snapshot, StateStore};

/// Status filter for market listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Open,
    Resolved,
    Cancelled,
    All,
}

impl StatusFilter {
    #[must_use]
    pub const fn as_status(self) -> Option<MarketStatus> {
        match self {
            Self::Open => Some(MarketStatus::Open),
            Self::Resolved => Some(MarketStatus::Resolved),
            Self::Cancelled => Some(MarketStatus::Cancelled),
            Self::All => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
            Self::All => "all",
        }
    }
}

/// The closed union of operations the engine accepts.
///
/// Outcome indices are 0-based here; the chat adapter converts from the
/// 1-based numbers participants type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Open {
        question: String,
        outcomes: Vec<String>,
    },
    Markets {
        filter: StatusFilter,
    },
    Market {
        id: MarketId,
    },
    Bet {
        id: MarketId,
        outcome_index: usize,
        amount: u64,
    },
    Resolve {
        id: MarketId,
        outcome_index: usize,
    },
    Cancel {
        id: MarketId,
    },
    Balance,
    Leaderboard {
        limit: usize,
    },
    Portfolio,
    Stats {
        target: Option<String>,
    },
}

impl Command {
    /// True when executing this command changes ledger or registry state.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Open { .. } | Self::Bet { .. } | Self::Resolve { .. } | Self::Cancel { .. }
        )
    }
}

/// One line of a market listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSummary {
    pub id: MarketId,
    pub status: MarketStatus,
    pub winner: Option<String>,
    pub question: String,
    pub pool: u64,
}

/// One outcome line of a market detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeLine {
    pub name: String,
    pub pooled: u64,
}

/// One of the caller's open stakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioEntry {
    pub market_id: MarketId,
    pub question: String,
    pub outcome: String,
    pub amount: u64,
}

/// Lifetime statistics for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub name: String,
    pub balance: u64,
    pub markets_created: u64,
    pub bets_placed: u64,
    pub lifetime_winnings: u64,
}

/// Typed result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Help,
    MarketOpened {
        id: MarketId,
        question: String,
        creator: String,
        outcomes: Vec<String>,
    },
    Markets {
        filter: StatusFilter,
        markets: Vec<MarketSummary>,
    },
    MarketDetail {
        id: MarketId,
        question: String,
        creator: String,
        status: MarketStatus,
        winner: Option<String>,
        pool: u64,
        outcomes: Vec<OutcomeLine>,
    },
    BetAccepted {
        id: MarketId,
        outcome: String,
        amount: u64,
        outcome_pool: u64,
        total_pool: u64,
    },
    Resolved {
        id: MarketId,
        outcome: String,
        settlement: Settlement,
    },
    Cancelled {
        id: MarketId,
    },
    Balance {
        name: String,
        balance: u64,
    },
    Leaderboard {
        rows: Vec<(String, u64)>,
    },
    Portfolio {
        entries: Vec<PortfolioEntry>,
    },
    Stats(StatsView),
}

/// The market/ledger state machine behind every transport.
pub struct Engine {
    ledger: Ledger,
    registry: MarketRegistry,
    store: Box<dyn StateStore>,
    starting_balance: u64,
    max_outcome_len: usize,
}

impl Engine {
    /// Create an engine with empty state.
    #[must_use]
    pub fn new(store: Box<dyn StateStore>, starting_balance: u64) -> Self {
        Self {
            ledger: Ledger::new(),
            registry: MarketRegistry::new(),
            store,
            starting_balance,
            max_outcome_len: crate::config::DEFAULT_MAX_OUTCOME_LEN,
        }
    }

    /// Create an engine from the store's last snapshot.
    pub fn load(
        store: Box<dyn StateStore>,
        starting_balance: u64,
        max_outcome_len: usize,
    ) -> Result<Self> {
        let snapshot = store.load()?;
        let (ledger, registry) = snapshot.into_state();
        info!(
            users = ledger.len(),
            markets = registry.len(),
            "engine state loaded"
        );
        Ok(Self {
            ledger,
            registry,
            store,
            starting_balance,
            max_outcome_len,
        })
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn registry(&self) -> &MarketRegistry {
        &self.registry
    }

    /// Execute one command on behalf of `caller`.
    ///
    /// The caller's account is created on first contact. Mutations are
    /// saved write-through; when the save fails, the in-memory state is
    /// rolled back and the command fails as a whole.
    pub fn execute(&mut self, caller: &str, command: Command) -> Result<Reply> {
        let new_account = self.ledger.account(caller).is_none();
        let rollback = if command.is_mutating() || new_account {
            Some((self.ledger.clone(), self.registry.clone()))
        } else {
            None
        };
        self.ledger.ensure_account(caller, self.starting_balance);

        let result = self.apply(caller, command);

        match (&result, rollback) {
            (Ok(_), Some((ledger, registry))) => {
                if let Err(err) = self
                    .store
                    .save(&Snapshot::capture(&self.ledger, &self.registry))
                {
                    warn!(error = %err, "snapshot save failed, rolling back command");
                    self.ledger = ledger;
                    self.registry = registry;
                    return Err(err);
                }
            }
            (Err(_), Some((ledger, registry))) => {
                // Failed validation may still have created the caller's
                // account; drop that too so errors have zero side effects.
                self.ledger = ledger;
                self.registry = registry;
            }
            _ => {}
        }

        result
    }

    fn apply(&mut self, caller: &str, command: Command) -> Result<Reply> {
        match command {
            Command::Help => Ok(Reply::Help),
            Command::Open { question, outcomes } => self.open_market(caller, question, outcomes),
            Command::Markets { filter } => Ok(self.list_markets(filter)),
            Command::Market { id } => self.market_detail(&id),
            Command::Bet {
                id,
                outcome_index,
                amount,
            } => self.place_bet(caller, &id, outcome_index, amount),
            Command::Resolve { id, outcome_index } => self.resolve(&id, outcome_index),
            Command::Cancel { id } => self.cancel(&id),
            Command::Balance => Ok(Reply::Balance {
                name: caller.to_string(),
                balance: self.ledger.balance(caller).unwrap_or(0),
            }),
            Command::Leaderboard { limit } => Ok(Reply::Leaderboard {
                rows: self
                    .ledger
                    .leaderboard(limit)
                    .into_iter()
                    .map(|(name, account)| (name.to_string(), account.balance))
                    .collect(),
            }),
            Command::Portfolio => Ok(self.portfolio(caller)),
            Command::Stats { target } => self.stats(caller, target),
        }
    }

    fn open_market(
        &mut self,
        caller: &str,
        question: String,
        outcomes: Vec<String>,
    ) -> Result<Reply> {
        // Peek the id so a failed validation does not burn a sequence slot.
        let id = MarketId::from_seq(self.registry.next_market_id());
        let market = Market::try_new(
            id.clone(),
            question,
            caller,
            outcomes,
            self.max_outcome_len,
        )?;
        let reply = Reply::MarketOpened {
            id: id.clone(),
            question: market.question().to_string(),
            creator: caller.to_string(),
            outcomes: market.outcomes().to_vec(),
        };
        self.registry.allocate_id();
        self.registry.insert(market);
        self.ledger.record_market_created(caller);
        info!(market = %id, creator = caller, "market opened");
        Ok(reply)
    }

    fn list_markets(&self, filter: StatusFilter) -> Reply {
        let markets = self
            .registry
            .list(filter.as_status())
            .into_iter()
            .map(|m| MarketSummary {
                id: m.id().clone(),
                status: m.status(),
                winner: m
                    .winning_outcome()
                    .map(|idx| m.outcomes()[idx].clone()),
                question: m.question().to_string(),
                pool: m.total_pool(),
            })
            .collect();
        Reply::Markets { filter, markets }
    }

    fn market_detail(&self, id: &MarketId) -> Result<Reply> {
        let market = self.registry.get(id)?;
        let pools = market.pool_by_outcome();
        Ok(Reply::MarketDetail {
            id: market.id().clone(),
            question: market.question().to_string(),
            creator: market.creator().to_string(),
            status: market.status(),
            winner: market
                .winning_outcome()
                .map(|idx| market.outcomes()[idx].clone()),
            pool: market.total_pool(),
            outcomes: market
                .outcomes()
                .iter()
                .zip(pools)
                .map(|(name, pooled)| OutcomeLine {
                    name: name.clone(),
                    pooled,
                })
                .collect(),
        })
    }

    fn place_bet(
        &mut self,
        caller: &str,
        id: &MarketId,
        outcome_index: usize,
        amount: u64,
    ) -> Result<Reply> {
        let market = self.registry.get_mut(id)?;
        // Validate before the debit so a rejected stake has no side
        // effects, and debit before recording so the points are escrowed.
        market.validate_stake(outcome_index, amount)?;
        self.ledger.debit(caller, amount)?;
        market.place_stake(Stake::new(caller, outcome_index, amount))?;
        self.ledger.record_bet_placed(caller);

        let pools = market.pool_by_outcome();
        info!(market = %id, bettor = caller, amount, "bet placed");
        Ok(Reply::BetAccepted {
            id: id.clone(),
            outcome: market.outcomes()[outcome_index].clone(),
            amount,
            outcome_pool: pools[outcome_index],
            total_pool: market.total_pool(),
        })
    }

    fn resolve(&mut self, id: &MarketId, outcome_index: usize) -> Result<Reply> {
        let market = self.registry.get_mut(id)?;
        let settlement = settlement::resolve(market, outcome_index, &mut self.ledger)?;
        let outcome = market.outcomes()[outcome_index].clone();
        info!(
            market = %id,
            outcome = %outcome,
            pool = settlement.total_pool,
            winners = settlement.payouts.len(),
            "market resolved"
        );
        Ok(Reply::Resolved {
            id: id.clone(),
            outcome,
            settlement,
        })
    }

    fn cancel(&mut self, id: &MarketId) -> Result<Reply> {
        let market = self.registry.get_mut(id)?;
        settlement::cancel(market, &mut self.ledger)?;
        info!(market = %id, "market cancelled");
        Ok(Reply::Cancelled { id: id.clone() })
    }

    fn portfolio(&self, caller: &str) -> Reply {
        let mut entries = Vec::new();
        for market in self.registry.list(Some(MarketStatus::Open)) {
            for stake in market.stakes().iter().filter(|s| s.bettor == caller) {
                entries.push(PortfolioEntry {
                    market_id: market.id().clone(),
                    question: market.question().to_string(),
                    outcome: market.outcomes()[stake.outcome_index].clone(),
                    amount: stake.amount,
                });
            }
        }
        Reply::Portfolio { entries }
    }

    fn stats(&self, caller: &str, target: Option<String>) -> Result<Reply> {
        let name = target.unwrap_or_else(|| caller.to_string());
        let account = self
            .ledger
            .account(&name)
            .ok_or_else(|| DomainError::UserNotFound { name: name.clone() })?;
        Ok(Reply::Stats(StatsView {
            name,
            balance: account.balance,
            markets_created: account.markets_created,
            bets_placed: account.bets_placed,
            lifetime_winnings: account.lifetime_winnings,
        }))
    }
}
