//! The payout-distribution algorithm.
//!
//! Parimutuel settlement: when a market resolves, the entire pool is
//! split among stakes on the winning outcome, each winner weighted by
//! their fraction of the winning-side total. Payouts use integer floor
//! division, and the shortfall that floor division leaves behind is
//! handed back one point at a time, round-robin over the winners sorted
//! by payout descending with ties kept in original stake order. The sum
//! of final payouts therefore equals the pool exactly.
//!
//! Two refund paths conserve the pool without winners: cancellation, and
//! the degenerate resolution where nobody staked the winning outcome.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::ledger::Ledger;
use super::market::Market;

/// One winner's share of a settled pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub bettor: String,
    pub amount: u64,
}

/// Summary of an applied settlement, used for rendering the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Index of the winning outcome; `None` for a cancellation.
    pub winning_outcome: Option<usize>,
    pub total_pool: u64,
    /// Per-winner payouts in distribution order. Empty when the pool was
    /// refunded instead.
    pub payouts: Vec<Payout>,
    /// True when every stake was returned to its bettor.
    pub refunded: bool,
}

/// Resolve an open market and apply the pro-rata distribution.
///
/// Validates the transition first; on error neither the market nor the
/// ledger is touched. On success every point of the pool has been
/// credited back out: to winners (counted as winnings) or, when the
/// winning outcome carried no stakes, to every bettor as a refund.
pub fn resolve(
    market: &mut Market,
    winning_index: usize,
    ledger: &mut Ledger,
) -> Result<Settlement, DomainError> {
    market.transition_resolved(winning_index)?;

    let total_pool = market.total_pool();
    let winners_total: u64 = market
        .stakes()
        .iter()
        .filter(|s| s.outcome_index == winning_index)
        .map(|s| s.amount)
        .sum();

    if winners_total == 0 {
        // Nobody backed the winner: return every stake untouched.
        refund_all(market, ledger);
        return Ok(Settlement {
            winning_outcome: Some(winning_index),
            total_pool,
            payouts: Vec::new(),
            refunded: true,
        });
    }

    let payouts = distribute(market, winning_index, total_pool, winners_total);
    for payout in &payouts {
        ledger.credit(&payout.bettor, payout.amount, true);
    }

    Ok(Settlement {
        winning_outcome: Some(winning_index),
        total_pool,
        payouts,
        refunded: false,
    })
}

/// Cancel an open market, refunding every stake.
pub fn cancel(market: &mut Market, ledger: &mut Ledger) -> Result<Settlement, DomainError> {
    market.transition_cancelled()?;
    let total_pool = market.total_pool();
    refund_all(market, ledger);

    Ok(Settlement {
        winning_outcome: None,
        total_pool,
        payouts: Vec::new(),
        refunded: true,
    })
}

fn refund_all(market: &Market, ledger: &mut Ledger) {
    for stake in market.stakes() {
        ledger.credit(&stake.bettor, stake.amount, false);
    }
}

/// Compute floored pro-rata payouts, then hand out the remainder.
fn distribute(
    market: &Market,
    winning_index: usize,
    total_pool: u64,
    winners_total: u64,
) -> Vec<Payout> {
    let mut payouts: Vec<Payout> = Vec::new();
    let mut distributed: u64 = 0;
    for stake in market
        .stakes()
        .iter()
        .filter(|s| s.outcome_index == winning_index)
    {
        // Widen before multiplying: stake * pool can exceed u64.
        let share = (u128::from(stake.amount) * u128::from(total_pool)
            / u128::from(winners_total)) as u64;
        distributed += share;
        payouts.push(Payout {
            bettor: stake.bettor.clone(),
            amount: share,
        });
    }

    // sort_by_key is stable: equal payouts keep original stake order, so
    // the round-robin walk below is deterministic.
    payouts.sort_by_key(|p| std::cmp::Reverse(p.amount));

    let mut remainder = total_pool - distributed;
    let mut idx = 0;
    let len = payouts.len();
    while remainder > 0 {
        payouts[idx % len].amount += 1;
        remainder -= 1;
        idx += 1;
    }

    payouts
}
