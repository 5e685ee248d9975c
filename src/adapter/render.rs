//! Reply rendering to chat text.
//!
//! Display conventions: pool shares are percentages with one decimal
//! place, or an em-dash when the pool is empty.

use crate::engine::{Reply, StatsView, StatusFilter};
use crate::error::Error;

/// Render the share of `part` in `total` as a percentage.
#[must_use]
pub fn percent(part: u64, total: u64) -> String {
    if total == 0 {
        "—".to_string()
    } else {
        format!("{:.1}%", part as f64 / total as f64 * 100.0)
    }
}

/// Help text listing every verb.
#[must_use]
pub const fn help_text() -> &'static str {
    "Prediction Market Commands:\n\
    • !open Question? | Option A | Option B  → create a new market\n\
    • !markets [open|resolved|cancelled|all] → list markets\n\
    • !market <id>                           → show details for a market\n\
    • !bet <id> <option #> <points>          → bet points on an outcome\n\
    • !resolve <id> <option #>               → resolve a market\n\
    • !cancel <id>                           → refund everyone and close\n\
    • !balance                               → view your points\n\
    • !portfolio                             → see your open bets\n\
    • !leaderboard [N]                       → top N balances (default 10)\n\
    • !stats [user]                          → lifetime stats (default self)\n\
    All users start with 1000 points. Bets are parimutuel: winners split the pool."
}

/// Render a successful reply.
#[must_use]
pub fn reply(reply: &Reply) -> String {
    match reply {
        Reply::Help => help_text().to_string(),
        Reply::MarketOpened {
            id,
            question,
            creator,
            outcomes,
        } => {
            let options = outcomes
                .iter()
                .enumerate()
                .map(|(i, name)| format!("{}. {name}", i + 1))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "Market {id} created by {creator}:\n{question}\nOptions:\n{options}\n\
                Place bets with `!bet {id} <option #> <points>`."
            )
        }
        Reply::Markets { filter, markets } => render_markets(*filter, markets),
        Reply::MarketDetail {
            id,
            question,
            creator,
            status,
            winner,
            pool,
            outcomes,
        } => {
            let status_line = match winner {
                Some(name) => format!("Status: {status} (Winner: {name})"),
                None => format!("Status: {status}"),
            };
            let options = outcomes
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    format!(
                        "{}. {} — {} pts ({})",
                        i + 1,
                        line.name,
                        line.pooled,
                        percent(line.pooled, *pool)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "{id} • {question}\nCreator: {creator}\n{status_line}\n\
                Pool: {pool} pts\nOptions:\n{options}"
            )
        }
        Reply::BetAccepted {
            id,
            outcome,
            amount,
            outcome_pool,
            total_pool,
        } => format!(
            "Bet accepted: {amount} pts on `{outcome}` in {id}.\n\
            Pool on this option: {outcome_pool} pts ({}). Total pool: {total_pool} pts.",
            percent(*outcome_pool, *total_pool)
        ),
        Reply::Resolved {
            id,
            outcome,
            settlement,
        } => {
            if settlement.refunded {
                format!(
                    "{id} resolved: {outcome} won, but no one bet on it. All points refunded."
                )
            } else {
                let winners = settlement
                    .payouts
                    .iter()
                    .map(|p| format!("{} (+{} pts)", p.bettor, p.amount))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{id} resolved: {outcome} wins. Payouts: {winners}.")
            }
        }
        Reply::Cancelled { id } => format!("{id} cancelled. All bets refunded."),
        Reply::Balance { name, balance } => format!("{name} balance: {balance} pts."),
        Reply::Leaderboard { rows } => {
            let mut lines = vec!["Points Leaderboard:".to_string()];
            for (i, (name, balance)) in rows.iter().enumerate() {
                lines.push(format!("{}. {name} — {balance} pts", i + 1));
            }
            lines.join("\n")
        }
        Reply::Portfolio { entries } => {
            if entries.is_empty() {
                "No open bets.".to_string()
            } else {
                let mut lines = vec!["Open bets:".to_string()];
                for entry in entries {
                    lines.push(format!(
                        "{} {} → {} ({} pts)",
                        entry.market_id, entry.question, entry.outcome, entry.amount
                    ));
                }
                lines.join("\n")
            }
        }
        Reply::Stats(view) => render_stats(view),
    }
}

fn render_markets(filter: StatusFilter, markets: &[crate::engine::MarketSummary]) -> String {
    if markets.is_empty() {
        return match filter {
            StatusFilter::All => "No markets yet.".to_string(),
            other => format!("No {} markets yet.", other.label()),
        };
    }
    markets
        .iter()
        .map(|m| {
            let status = match &m.winner {
                Some(winner) => format!("{} → {winner}", m.status),
                None => m.status.to_string(),
            };
            format!(
                "{} [{status}] {} (Pool: {} pts)",
                m.id, m.question, m.pool
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_stats(view: &StatsView) -> String {
    format!(
        "Stats for {}:\n\
        • Balance: {} pts\n\
        • Markets created: {}\n\
        • Bets placed: {}\n\
        • Lifetime winnings: {} pts",
        view.name, view.balance, view.markets_created, view.bets_placed, view.lifetime_winnings
    )
}

/// Render a failed command. Domain errors already carry a participant
/// facing message; everything else is an internal failure.
#[must_use]
pub fn error(err: &Error) -> String {
    match err {
        Error::Domain(domain) => format!("{domain}."),
        other => format!("Something went wrong, your command was not applied: {other}."),
    }
}
