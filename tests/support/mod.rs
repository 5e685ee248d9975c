#![allow(dead_code)]

//! Shared helpers for integration tests.

use bookie::app::App;
use bookie::domain::MarketId;
use bookie::engine::{Command, Engine, Reply};
use bookie::store::MemoryStore;

/// Engine with an in-memory store and the default 1000-point allotment.
pub fn engine() -> Engine {
    Engine::new(Box::new(MemoryStore::new()), 1000)
}

/// App wrapping [`engine`].
pub fn app() -> App {
    App::new(engine())
}

/// Open a market and return its id.
pub fn open_market(engine: &mut Engine, creator: &str, outcomes: &[&str]) -> MarketId {
    let reply = engine
        .execute(
            creator,
            Command::Open {
                question: format!("Market by {creator}?"),
                outcomes: outcomes.iter().map(|s| s.to_string()).collect(),
            },
        )
        .expect("open market");
    match reply {
        Reply::MarketOpened { id, .. } => id,
        other => panic!("unexpected reply {other:?}"),
    }
}

/// Place a bet with a 1-based feel kept out: `outcome_index` is 0-based.
pub fn bet(engine: &mut Engine, bettor: &str, id: &MarketId, outcome_index: usize, amount: u64) {
    engine
        .execute(
            bettor,
            Command::Bet {
                id: id.clone(),
                outcome_index,
                amount,
            },
        )
        .expect("place bet");
}

/// Sum of every account balance in the engine's ledger.
pub fn total_points(engine: &Engine) -> u64 {
    engine.ledger().total_points()
}
