//! End-to-end properties of the betting engine.

mod support;

use bookie::engine::{Command, Reply, StatusFilter};
use support::{app, bet, engine, open_market, total_points};

#[test]
fn points_are_conserved_across_mixed_lifecycles() {
    let mut engine = engine();

    // Three participants, three markets: resolve, cancel, leave open.
    let m1 = open_market(&mut engine, "alice", &["A", "B"]);
    let m2 = open_market(&mut engine, "bob", &["X", "Y", "Z"]);
    let m3 = open_market(&mut engine, "carol", &["Yes", "No"]);

    bet(&mut engine, "alice", &m1, 0, 137);
    bet(&mut engine, "bob", &m1, 0, 263);
    bet(&mut engine, "carol", &m1, 1, 500);
    bet(&mut engine, "alice", &m2, 2, 99);
    bet(&mut engine, "bob", &m2, 1, 1);
    bet(&mut engine, "carol", &m3, 0, 250);

    // 3 accounts * 1000, regardless of the stakes in flight: escrowed
    // points live in market pools, and the open pools account for the
    // difference.
    let escrowed: u64 = 137 + 263 + 500 + 99 + 1 + 250;
    assert_eq!(total_points(&engine), 3000 - escrowed);

    engine
        .execute(
            "alice",
            Command::Resolve {
                id: m1.clone(),
                outcome_index: 0,
            },
        )
        .unwrap();
    engine
        .execute("bob", Command::Cancel { id: m2.clone() })
        .unwrap();

    // Only m3's pool remains escrowed.
    assert_eq!(total_points(&engine), 3000 - 250);
}

#[test]
fn pro_rata_payout_updates_balances() {
    let mut engine = engine();
    let id = open_market(&mut engine, "judge", &["A", "B"]);
    bet(&mut engine, "user1", &id, 0, 300);
    bet(&mut engine, "user2", &id, 0, 100);
    bet(&mut engine, "user3", &id, 1, 200);

    let reply = engine
        .execute(
            "judge",
            Command::Resolve {
                id,
                outcome_index: 0,
            },
        )
        .unwrap();

    match reply {
        Reply::Resolved { settlement, .. } => {
            assert_eq!(settlement.total_pool, 600);
            let paid: u64 = settlement.payouts.iter().map(|p| p.amount).sum();
            assert_eq!(paid, 600);
        }
        other => panic!("unexpected reply {other:?}"),
    }

    assert_eq!(engine.ledger().balance("user1"), Some(1150));
    assert_eq!(engine.ledger().balance("user2"), Some(1050));
    assert_eq!(engine.ledger().balance("user3"), Some(800));
    assert_eq!(
        engine.ledger().account("user1").unwrap().lifetime_winnings,
        450
    );
}

#[test]
fn degenerate_resolution_refunds_without_winnings() {
    let mut engine = engine();
    let id = open_market(&mut engine, "judge", &["A", "B"]);
    bet(&mut engine, "u1", &id, 1, 300);
    bet(&mut engine, "u2", &id, 1, 100);

    engine
        .execute(
            "judge",
            Command::Resolve {
                id,
                outcome_index: 0,
            },
        )
        .unwrap();

    for name in ["u1", "u2"] {
        let account = engine.ledger().account(name).unwrap();
        assert_eq!(account.balance, 1000);
        assert_eq!(account.lifetime_winnings, 0);
    }
}

#[test]
fn balances_never_go_negative() {
    let mut engine = engine();
    let id = open_market(&mut engine, "alice", &["A", "B"]);

    bet(&mut engine, "bob", &id, 0, 1000);
    // bob is now at zero; any further stake must fail cleanly.
    let err = engine.execute(
        "bob",
        Command::Bet {
            id: id.clone(),
            outcome_index: 1,
            amount: 1,
        },
    );
    assert!(err.is_err());
    assert_eq!(engine.ledger().balance("bob"), Some(0));
    assert_eq!(engine.registry().get(&id).unwrap().stakes().len(), 1);
}

#[test]
fn terminal_markets_reject_all_mutations_without_state_change() {
    let mut engine = engine();
    let id = open_market(&mut engine, "alice", &["A", "B"]);
    bet(&mut engine, "bob", &id, 0, 100);
    engine
        .execute(
            "alice",
            Command::Resolve {
                id: id.clone(),
                outcome_index: 0,
            },
        )
        .unwrap();

    let ledger_before = engine.ledger().clone();

    assert!(engine
        .execute(
            "alice",
            Command::Resolve {
                id: id.clone(),
                outcome_index: 1,
            },
        )
        .is_err());
    assert!(engine
        .execute("alice", Command::Cancel { id: id.clone() })
        .is_err());
    assert!(engine
        .execute(
            "bob",
            Command::Bet {
                id: id.clone(),
                outcome_index: 0,
                amount: 10,
            },
        )
        .is_err());

    assert_eq!(engine.ledger(), &ledger_before);
    assert_eq!(engine.registry().get(&id).unwrap().stakes().len(), 1);
}

#[test]
fn leaderboard_reflects_settled_winnings() {
    let mut engine = engine();
    let id = open_market(&mut engine, "judge", &["A", "B"]);
    bet(&mut engine, "winner", &id, 0, 500);
    bet(&mut engine, "loser", &id, 1, 500);
    engine
        .execute(
            "judge",
            Command::Resolve {
                id,
                outcome_index: 0,
            },
        )
        .unwrap();

    match engine
        .execute("judge", Command::Leaderboard { limit: 2 })
        .unwrap()
    {
        Reply::Leaderboard { rows } => {
            assert_eq!(rows[0], ("winner".to_string(), 1500));
            assert_eq!(rows[1].1, 1000); // judge never staked
        }
        other => panic!("unexpected reply {other:?}"),
    }
}

#[test]
fn listing_is_newest_first() {
    let mut engine = engine();
    let _m1 = open_market(&mut engine, "alice", &["A", "B"]);
    let m2 = open_market(&mut engine, "alice", &["C", "D"]);

    match engine
        .execute(
            "alice",
            Command::Markets {
                filter: StatusFilter::All,
            },
        )
        .unwrap()
    {
        Reply::Markets { markets, .. } => {
            assert_eq!(markets.len(), 2);
            assert_eq!(markets[0].id, m2);
        }
        other => panic!("unexpected reply {other:?}"),
    }
}

#[test]
fn chat_flow_matches_expected_texts() {
    let app = app();

    app.process_line("alice: !open Lunch spot? | Tacos | Ramen | Pizza");
    app.process_line("bob: !bet MKT0001 1 400");
    app.process_line("carol: !bet MKT0001 2 100");

    let detail = app.process_line("dave: !market MKT0001");
    assert!(detail.contains("1. Tacos — 400 pts (80.0%)"));
    assert!(detail.contains("2. Ramen — 100 pts (20.0%)"));
    assert!(detail.contains("3. Pizza — 0 pts (0.0%)"));

    let portfolio = app.process_line("bob: !portfolio");
    assert!(portfolio.contains("MKT0001"));
    assert!(portfolio.contains("Tacos (400 pts)"));

    let resolved = app.process_line("alice: !resolve MKT0001 1");
    assert!(resolved.contains("Tacos wins"));
    assert!(resolved.contains("bob (+500 pts)"));

    let stats = app.process_line("bob: !stats");
    assert!(stats.contains("Lifetime winnings: 500 pts"));
}
