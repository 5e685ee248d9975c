//! Bookie - a ledger-backed parimutuel betting engine.
//!
//! Participants open markets with named outcomes, stake points on an
//! outcome, and an adjudicator resolves the market. Stakes on losing
//! outcomes are redistributed to winners in proportion to stake size;
//! deterministic remainder distribution keeps the pool exact under
//! integer floor division.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files with env overrides
//! - [`domain`] - Core state machine: ledger, markets, settlement
//! - [`store`] - Durable snapshot persistence with pluggable backends
//! - [`engine`] - Command execution over ledger + registry + store
//! - [`app`] - The serialized command loop shared by all transports
//! - [`adapter`] - Chat-line parsing, reply rendering, transports
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use bookie::engine::{Command, Engine};
//! use bookie::store::MemoryStore;
//!
//! let mut engine = Engine::new(Box::new(MemoryStore::new()), 1000);
//! let reply = engine.execute(
//!     "alice",
//!     Command::Open {
//!         question: "Will it rain tomorrow?".into(),
//!         outcomes: vec!["Yes".into(), "No".into()],
//!     },
//! );
//! assert!(reply.is_ok());
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod store;
