//! The serialized command loop shared by all transports.

use parking_lot::Mutex;
use tracing::debug;

use crate::adapter::{command, render};
use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::store::JsonFileStore;

/// Wraps the engine in the single global mutual-exclusion scope.
///
/// Every mutating command runs validate → mutate → persist under one
/// lock acquisition, so concurrent transports never observe points
/// debited without the stake recorded, or a market mid-resolution.
pub struct App {
    engine: Mutex<Engine>,
}

impl App {
    /// Build the app from configuration, loading the last snapshot.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = JsonFileStore::new(config.state.path.clone());
        let engine = Engine::load(
            Box::new(store),
            config.engine.starting_balance,
            config.engine.max_outcome_len,
        )?;
        Ok(Self::new(engine))
    }

    /// Wrap an already constructed engine.
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Process one chat message from `user`, returning the reply text.
    pub fn process_message(&self, user: &str, message: &str) -> String {
        let user = user.trim();
        if user.is_empty() {
            return "Missing user identifier.".to_string();
        }

        let command = match command::parse_message(message) {
            Ok(command) => command,
            Err(err) => return format!("{err}. Try `!help`."),
        };

        debug!(user, ?command, "executing command");
        let result = self.engine.lock().execute(user, command);
        match result {
            Ok(reply) => render::reply(&reply),
            Err(err) => render::error(&err),
        }
    }

    /// Process one REPL line of the form `username: !command ...`.
    pub fn process_line(&self, line: &str) -> String {
        match command::split_line(line) {
            Some((user, message)) => self.process_message(user, message),
            None => "Format: username: !command ...".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn app() -> App {
        App::new(Engine::new(Box::new(MemoryStore::new()), 1000))
    }

    #[test]
    fn full_round_trip_through_text() {
        let app = app();

        let opened = app.process_line("alice: !open Who wins? | A | B");
        assert!(opened.contains("Market MKT0001 created by alice"));

        let bet = app.process_line("bob: !bet MKT0001 1 300");
        assert!(bet.contains("Bet accepted: 300 pts on `A` in MKT0001."));

        let resolved = app.process_line("alice: !resolve MKT0001 1");
        assert!(resolved.contains("MKT0001 resolved: A wins."));
        assert!(resolved.contains("bob (+300 pts)"));

        let balance = app.process_line("bob: !balance");
        assert_eq!(balance, "bob balance: 1000 pts.");
    }

    #[test]
    fn parse_errors_point_at_help() {
        let app = app();
        assert_eq!(
            app.process_line("alice: hello"),
            "commands must start with `!`. Try `!help`."
        );
        assert!(app
            .process_line("alice: !wager 100")
            .starts_with("unknown command `wager`."));
    }

    #[test]
    fn domain_errors_come_back_as_text() {
        let app = app();
        app.process_line("alice: !open Q? | A | B");
        let reply = app.process_line("bob: !bet MKT0001 1 5000");
        assert_eq!(
            reply,
            "insufficient points: balance is 1000, tried to stake 5000."
        );
    }

    #[test]
    fn missing_user_or_bad_format_rejected() {
        let app = app();
        assert_eq!(app.process_message("  ", "!balance"), "Missing user identifier.");
        assert_eq!(
            app.process_line("no command marker"),
            "Format: username: !command ..."
        );
    }
}
