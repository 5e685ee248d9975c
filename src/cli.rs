//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bookie - a ledger-backed parimutuel betting engine.
#[derive(Parser, Debug)]
#[command(name = "bookie")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override the state snapshot path
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive REPL (reads `username: !command` lines)
    Repl,

    /// Run the Signal connector (requires signal-cli-rest-api)
    Signal(SignalArgs),
}

#[derive(Args, Debug)]
pub struct SignalArgs {
    /// signal-cli-rest-api base URL (overrides config and SIGNAL_SERVICE_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Bot phone number registered with signal-cli (overrides config and SIGNAL_NUMBER)
    #[arg(long)]
    pub number: Option<String>,

    /// Receive long-poll timeout in seconds
    #[arg(long)]
    pub poll: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_signal_overrides() {
        let cli = Cli::parse_from([
            "bookie", "signal", "--number", "+15550001", "--poll", "30",
        ]);
        match cli.command {
            Commands::Signal(args) => {
                assert_eq!(args.number.as_deref(), Some("+15550001"));
                assert_eq!(args.poll, Some(30));
                assert_eq!(args.url, None);
            }
            Commands::Repl => panic!("expected signal subcommand"),
        }
    }

    #[test]
    fn parse_global_state_override() {
        let cli = Cli::parse_from(["bookie", "repl", "--state", "/tmp/s.json"]);
        assert_eq!(cli.state.as_deref(), Some(std::path::Path::new("/tmp/s.json")));
    }
}
