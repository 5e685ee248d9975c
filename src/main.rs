use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use bookie::adapter::{repl, signal::SignalConnector};
use bookie::app::App;
use bookie::cli::{Cli, Commands};
use bookie::config::Config;
use bookie::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    if let Some(state) = cli.state {
        config.state.path = state;
    }

    config.init_logging();
    info!("bookie starting");

    tokio::select! {
        result = run(cli.command, config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("bookie stopped");
}

async fn run(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Repl => {
            let app = App::from_config(&config)?;
            repl::run(&app).await
        }
        Commands::Signal(args) => {
            if let Some(url) = args.url {
                config.signal.service_url = url;
            }
            if let Some(number) = args.number {
                config.signal.phone_number = Some(number);
            }
            if let Some(poll) = args.poll {
                config.signal.poll_seconds = poll;
            }
            let app = App::from_config(&config)?;
            let connector = SignalConnector::new(&config.signal)?;
            connector.run(&app).await
        }
    }
}
