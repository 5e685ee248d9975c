//! Interactive simulation mode.
//!
//! Reads lines of the form `username: !command ...` from stdin and
//! prints the reply, mimicking a chat conversation locally.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::app::App;
use crate::error::Result;

pub async fn run(app: &App) -> Result<()> {
    println!("bookie REPL");
    println!("Enter messages as `username: !command ...` (Ctrl+C to exit).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        println!("{}", app.process_line(line));
    }

    info!("stdin closed, leaving REPL");
    Ok(())
}
