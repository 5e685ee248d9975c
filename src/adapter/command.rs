//! Chat command parsing.
//!
//! Numeric arguments are validated here and 1-based outcome numbers are
//! converted to the 0-based indices the engine expects. Everything else
//! (balances, market status, outcome ranges) is validated by the domain.

use crate::domain::MarketId;
use crate::engine::{Command, StatusFilter};

/// Leaderboard size bounds: `!leaderboard [N]` is clamped into this range.
const LEADERBOARD_MIN: usize = 1;
const LEADERBOARD_MAX: usize = 50;
const LEADERBOARD_DEFAULT: usize = 10;

/// Parse error for chat command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    EmptyCommand,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidNumber {
        arg: &'static str,
        value: String,
    },
    InvalidFilter(String),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "commands must start with `!`"),
            Self::EmptyCommand => write!(f, "empty command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
            Self::MissingArgument(name) => write!(f, "missing argument `{name}`"),
            Self::InvalidNumber { arg, value } => {
                write!(f, "`{arg}` must be a number, got `{value}`")
            }
            Self::InvalidFilter(value) => write!(
                f,
                "status must be one of open, resolved, cancelled, all, got `{value}`"
            ),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Split a REPL line `username: !command ...` into identity and message.
#[must_use]
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let (user, message) = line.split_once(':')?;
    let user = user.trim();
    if user.is_empty() {
        return None;
    }
    Some((user, message.trim()))
}

/// Parse one chat message into an engine command.
pub fn parse_message(text: &str) -> Result<Command, CommandParseError> {
    let text = text.trim();
    let Some(body) = text.strip_prefix('!') else {
        return Err(CommandParseError::NotACommand);
    };

    let body = body.trim_start();
    let (raw_verb, rest) = body
        .split_once(char::is_whitespace)
        .unwrap_or((body, ""));
    if raw_verb.is_empty() {
        return Err(CommandParseError::EmptyCommand);
    }
    let verb = raw_verb.to_lowercase();
    let argline = rest.trim();

    match verb.as_str() {
        "help" | "commands" => Ok(Command::Help),
        "open" => parse_open(argline),
        "markets" => parse_markets(argline),
        "market" => Ok(Command::Market {
            id: parse_market_id(argline)?,
        }),
        "bet" => parse_bet(argline),
        "resolve" => parse_resolve(argline),
        "cancel" => Ok(Command::Cancel {
            id: parse_market_id(argline)?,
        }),
        "balance" => Ok(Command::Balance),
        "leaderboard" => parse_leaderboard(argline),
        "portfolio" => Ok(Command::Portfolio),
        "stats" => Ok(Command::Stats {
            target: (!argline.is_empty()).then(|| argline.to_string()),
        }),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_open(argline: &str) -> Result<Command, CommandParseError> {
    if !argline.contains('|') {
        return Err(CommandParseError::MissingArgument(
            "outcomes (use `!open Question? | Yes | No`)",
        ));
    }
    let mut segments = argline.split('|').map(str::trim);
    let question = segments.next().unwrap_or("").to_string();
    let outcomes: Vec<String> = segments
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    Ok(Command::Open { question, outcomes })
}

fn parse_markets(argline: &str) -> Result<Command, CommandParseError> {
    let filter = match argline.to_lowercase().as_str() {
        "" | "open" => StatusFilter::Open,
        "resolved" => StatusFilter::Resolved,
        "cancelled" => StatusFilter::Cancelled,
        "all" => StatusFilter::All,
        other => return Err(CommandParseError::InvalidFilter(other.to_string())),
    };
    Ok(Command::Markets { filter })
}

fn parse_bet(argline: &str) -> Result<Command, CommandParseError> {
    let mut parts = argline.split_whitespace();
    let id = parse_market_id(parts.next().unwrap_or(""))?;
    let outcome_index = parse_outcome_number(
        parts
            .next()
            .ok_or(CommandParseError::MissingArgument("option #"))?,
    )?;
    let amount_raw = parts
        .next()
        .ok_or(CommandParseError::MissingArgument("points"))?;
    let amount = amount_raw
        .parse::<u64>()
        .map_err(|_| CommandParseError::InvalidNumber {
            arg: "points",
            value: amount_raw.to_string(),
        })?;
    Ok(Command::Bet {
        id,
        outcome_index,
        amount,
    })
}

fn parse_resolve(argline: &str) -> Result<Command, CommandParseError> {
    let mut parts = argline.split_whitespace();
    let id = parse_market_id(parts.next().unwrap_or(""))?;
    let outcome_index = parse_outcome_number(
        parts
            .next()
            .ok_or(CommandParseError::MissingArgument("option #"))?,
    )?;
    Ok(Command::Resolve { id, outcome_index })
}

fn parse_leaderboard(argline: &str) -> Result<Command, CommandParseError> {
    let limit = if argline.is_empty() {
        LEADERBOARD_DEFAULT
    } else {
        let n = argline
            .parse::<usize>()
            .map_err(|_| CommandParseError::InvalidNumber {
                arg: "limit",
                value: argline.to_string(),
            })?;
        n.clamp(LEADERBOARD_MIN, LEADERBOARD_MAX)
    };
    Ok(Command::Leaderboard { limit })
}

fn parse_market_id(raw: &str) -> Result<MarketId, CommandParseError> {
    if raw.is_empty() {
        return Err(CommandParseError::MissingArgument("market id"));
    }
    Ok(MarketId::from(raw))
}

/// Parse a 1-based outcome number into a 0-based index.
fn parse_outcome_number(raw: &str) -> Result<usize, CommandParseError> {
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CommandParseError::InvalidNumber {
            arg: "option #",
            value: raw.to_string(),
        })
}
