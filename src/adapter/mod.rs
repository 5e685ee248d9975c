//! Transport-facing adapters.
//!
//! The chat contract is one line of text, `<identity>: !<verb> <args>`,
//! shared by every transport. [`command`] parses the message half into a
//! typed [`crate::engine::Command`], [`render`] turns typed replies back
//! into chat text, and [`repl`]/[`signal`] are the two transports.

pub mod command;
pub mod render;
pub mod repl;
pub mod signal;
