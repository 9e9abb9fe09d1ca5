//! CLI module
//!
//! Command-line interface over [`Dhis2Client`](crate::client::Dhis2Client).
//!
//! # Commands
//!
//! - `list` - One page of a collection
//! - `iterate` - Every item of a collection, one per line
//! - `get` - A single metadata object
//! - `analytics` - Run an analytics query
//! - `pull-dvs` / `push-dvs` - Export or import data value sets
//! - `demo` - Quick tour against a live server

mod commands;
mod runner;

pub use commands::{parse_param, Cli, Commands};
pub use runner::Runner;

#[cfg(test)]
mod tests;
