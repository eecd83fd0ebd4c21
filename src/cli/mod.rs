//! CLI module
//!
//! Command-line interface for paging through JSON collections.
//!
//! # Commands
//!
//! - `fetch` - Page through a collection and print the accumulated items
//! - `validate` - Check a source definition file

mod commands;
mod runner;

pub use commands::{parse_key_val, Cli, Commands, FetchArgs};
pub use runner::{FetchReport, Runner};
