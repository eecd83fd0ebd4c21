//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Pager CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through a JSON collection and print the accumulated items
    Fetch(FetchArgs),

    /// Validate a source definition
    Validate {
        /// Source definition file (YAML)
        source: PathBuf,
    },
}

/// Arguments of the `fetch` command
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Source definition file (YAML)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Base URL (overrides the source file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// First-page path under the base URL
    #[arg(long)]
    pub path: Option<String>,

    /// Dotted path to the items array
    #[arg(long)]
    pub items_path: Option<String>,

    /// Dotted path to the next-page URL
    #[arg(long)]
    pub more_path: Option<String>,

    /// First-page query parameter (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Stop after this many pages (0 = until the end)
    #[arg(long, default_value = "0")]
    pub max_pages: u32,

    /// Retries after a failed page fetch
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Parse a `KEY=VALUE` argument
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{s}'"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
