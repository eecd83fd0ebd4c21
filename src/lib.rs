// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy Pager
//!
//! A race-free pagination engine for remote collections.
//!
//! The pager coordinates fetching sequential pages, follows opaque
//! next-page cursors, retries transient failures and exposes a single
//! continuously growing list.
//!
//! ## Features
//!
//! - **Serialized Fetching**: At most one fetch in flight per pager
//! - **Start-Over Safety**: A new sequence supersedes the old one; stale pages never leak in
//! - **Cursor Following**: Next-page cursors derived from "more" URLs
//! - **Quiet Failures**: Failed pages are retried, then treated as end-of-data
//! - **Pluggable Accumulation**: Append, de-duplicate, or any custom concat
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_pager::pagination::{Pager, PagerBuilder};
//! use futures::StreamExt;
//!
//! let config = PagerBuilder::new()
//!     .fetch_first(|params: Query| async move { api.discover(params).await })
//!     .fetch_next(|cursor| async move { api.discover_more(&cursor).await })
//!     .items(|env: &DiscoverEnvelope| env.projects.clone())
//!     .more_url(|env: &DiscoverEnvelope| env.urls.more_projects.clone())
//!     .build()?;
//!
//! let Pager { handle, mut outputs, driver } = Pager::new(config);
//! tokio::spawn(driver.run());
//!
//! handle.start_over(Query::default());
//! while let Some(projects) = outputs.data.next().await {
//!     render(&projects);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ PagerHandle: start_over(params) / next_page() / dispose()     │
//! └───────────────────────────────┬───────────────────────────────┘
//!                                 │ triggers
//! ┌───────────────────────────────┴───────────────────────────────┐
//! │ PagerDriver                                                   │
//! │  Sequencer ──► Fetch Executor ──► Accumulator                 │
//! │  (phases)      (retry, cursor)    (concat, distinct)          │
//! └───────────────────────────────┬───────────────────────────────┘
//!                                 │ PagerOutputs
//!        data · is_fetching · current_page · terminations
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pagination engine
pub mod pagination;

/// HTTP-backed page source
pub mod http;

/// Source definitions loaded from YAML
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use pagination::{
    Pager, PagerBuilder, PagerConfig, PagerDriver, PagerHandle, PagerOutputs, PageSource,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
