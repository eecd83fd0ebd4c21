//! Pagination module
//!
//! Coordinates fetching sequential pages of a remote collection and presents
//! them as one continuously growing, race-free list.
//!
//! # Overview
//!
//! - [`PageSource`] supplies the fetch and extraction functions
//! - [`PagerConfig`] / [`PagerBuilder`] fix the accumulation policies
//! - [`Pager`] splits into a trigger handle, output streams and a driver future
//!
//! Fetches are strictly serialized per pager. A start-over supersedes the
//! active sequence and its in-flight fetch. Failed fetches are retried and
//! then treated as the end of data; no fetch error ever reaches the caller.

mod accumulator;
mod config;
mod cursor;
mod executor;
mod pager;
mod sequencer;
mod source;
mod types;

pub use accumulator::Accumulator;
pub use config::{
    append, dedup_by_key, ConcatFn, PagerBuilder, PagerConfig, TransformFn, DEFAULT_MAX_RETRIES,
};
pub use cursor::Cursor;
pub use executor::fetch_page;
pub use pager::{Pager, PagerDriver, PagerHandle, PagerOutputs};
pub use sequencer::{Completion, Phase, Sequencer};
pub use source::{FetchFirstFn, FetchNextFn, FnSource, ItemsFn, MoreUrlFn, PageSource};
pub use types::{FetchedPage, PageRequest, SequenceId, Termination};
