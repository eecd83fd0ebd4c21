//! HTTP module
//!
//! A ready-made page source for JSON APIs.
//!
//! # Features
//!
//! - **JSON Page Source**: `HttpSource` implements `PageSource` over any JSON
//!   API that returns an items array and a next-page link
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Item Paths**: dotted field paths, or JSONPath via jsonpath-rust for
//!   wildcards and indexes
//! - **Cursor Resolution**: Cursors are resolved against the base URL's origin

mod client;
mod rate_limit;
mod source;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use source::{check_path, extract_path, select_path, HttpSource};

#[cfg(test)]
mod tests;
