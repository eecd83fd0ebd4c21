//! Cursor extraction from "more" URLs

use std::fmt;
use tracing::debug;
use url::Url;

/// Locator for the next page: path and query of the envelope's "more" URL
///
/// Example: `https://api.example.com/v1/things?page=2&per=20` yields
/// `/v1/things?page=2&per=20`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Create a cursor from an already-derived path and query
    pub fn new(path_and_query: impl Into<String>) -> Self {
        Self(path_and_query.into())
    }

    /// Derive a cursor from an absolute "more" URL
    ///
    /// Returns `None` for anything that does not parse as an absolute URL with
    /// a path, which the pager treats as "no further pages".
    pub fn from_more_url(raw: &str) -> Option<Self> {
        let url = match Url::parse(raw.trim()) {
            Ok(url) => url,
            Err(e) => {
                debug!("Ignoring malformed more URL '{}': {}", raw, e);
                return None;
            }
        };

        if url.cannot_be_a_base() {
            debug!("Ignoring more URL without a path: '{}'", raw);
            return None;
        }

        let cursor = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        Some(Self(cursor))
    }

    /// The path and query as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the cursor and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cursor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
