//! JSON-over-HTTP page source
//!
//! Fetches pages from a JSON API where each response carries an items array
//! and a link to the next page, e.g.
//!
//! ```json
//! { "projects": [ ... ], "urls": { "api": { "more_projects": "https://..." } } }
//! ```

use super::client::HttpClient;
use crate::error::{Error, Result};
use crate::pagination::PageSource;
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Page source over a JSON API
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: HttpClient,
    path: String,
    items_path: String,
    more_path: String,
    default_query: StringMap,
}

impl HttpSource {
    /// Create a source for `path` under the client's base URL
    pub fn new(
        client: HttpClient,
        path: impl Into<String>,
        items_path: impl Into<String>,
        more_path: impl Into<String>,
    ) -> Self {
        Self {
            client,
            path: path.into(),
            items_path: items_path.into(),
            more_path: more_path.into(),
            default_query: HashMap::new(),
        }
    }

    /// Add a query parameter sent with every first-page request
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_query.insert(key.into(), value.into());
        self
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl PageSource for HttpSource {
    type Params = StringMap;
    type Envelope = JsonValue;
    type Item = JsonValue;

    async fn fetch_first(&self, params: StringMap) -> Result<JsonValue> {
        let mut query = self.default_query.clone();
        query.extend(params);
        self.client.get_json(&self.path, &query).await
    }

    async fn fetch_next(&self, cursor: &str) -> Result<JsonValue> {
        let url = self.client.resolve_cursor(cursor)?;
        self.client.get_json(&url, &HashMap::new()).await
    }

    fn items(&self, envelope: &JsonValue) -> Vec<JsonValue> {
        let matches = match select_path(envelope, &self.items_path) {
            Ok(matches) => matches,
            Err(e) => {
                debug!("Cannot read items: {}", e);
                return Vec::new();
            }
        };
        // A single match holding an array is the items list itself
        match <[JsonValue; 1]>::try_from(matches) {
            Ok([JsonValue::Array(items)]) => items,
            Ok([_]) if !is_jsonpath(&self.items_path) => {
                debug!("Value at '{}' is not an array", self.items_path);
                Vec::new()
            }
            Ok([single]) => vec![single],
            Err(matches) => matches,
        }
    }

    fn more_url(&self, envelope: &JsonValue) -> Option<String> {
        let matches = select_path(envelope, &self.more_path).ok()?;
        let link = matches.first()?.as_str()?;
        if link.is_empty() {
            return None;
        }
        match self.client.absolutize(link) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Ignoring next-page link '{}': {}", link, e);
                None
            }
        }
    }
}

/// Check if a path needs the JSONPath engine (wildcards, indexes, filters)
fn is_jsonpath(path: &str) -> bool {
    path.contains(['[', '*', '?']) || path.contains("..")
}

/// Select every value matched by `path`
///
/// Plain dotted field paths are looked up directly with [`extract_path`].
/// Paths with wildcards, indexes or filters (`$.data[*]`, `$.links[0].href`)
/// go through jsonpath-rust; a missing `$` root is added.
pub fn select_path(value: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    let path = path.trim();
    if !is_jsonpath(path) {
        return Ok(extract_path(value, path).cloned().into_iter().collect());
    }

    use jsonpath_rust::JsonPath;

    let rooted = if path.starts_with('$') {
        path.to_string()
    } else {
        format!("$.{path}")
    };
    let jp = JsonPath::try_from(rooted.as_str()).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath '{path}': {e}"),
    })?;

    match jp.find(value) {
        JsonValue::Array(matches) => Ok(matches),
        JsonValue::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}

/// Check that a path can be evaluated
pub fn check_path(path: &str) -> Result<()> {
    select_path(&JsonValue::Null, path).map(|_| ())
}

/// Follow a dotted field path (`$.` prefix optional) into a JSON value
///
/// `$` or an empty path selects the root. Only object fields are followed;
/// use [`select_path`] for indexes and wildcards.
pub fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.trim();
    if path.is_empty() || path == "$" {
        return Some(value);
    }
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
