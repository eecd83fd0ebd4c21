//! Fetch executor
//!
//! Performs exactly one page fetch: dispatch by params or cursor, immediate
//! retries, cursor extraction, item extraction and the optional page
//! transform. Errors never leave this function; when every attempt fails the
//! result is an empty page carrying the failure.

use super::config::PagerConfig;
use super::cursor::Cursor;
use super::source::PageSource;
use super::types::{FetchedPage, PageRequest};
use tracing::{debug, warn};

/// Fetch one page, retrying failures up to `config.max_retries()` times
pub async fn fetch_page<S: PageSource>(
    config: &PagerConfig<S>,
    request: &PageRequest<S::Params>,
) -> FetchedPage<S::Item> {
    let source = config.source();
    let max_attempts = config.max_retries().saturating_add(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let result = match request {
            PageRequest::First(params) => source.fetch_first(params.clone()).await,
            PageRequest::Next(cursor) => source.fetch_next(cursor.as_str()).await,
        };

        match result {
            Ok(envelope) => return extract_page(config, &envelope),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "Page fetch failed, attempt {}/{}, retrying: {}",
                    attempt, max_attempts, e
                );
            }
            Err(e) => {
                warn!(
                    "Page fetch failed after {} attempts, ending pagination: {}",
                    attempt, e
                );
                return FetchedPage::exhausted(attempt, e.to_string());
            }
        }
    }
}

/// Turn a successful envelope into a page
///
/// The cursor is derived before items are extracted and transformed.
fn extract_page<S: PageSource>(
    config: &PagerConfig<S>,
    envelope: &S::Envelope,
) -> FetchedPage<S::Item> {
    let source = config.source();

    let cursor = source
        .more_url(envelope)
        .and_then(|url| Cursor::from_more_url(&url));

    let mut items = source.items(envelope);
    if let Some(transform) = config.page_transform() {
        items = transform(items);
    }

    debug!(
        "Fetched page with {} items, next cursor: {}",
        items.len(),
        cursor.as_ref().map_or("<none>", Cursor::as_str)
    );

    FetchedPage::loaded(items, cursor)
}
