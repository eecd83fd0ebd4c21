//! Pager configuration
//!
//! [`PagerConfig`] is an immutable bundle of a [`PageSource`] and the
//! accumulation policies. It is created either from a source implementation
//! (infallible) or through [`PagerBuilder`], which validates that all four
//! collaborator functions were supplied.

use super::source::{FetchFirstFn, FetchNextFn, FnSource, ItemsFn, MoreUrlFn, PageSource};
use crate::error::{Error, Result};
use futures::FutureExt;
use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

/// Default number of retries after a failed fetch
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Combines the accumulated list with a newly fetched page
pub type ConcatFn<T> = Arc<dyn Fn(Vec<T>, Vec<T>) -> Vec<T> + Send + Sync>;

/// Transforms the items of a page before accumulation
pub type TransformFn<T> = Arc<dyn Fn(Vec<T>) -> Vec<T> + Send + Sync>;

/// Default concat policy: append the page to the accumulated list
pub fn append<T: Send + Sync + 'static>() -> ConcatFn<T> {
    Arc::new(|mut acc: Vec<T>, page: Vec<T>| {
        acc.extend(page);
        acc
    })
}

/// Concat policy that drops page items whose key is already present
///
/// The first occurrence wins, so existing items keep their position.
pub fn dedup_by_key<T, K, F>(key: F) -> ConcatFn<T>
where
    T: Send + Sync + 'static,
    K: Eq + Hash,
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    Arc::new(move |mut acc: Vec<T>, page: Vec<T>| {
        let mut seen: HashSet<K> = acc.iter().map(&key).collect();
        for item in page {
            if seen.insert(key(&item)) {
                acc.push(item);
            }
        }
        acc
    })
}

/// Immutable configuration of a pager
pub struct PagerConfig<S: PageSource> {
    source: Arc<S>,
    page_transform: Option<TransformFn<S::Item>>,
    concat: ConcatFn<S::Item>,
    clear_on_start_over: bool,
    distinct_until_changed: bool,
    max_retries: u32,
}

impl<S: PageSource> PagerConfig<S> {
    /// Create a config with default policies around a page source
    pub fn from_source(source: S) -> Self {
        Self::from_shared_source(Arc::new(source))
    }

    /// Create a config around a shared page source
    pub fn from_shared_source(source: Arc<S>) -> Self {
        Self {
            source,
            page_transform: None,
            concat: append(),
            clear_on_start_over: false,
            distinct_until_changed: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set a transform applied to every page's items
    #[must_use]
    pub fn with_page_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<S::Item>) -> Vec<S::Item> + Send + Sync + 'static,
    {
        self.page_transform = Some(Arc::new(transform));
        self
    }

    /// Set the concat policy
    #[must_use]
    pub fn with_concat(mut self, concat: ConcatFn<S::Item>) -> Self {
        self.concat = concat;
        self
    }

    /// Reset the accumulated list on every start-over
    #[must_use]
    pub fn with_clear_on_start_over(mut self, clear: bool) -> Self {
        self.clear_on_start_over = clear;
        self
    }

    /// Suppress consecutive equal snapshots on the data stream
    #[must_use]
    pub fn with_distinct_until_changed(mut self, distinct: bool) -> Self {
        self.distinct_until_changed = distinct;
        self
    }

    /// Set how many times a failed fetch is retried
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// The page source
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// The page transform, if any
    pub fn page_transform(&self) -> Option<&TransformFn<S::Item>> {
        self.page_transform.as_ref()
    }

    /// The concat policy
    pub fn concat(&self) -> &ConcatFn<S::Item> {
        &self.concat
    }

    /// Whether start-over clears the accumulated list
    pub fn clear_on_start_over(&self) -> bool {
        self.clear_on_start_over
    }

    /// Whether consecutive equal snapshots are suppressed
    pub fn distinct_until_changed(&self) -> bool {
        self.distinct_until_changed
    }

    /// Number of retries after a failed fetch
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl<S: PageSource> Clone for PagerConfig<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            page_transform: self.page_transform.clone(),
            concat: Arc::clone(&self.concat),
            clear_on_start_over: self.clear_on_start_over,
            distinct_until_changed: self.distinct_until_changed,
            max_retries: self.max_retries,
        }
    }
}

impl<S: PageSource> std::fmt::Debug for PagerConfig<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerConfig")
            .field("has_page_transform", &self.page_transform.is_some())
            .field("clear_on_start_over", &self.clear_on_start_over)
            .field("distinct_until_changed", &self.distinct_until_changed)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

/// Builder assembling a [`PagerConfig`] from closures
///
/// ```rust,ignore
/// let config = PagerBuilder::new()
///     .fetch_first(|params: Query| async move { api.list(params).await })
///     .fetch_next(|cursor| async move { api.get(&cursor).await })
///     .items(|env: &Envelope| env.projects.clone())
///     .more_url(|env: &Envelope| env.urls.more.clone())
///     .build()?;
/// ```
pub struct PagerBuilder<P, E, T> {
    fetch_first: Option<FetchFirstFn<P, E>>,
    fetch_next: Option<FetchNextFn<E>>,
    items: Option<ItemsFn<E, T>>,
    more_url: Option<MoreUrlFn<E>>,
    page_transform: Option<TransformFn<T>>,
    concat: Option<ConcatFn<T>>,
    clear_on_start_over: bool,
    distinct_until_changed: bool,
    max_retries: u32,
}

impl<P, E, T> Default for PagerBuilder<P, E, T> {
    fn default() -> Self {
        Self {
            fetch_first: None,
            fetch_next: None,
            items: None,
            more_url: None,
            page_transform: None,
            concat: None,
            clear_on_start_over: false,
            distinct_until_changed: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl<P, E, T> PagerBuilder<P, E, T>
where
    P: Clone + Send + Sync + 'static,
    E: Send + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first-page fetch function (required)
    pub fn fetch_first<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<E>> + Send + 'static,
    {
        self.fetch_first = Some(Arc::new(move |params| f(params).boxed()));
        self
    }

    /// Set the cursor fetch function (required)
    pub fn fetch_next<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<E>> + Send + 'static,
    {
        self.fetch_next = Some(Arc::new(move |cursor| f(cursor).boxed()));
        self
    }

    /// Set the item extraction function (required)
    pub fn items<F>(mut self, f: F) -> Self
    where
        F: Fn(&E) -> Vec<T> + Send + Sync + 'static,
    {
        self.items = Some(Arc::new(f));
        self
    }

    /// Set the "more" URL extraction function (required)
    pub fn more_url<F>(mut self, f: F) -> Self
    where
        F: Fn(&E) -> Option<String> + Send + Sync + 'static,
    {
        self.more_url = Some(Arc::new(f));
        self
    }

    /// Set a transform applied to every page's items
    pub fn page_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<T>) -> Vec<T> + Send + Sync + 'static,
    {
        self.page_transform = Some(Arc::new(f));
        self
    }

    /// Set the concat policy (default: [`append`])
    pub fn concat(mut self, concat: ConcatFn<T>) -> Self {
        self.concat = Some(concat);
        self
    }

    /// Reset the accumulated list on every start-over
    pub fn clear_on_start_over(mut self, clear: bool) -> Self {
        self.clear_on_start_over = clear;
        self
    }

    /// Suppress consecutive equal snapshots on the data stream
    pub fn distinct_until_changed(mut self, distinct: bool) -> Self {
        self.distinct_until_changed = distinct;
        self
    }

    /// Set how many times a failed fetch is retried (default: 2)
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<PagerConfig<FnSource<P, E, T>>> {
        let source = FnSource {
            fetch_first: self
                .fetch_first
                .ok_or_else(|| Error::missing_field("fetch_first"))?,
            fetch_next: self
                .fetch_next
                .ok_or_else(|| Error::missing_field("fetch_next"))?,
            items: self.items.ok_or_else(|| Error::missing_field("items"))?,
            more_url: self
                .more_url
                .ok_or_else(|| Error::missing_field("more_url"))?,
        };

        let mut config = PagerConfig::from_source(source)
            .with_clear_on_start_over(self.clear_on_start_over)
            .with_distinct_until_changed(self.distinct_until_changed)
            .with_max_retries(self.max_retries);
        config.page_transform = self.page_transform;
        if let Some(concat) = self.concat {
            config.concat = concat;
        }
        Ok(config)
    }
}
