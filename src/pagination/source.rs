//! Page sources
//!
//! A page source bundles the four collaborator functions the pager needs:
//! fetch the first page, fetch a page by cursor, extract items, extract the
//! "more" URL. Implement [`PageSource`] directly, or assemble an [`FnSource`]
//! from closures through [`PagerBuilder`](super::PagerBuilder).

use crate::error::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Core trait for paginated remote collections
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// First-page request parameters
    type Params: Clone + Send + Sync + 'static;
    /// Raw response of one fetch
    type Envelope: Send + 'static;
    /// One unit of paginated data
    type Item: Clone + PartialEq + Send + Sync + 'static;

    /// Fetch the first page of a sequence
    async fn fetch_first(&self, params: Self::Params) -> Result<Self::Envelope>;

    /// Fetch a follow-up page by cursor (path and query)
    async fn fetch_next(&self, cursor: &str) -> Result<Self::Envelope>;

    /// Extract the items of a page
    fn items(&self, envelope: &Self::Envelope) -> Vec<Self::Item>;

    /// Extract the absolute URL of the next page, if any
    fn more_url(&self, envelope: &Self::Envelope) -> Option<String>;
}

/// Fetches the first page from params
pub type FetchFirstFn<P, E> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<E>> + Send + Sync>;

/// Fetches a follow-up page from a cursor
pub type FetchNextFn<E> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<E>> + Send + Sync>;

/// Extracts items from an envelope
pub type ItemsFn<E, T> = Arc<dyn Fn(&E) -> Vec<T> + Send + Sync>;

/// Extracts the "more" URL from an envelope
pub type MoreUrlFn<E> = Arc<dyn Fn(&E) -> Option<String> + Send + Sync>;

/// A page source assembled from closures
pub struct FnSource<P, E, T> {
    pub(crate) fetch_first: FetchFirstFn<P, E>,
    pub(crate) fetch_next: FetchNextFn<E>,
    pub(crate) items: ItemsFn<E, T>,
    pub(crate) more_url: MoreUrlFn<E>,
}

impl<P, E, T> Clone for FnSource<P, E, T> {
    fn clone(&self) -> Self {
        Self {
            fetch_first: Arc::clone(&self.fetch_first),
            fetch_next: Arc::clone(&self.fetch_next),
            items: Arc::clone(&self.items),
            more_url: Arc::clone(&self.more_url),
        }
    }
}

impl<P, E, T> std::fmt::Debug for FnSource<P, E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}

#[async_trait]
impl<P, E, T> PageSource for FnSource<P, E, T>
where
    P: Clone + Send + Sync + 'static,
    E: Send + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    type Params = P;
    type Envelope = E;
    type Item = T;

    async fn fetch_first(&self, params: P) -> Result<E> {
        (self.fetch_first)(params).await
    }

    async fn fetch_next(&self, cursor: &str) -> Result<E> {
        (self.fetch_next)(cursor.to_string()).await
    }

    fn items(&self, envelope: &E) -> Vec<T> {
        (self.items)(envelope)
    }

    fn more_url(&self, envelope: &E) -> Option<String> {
        (self.more_url)(envelope)
    }
}
