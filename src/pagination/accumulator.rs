//! Accumulator
//!
//! Folds successive pages into the running list using the configured concat
//! policy and decides which snapshots are emitted.

use super::config::{append, ConcatFn, PagerConfig};
use super::source::PageSource;

/// Running list of items for a pager
pub struct Accumulator<T> {
    concat: ConcatFn<T>,
    clear_on_start_over: bool,
    distinct_until_changed: bool,
    items: Vec<T>,
    last_emitted: Option<Vec<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Accumulator<T> {
    /// Create an accumulator with the given policies
    pub fn new(concat: ConcatFn<T>, clear_on_start_over: bool, distinct_until_changed: bool) -> Self {
        Self {
            concat,
            clear_on_start_over,
            distinct_until_changed,
            items: Vec::new(),
            last_emitted: None,
        }
    }

    /// Create an appending accumulator with no other policy
    pub fn appending() -> Self {
        Self::new(append(), false, false)
    }

    /// Create an accumulator from a pager config
    pub fn from_config<S: PageSource<Item = T>>(config: &PagerConfig<S>) -> Self {
        Self::new(
            config.concat().clone(),
            config.clear_on_start_over(),
            config.distinct_until_changed(),
        )
    }

    /// Begin a new sequence
    ///
    /// Returns the empty snapshot to emit when the list is cleared. Without
    /// clearing, the previous list stays as the fold seed and nothing is
    /// emitted.
    pub fn start_over(&mut self) -> Option<Vec<T>> {
        if !self.clear_on_start_over {
            return None;
        }
        self.items.clear();
        self.emit()
    }

    /// Fold a page into the list and return the snapshot to emit, if any
    pub fn push_page(&mut self, page: Vec<T>) -> Option<Vec<T>> {
        let acc = std::mem::take(&mut self.items);
        self.items = (self.concat)(acc, page);
        self.emit()
    }

    /// Current accumulated items
    pub fn items(&self) -> &[T] {
        &self.items
    }

    fn emit(&mut self) -> Option<Vec<T>> {
        if self.distinct_until_changed && self.last_emitted.as_ref() == Some(&self.items) {
            return None;
        }
        let snapshot = self.items.clone();
        if self.distinct_until_changed {
            self.last_emitted = Some(snapshot.clone());
        }
        Some(snapshot)
    }
}

impl<T> std::fmt::Debug for Accumulator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accumulator")
            .field("len", &self.items.len())
            .field("clear_on_start_over", &self.clear_on_start_over)
            .field("distinct_until_changed", &self.distinct_until_changed)
            .finish_non_exhaustive()
    }
}
