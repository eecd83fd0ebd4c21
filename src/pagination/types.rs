//! Pagination types
//!
//! Defines the values that flow between the fetch executor, the sequencer and
//! the pager driver.

use super::cursor::Cursor;
use std::fmt;

/// What a single fetch should load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest<P> {
    /// First page of a sequence, fetched with the caller's params
    First(P),
    /// A follow-up page, fetched with the cursor of the previous page
    Next(Cursor),
}

impl<P> PageRequest<P> {
    /// Check if this request loads the first page
    pub fn is_first(&self) -> bool {
        matches!(self, Self::First(_))
    }

    /// Get the cursor for follow-up requests
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Self::First(_) => None,
            Self::Next(cursor) => Some(cursor),
        }
    }
}

/// Identifies one pagination sequence (one start-over)
///
/// A fetch is tagged with the sequence it was dispatched under; its result is
/// only committed while that sequence is still the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SequenceId(u64);

impl SequenceId {
    /// The id following this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a sequence stopped paginating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The server returned an empty page, or no usable next-page link
    EndOfData,
    /// Every attempt failed; the page was treated as empty
    RetriesExhausted {
        /// Number of attempts made (first try plus retries)
        attempts: u32,
        /// Display form of the last error
        message: String,
    },
}

impl Termination {
    /// Check if the sequence ended because of fetch failures
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}

/// Result of one fetch, after retries, cursor extraction and page transform
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage<T> {
    /// Items of the page (empty for end-of-data and exhausted retries)
    pub items: Vec<T>,
    /// Cursor for the next page, if the envelope carried a valid link
    pub cursor: Option<Cursor>,
    /// Set when all attempts failed
    pub failure: Option<Termination>,
}

impl<T> FetchedPage<T> {
    /// A successfully loaded page
    pub fn loaded(items: Vec<T>, cursor: Option<Cursor>) -> Self {
        Self {
            items,
            cursor,
            failure: None,
        }
    }

    /// The benign empty page produced when every attempt failed
    pub fn exhausted(attempts: u32, message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            failure: Some(Termination::RetriesExhausted {
                attempts,
                message: message.into(),
            }),
        }
    }

    /// Check if this page ends the sequence
    pub fn is_terminal(&self) -> bool {
        self.items.is_empty() || self.cursor.is_none()
    }

    /// The termination reason, if this page ends the sequence
    pub fn termination(&self) -> Option<Termination> {
        if let Some(failure) = &self.failure {
            return Some(failure.clone());
        }
        self.is_terminal().then_some(Termination::EndOfData)
    }
}
