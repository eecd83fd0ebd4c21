//! Pagination sequencer
//!
//! State machine gating when fetches are dispatched and when a sequence ends:
//!
//! ```text
//! Idle ─start_over─► FetchingFirst ─page+cursor─► AwaitingNext ⇄ FetchingNext
//!                         │                                          │
//!                         └──────── empty page / no cursor ──────────┴─► Terminated
//! ```
//!
//! The cursor lives inside `AwaitingNext`, so a next-page request without a
//! cursor cannot be expressed.

use super::cursor::Cursor;
use super::types::SequenceId;

/// Sequencer state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// No sequence started yet
    #[default]
    Idle,
    /// The first page is being fetched with params
    FetchingFirst,
    /// A page arrived with a cursor; waiting for a next-page trigger
    AwaitingNext {
        /// Cursor of the next page
        cursor: Cursor,
    },
    /// A follow-up page is being fetched
    FetchingNext,
    /// No further pages in this sequence
    Terminated,
}

impl Phase {
    /// Check if a fetch is outstanding
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::FetchingFirst | Self::FetchingNext)
    }

    /// Check if the sequence has ended
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// What the driver should do with a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The fetch belongs to a superseded sequence; drop its result
    Stale,
    /// Commit the page and wait for the next trigger
    Continue,
    /// Commit the page and immediately fetch the next one with this cursor
    FollowUp(Cursor),
    /// Commit the page (if any items) and end the sequence
    Terminated,
}

/// Pagination state machine for one pager
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    phase: Phase,
    sequence: SequenceId,
    page: u32,
    next_requested: bool,
}

impl Sequencer {
    /// Create an idle sequencer
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Active sequence id
    pub fn sequence(&self) -> SequenceId {
        self.sequence
    }

    /// Current page number (1 for the first page of a sequence)
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Start a new sequence, superseding any in-progress one
    pub fn start_over(&mut self) -> SequenceId {
        self.sequence = self.sequence.next();
        self.phase = Phase::FetchingFirst;
        self.page = 1;
        self.next_requested = false;
        self.sequence
    }

    /// Handle a next-page trigger
    ///
    /// Returns the cursor to fetch when a fetch should be dispatched now.
    /// While a follow-up fetch is outstanding the request is remembered, and
    /// any number of requests collapse into a single follow-up.
    pub fn request_next(&mut self) -> Option<Cursor> {
        match std::mem::take(&mut self.phase) {
            Phase::AwaitingNext { cursor } => {
                self.phase = Phase::FetchingNext;
                self.page += 1;
                Some(cursor)
            }
            Phase::FetchingNext => {
                self.phase = Phase::FetchingNext;
                self.next_requested = true;
                None
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Handle a completed fetch from sequence `id`
    pub fn complete(&mut self, id: SequenceId, has_items: bool, cursor: Option<Cursor>) -> Completion {
        if id != self.sequence || !self.phase.is_fetching() {
            return Completion::Stale;
        }

        let follow_up = std::mem::take(&mut self.next_requested);

        match cursor {
            Some(cursor) if has_items => {
                if follow_up {
                    self.phase = Phase::FetchingNext;
                    self.page += 1;
                    Completion::FollowUp(cursor)
                } else {
                    self.phase = Phase::AwaitingNext { cursor };
                    Completion::Continue
                }
            }
            _ => {
                self.phase = Phase::Terminated;
                Completion::Terminated
            }
        }
    }
}
