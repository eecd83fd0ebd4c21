//! Pager
//!
//! Wires the sequencer, fetch executor and accumulator into one serialized
//! pipeline per pager instance.
//!
//! A pager is made of three parts:
//! - [`PagerHandle`]: cloneable trigger side (`next_page`, `start_over`, `dispose`)
//! - [`PagerOutputs`]: the `data`, `is_fetching`, `current_page` and
//!   `terminations` streams
//! - [`PagerDriver`]: the future that runs the pipeline; poll it on any executor
//!
//! The driver never spawns anything itself. The only suspension point inside a
//! fetch is the page source call.

use super::accumulator::Accumulator;
use super::config::PagerConfig;
use super::executor::fetch_page;
use super::sequencer::{Completion, Sequencer};
use super::source::PageSource;
use super::types::{FetchedPage, PageRequest, SequenceId, Termination};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::future::{self, BoxFuture};
use futures::stream::{self, BoxStream};
use futures::{FutureExt, StreamExt};
use std::task::Poll;
use tracing::debug;

/// Events driving a pager
#[derive(Debug)]
enum Trigger<P> {
    NextPage,
    StartOver(P),
    Dispose,
}

type InFlight<T> = BoxFuture<'static, (SequenceId, FetchedPage<T>)>;

/// Triggers handled back to back before the driver yields
const TRIGGER_BUDGET: u32 = 32;

/// Trigger side of a pager
///
/// Cloning the handle gives another trigger source for the same pager. The
/// driver keeps running until [`dispose`](Self::dispose) is called or every
/// trigger source has ended.
pub struct PagerHandle<P> {
    commands: UnboundedSender<Trigger<P>>,
}

impl<P> Clone for PagerHandle<P> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
        }
    }
}

impl<P> std::fmt::Debug for PagerHandle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerHandle")
            .field("closed", &self.commands.is_closed())
            .finish()
    }
}

impl<P> PagerHandle<P> {
    /// Request the next page of the active sequence
    ///
    /// No-op when there is no cursor yet or the sequence has terminated.
    pub fn next_page(&self) {
        let _ = self.commands.unbounded_send(Trigger::NextPage);
    }

    /// Start a new sequence with the given first-page params
    pub fn start_over(&self, params: P) {
        let _ = self.commands.unbounded_send(Trigger::StartOver(params));
    }

    /// Stop the pager
    ///
    /// The in-flight fetch, if any, is dropped and no further outputs are
    /// emitted. Later triggers from any handle are ignored.
    pub fn dispose(&self) {
        let _ = self.commands.unbounded_send(Trigger::Dispose);
    }

    /// Check if the driver has stopped accepting triggers
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// Output streams of a pager
///
/// Every emission is delivered in order; nothing is coalesced.
#[derive(Debug)]
pub struct PagerOutputs<T> {
    /// Accumulated list, one snapshot per committed page
    pub data: UnboundedReceiver<Vec<T>>,
    /// `true` when a fetch is dispatched, `false` when it completes or is cancelled
    pub is_fetching: UnboundedReceiver<bool>,
    /// 1 on every start-over, then incremented per follow-up fetch
    pub current_page: UnboundedReceiver<u32>,
    /// Why each sequence stopped paginating
    pub terminations: UnboundedReceiver<Termination>,
}

struct Emitters<T> {
    data: UnboundedSender<Vec<T>>,
    is_fetching: UnboundedSender<bool>,
    current_page: UnboundedSender<u32>,
    terminations: UnboundedSender<Termination>,
}

impl<T> Emitters<T> {
    fn data(&self, snapshot: Vec<T>) {
        let _ = self.data.unbounded_send(snapshot);
    }

    fn fetching(&self, fetching: bool) {
        let _ = self.is_fetching.unbounded_send(fetching);
    }

    fn page(&self, page: u32) {
        let _ = self.current_page.unbounded_send(page);
    }

    fn terminated(&self, termination: Termination) {
        let _ = self.terminations.unbounded_send(termination);
    }
}

/// The three parts of a freshly built pager
pub struct Pager<S: PageSource> {
    /// Trigger side
    pub handle: PagerHandle<S::Params>,
    /// Output streams
    pub outputs: PagerOutputs<S::Item>,
    /// Pipeline future
    pub driver: PagerDriver<S>,
}

impl<S: PageSource> Pager<S> {
    /// Build a pager from a config
    pub fn new(config: PagerConfig<S>) -> Self {
        let (commands_tx, commands_rx) = unbounded();
        let (data_tx, data_rx) = unbounded();
        let (fetching_tx, fetching_rx) = unbounded();
        let (page_tx, page_rx) = unbounded();
        let (term_tx, term_rx) = unbounded();

        Self {
            handle: PagerHandle {
                commands: commands_tx,
            },
            outputs: PagerOutputs {
                data: data_rx,
                is_fetching: fetching_rx,
                current_page: page_rx,
                terminations: term_rx,
            },
            driver: PagerDriver {
                config,
                triggers: commands_rx.boxed(),
                emit: Emitters {
                    data: data_tx,
                    is_fetching: fetching_tx,
                    current_page: page_tx,
                    terminations: term_tx,
                },
            },
        }
    }
}

/// Pipeline future of a pager
pub struct PagerDriver<S: PageSource> {
    config: PagerConfig<S>,
    triggers: BoxStream<'static, Trigger<S::Params>>,
    emit: Emitters<S::Item>,
}

impl<S: PageSource> std::fmt::Debug for PagerDriver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerDriver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: PageSource> PagerDriver<S> {
    /// Merge external trigger streams into this pager
    ///
    /// Each `()` on `next_page` requests the next page; each value on
    /// `start_over` begins a new sequence with those params.
    #[must_use]
    pub fn with_triggers<N, R>(mut self, next_page: N, start_over: R) -> Self
    where
        N: futures::Stream<Item = ()> + Send + 'static,
        R: futures::Stream<Item = S::Params> + Send + 'static,
    {
        let external = stream::select(
            next_page.map(|()| Trigger::NextPage),
            start_over.map(Trigger::StartOver),
        );
        self.triggers = stream::select(self.triggers, external).boxed();
        self
    }

    /// Spawn the driver on the current tokio runtime
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the pipeline until disposed or all triggers have ended
    pub async fn run(mut self) {
        let mut sequencer = Sequencer::new();
        let mut accumulator = Accumulator::from_config(&self.config);
        let mut in_flight: Option<InFlight<S::Item>> = None;
        let mut triggers_open = true;
        let mut budget = TRIGGER_BUDGET;

        loop {
            // A trigger source that is always ready must not starve the fetch
            // or the executor
            if budget == 0 {
                budget = TRIGGER_BUDGET;
                if let Some((id, page)) = poll_once(&mut in_flight).await {
                    self.emit.fetching(false);
                    in_flight = self.commit(&mut sequencer, &mut accumulator, id, page);
                }
                tokio::task::yield_now().await;
            }

            tokio::select! {
                biased;

                trigger = self.triggers.next(), if triggers_open => {
                    budget -= 1;
                    match trigger {
                        Some(Trigger::StartOver(params)) => {
                            if in_flight.take().is_some() {
                                debug!("Start-over cancels in-flight fetch of sequence {}", sequencer.sequence());
                                self.emit.fetching(false);
                            }
                            let id = sequencer.start_over();
                            debug!("Starting sequence {}", id);
                            if let Some(snapshot) = accumulator.start_over() {
                                self.emit.data(snapshot);
                            }
                            self.emit.page(sequencer.page());
                            in_flight = Some(self.dispatch(id, PageRequest::First(params)));
                        }
                        Some(Trigger::NextPage) => {
                            if let Some(cursor) = sequencer.request_next() {
                                self.emit.page(sequencer.page());
                                in_flight = Some(self.dispatch(sequencer.sequence(), PageRequest::Next(cursor)));
                            } else {
                                debug!("Next page ignored in phase {:?}", sequencer.phase());
                            }
                        }
                        Some(Trigger::Dispose) => {
                            debug!("Pager disposed");
                            return;
                        }
                        None => {
                            debug!("All trigger sources ended");
                            triggers_open = false;
                        }
                    }
                }

                (id, page) = wait_for(&mut in_flight), if in_flight.is_some() => {
                    budget = TRIGGER_BUDGET;
                    self.emit.fetching(false);
                    in_flight = self.commit(&mut sequencer, &mut accumulator, id, page);
                }

                else => break,
            }
        }
    }

    /// Start a fetch and flag it on `is_fetching`
    fn dispatch(&self, id: SequenceId, request: PageRequest<S::Params>) -> InFlight<S::Item> {
        debug!(
            "Dispatching {} fetch for sequence {}",
            if request.is_first() { "first-page" } else { "cursor" },
            id
        );
        self.emit.fetching(true);
        let config = self.config.clone();
        async move {
            let page = fetch_page(&config, &request).await;
            (id, page)
        }
        .boxed()
    }

    /// Apply a completed fetch; returns the follow-up fetch, if one is due
    fn commit(
        &self,
        sequencer: &mut Sequencer,
        accumulator: &mut Accumulator<S::Item>,
        id: SequenceId,
        page: FetchedPage<S::Item>,
    ) -> Option<InFlight<S::Item>> {
        let termination = page.termination();
        let completion = sequencer.complete(id, !page.items.is_empty(), page.cursor);

        if completion == Completion::Stale {
            debug!("Discarding stale page from sequence {}", id);
            return None;
        }

        if !page.items.is_empty() {
            if let Some(snapshot) = accumulator.push_page(page.items) {
                self.emit.data(snapshot);
            }
        }

        match completion {
            Completion::FollowUp(cursor) => {
                self.emit.page(sequencer.page());
                Some(self.dispatch(id, PageRequest::Next(cursor)))
            }
            Completion::Terminated => {
                let termination = termination.unwrap_or(Termination::EndOfData);
                debug!("Sequence {} terminated: {:?}", id, termination);
                self.emit.terminated(termination);
                None
            }
            Completion::Continue | Completion::Stale => None,
        }
    }
}

/// Poll the in-flight fetch once without waiting for it
async fn poll_once<T>(slot: &mut Option<BoxFuture<'static, T>>) -> Option<T> {
    let fetch = slot.as_mut()?;
    let polled = future::poll_fn(|cx| Poll::Ready(fetch.poll_unpin(cx))).await;
    match polled {
        Poll::Ready(out) => {
            *slot = None;
            Some(out)
        }
        Poll::Pending => None,
    }
}

/// Wait for the in-flight fetch; pending forever when there is none
async fn wait_for<T>(slot: &mut Option<BoxFuture<'static, T>>) -> T {
    match slot {
        Some(fetch) => fetch.await,
        None => future::pending().await,
    }
}
