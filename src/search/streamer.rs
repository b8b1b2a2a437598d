//! Streaming contract shared by the search engines
//!
//! An engine runs on its own producer thread and hands each finished
//! decomposition to the consumer through a zero-capacity channel, so at most
//! one decomposition is in flight and the search pauses while the consumer
//! is busy. A fatal error is delivered as the last item of the stream.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use super::cancel::CancelToken;
use super::errors::SearchResult;
use crate::hypergraph::Decomp;
use crate::observability::{log_event_with_fields, trace_event, Event};

/// How often a waiting consumer re-checks its cancellation token
const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub trait Streamer: Send {
    /// Algorithm name used in output and logs
    fn name(&self) -> &'static str;

    /// Starts the search; the stream cannot be restarted once drained
    fn stream(self: Box<Self>, cancel: CancelToken) -> DecompStream;
}

/// Receiving end of a search.
///
/// Dropping the stream stops the producer at its next hand-off.
pub struct DecompStream {
    rx: Receiver<SearchResult<Decomp>>,
    cancel: CancelToken,
}

impl Iterator for DecompStream {
    type Item = SearchResult<Decomp>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(item) => return Some(item),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}

/// Runs `produce` on a new thread and returns the consumer side.
///
/// `produce` receives a sink; the sink returns false once the consumer is
/// gone or the token is cancelled, and the producer must then stop.
pub(crate) fn spawn_stream<F>(name: &'static str, cancel: CancelToken, produce: F) -> DecompStream
where
    F: FnOnce(&mut dyn FnMut(Decomp) -> bool) -> SearchResult<()> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<SearchResult<Decomp>>(0);
    let token = cancel.clone();

    thread::spawn(move || {
        let mut emitted: u64 = 0;
        let mut sink = |decomp: Decomp| -> bool {
            if token.is_cancelled() {
                return false;
            }
            if tx.send(Ok(decomp)).is_err() {
                return false;
            }
            emitted += 1;
            trace_event(
                Event::DecompEmitted,
                &[("algorithm", name), ("index", &emitted.to_string())],
            );
            true
        };

        let outcome = produce(&mut sink);
        let count = emitted.to_string();
        match outcome {
            Ok(()) if token.is_cancelled() => {
                log_event_with_fields(Event::SearchCancelled, &[("algorithm", name), ("emitted", &count)]);
            }
            Ok(()) => {
                log_event_with_fields(Event::SearchExhausted, &[("algorithm", name), ("emitted", &count)]);
            }
            Err(err) => {
                log_event_with_fields(
                    Event::SearchFailed,
                    &[("algorithm", name), ("code", err.code().code()), ("message", err.message())],
                );
                let _ = tx.send(Err(err));
            }
        }
    });

    DecompStream { rx, cancel }
}
