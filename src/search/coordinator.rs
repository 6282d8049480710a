use std::time::{Duration, Instant};

use tracing::debug;

use super::debounce::Debouncer;

/// A search that is due to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Monotonic id; only the newest generation's answer is accepted.
    pub generation: u64,
    pub query: String,
}

/// Turns query edits into at most one request per quiet period and guards
/// against out-of-order answers.
#[derive(Debug)]
pub struct SearchCoordinator {
    debouncer: Debouncer<String>,
    generation: u64,
    in_flight: Option<u64>,
}

impl SearchCoordinator {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            generation: 0,
            in_flight: None,
        }
    }

    /// Record the latest input. Blank input cancels a pending search and
    /// never produces one.
    pub fn on_query_change(&mut self, text: &str, now: Instant) {
        let query = text.trim();
        if query.is_empty() {
            if self.debouncer.cancel().is_some() {
                debug!("pending search cancelled by blank query");
            }
            return;
        }
        self.debouncer.schedule(now, query.to_string());
    }

    /// Drop any pending search without sending it.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    /// Emit the pending search once its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let query = self.debouncer.fire(now)?;
        self.generation += 1;
        self.in_flight = Some(self.generation);
        debug!(generation = self.generation, %query, "search due");
        Some(SearchRequest {
            generation: self.generation,
            query,
        })
    }

    /// Whether an answer for `generation` is still wanted.
    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Mark `generation` as answered. Returns `false` for stale answers,
    /// which must be discarded.
    pub fn complete(&mut self, generation: u64) -> bool {
        if !self.accepts(generation) {
            debug!(generation, newest = self.generation, "discarding stale search result");
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// A request for the newest generation has been sent and not answered.
    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }
}
