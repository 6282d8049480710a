use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::catalog::{FetchError, Track, TrackProvider, suggest};
use crate::search::SearchRequest;

/// Answer to one search request, posted back to the event loop.
#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub query: String,
    pub result: Result<Vec<Track>, FetchError>,
}

/// Title suggestions for one search request.
#[derive(Debug)]
pub struct SuggestionOutcome {
    pub generation: u64,
    pub titles: Vec<String>,
}

/// Runs searches off the event loop thread.
pub struct SearchWorker {
    provider: Arc<dyn TrackProvider>,
    tx: Sender<SearchOutcome>,
    limit: u32,
}

impl SearchWorker {
    pub fn new(provider: Arc<dyn TrackProvider>, tx: Sender<SearchOutcome>, limit: u32) -> Self {
        Self { provider, tx, limit }
    }

    /// Fire-and-forget: the request is never aborted, a stale answer is
    /// dropped by the receiver.
    pub fn spawn(&self, request: SearchRequest) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let limit = self.limit;
        thread::spawn(move || {
            debug!(generation = request.generation, query = %request.query, "search sent");
            let result = provider.search(&request.query, limit);
            let _ = tx.send(SearchOutcome {
                generation: request.generation,
                query: request.query,
                result,
            });
        });
    }
}

/// Fetches title suggestions alongside each search.
pub struct SuggestionWorker {
    provider: Arc<dyn TrackProvider>,
    tx: Sender<SuggestionOutcome>,
    limit: u32,
}

impl SuggestionWorker {
    pub fn new(provider: Arc<dyn TrackProvider>, tx: Sender<SuggestionOutcome>, limit: u32) -> Self {
        Self { provider, tx, limit }
    }

    pub fn spawn(&self, request: &SearchRequest) {
        if self.limit == 0 {
            return;
        }
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let limit = self.limit;
        let generation = request.generation;
        let query = request.query.clone();
        thread::spawn(move || {
            let titles = suggest(provider.as_ref(), &query, limit);
            let _ = tx.send(SuggestionOutcome { generation, titles });
        });
    }
}
