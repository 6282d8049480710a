use super::*;
use crate::catalog::{FetchError, Track, TrackProvider};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(400);

#[derive(Default)]
struct CountingProvider {
    queries: Mutex<Vec<String>>,
}

impl TrackProvider for CountingProvider {
    fn search(&self, query: &str, _limit: u32) -> Result<Vec<Track>, FetchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(Vec::new())
    }

    fn artist_top(&self, _artist_id: &str, _limit: u32) -> Result<Vec<Track>, FetchError> {
        Ok(Vec::new())
    }

    fn playlist(&self, _playlist_id: &str) -> Result<Vec<Track>, FetchError> {
        Ok(Vec::new())
    }

    fn suggestions(&self, _query: &str, _limit: u32) -> Result<Vec<String>, FetchError> {
        Ok(Vec::new())
    }
}

/// Step the coordinator every 50ms up to `until`, sending every due request.
fn drive(c: &mut SearchCoordinator, provider: &CountingProvider, from: Instant, until: Instant) {
    let mut now = from;
    while now <= until {
        if let Some(req) = c.poll(now) {
            let _ = provider.search(&req.query, 10);
        }
        now += Duration::from_millis(50);
    }
}

#[test]
fn debouncer_fires_once_after_quiet_period() {
    let start = Instant::now();
    let mut d = Debouncer::new(DELAY);
    d.schedule(start, 1);

    assert_eq!(d.fire(start + Duration::from_millis(399)), None);
    assert_eq!(d.fire(start + DELAY), Some(1));
    assert_eq!(d.fire(start + DELAY * 2), None);
    assert!(!d.is_pending());
}

#[test]
fn debouncer_restart_moves_deadline() {
    let start = Instant::now();
    let mut d = Debouncer::new(DELAY);
    d.schedule(start, "a");
    d.schedule(start + Duration::from_millis(300), "b");

    assert_eq!(d.deadline(), Some(start + Duration::from_millis(700)));
    assert_eq!(d.fire(start + Duration::from_millis(500)), None);
    assert_eq!(d.fire(start + Duration::from_millis(700)), Some("b"));
}

#[test]
fn debouncer_cancel_drops_value() {
    let start = Instant::now();
    let mut d = Debouncer::new(DELAY);
    d.schedule(start, 5);
    assert_eq!(d.cancel(), Some(5));
    assert_eq!(d.fire(start + DELAY), None);
}

#[test]
fn rapid_keystrokes_send_exactly_one_search_with_last_text() {
    let provider = CountingProvider::default();
    let mut c = SearchCoordinator::new(DELAY);
    let start = Instant::now();

    c.on_query_change("a", start);
    drive(&mut c, &provider, start, start + Duration::from_millis(100));
    c.on_query_change("ab", start + Duration::from_millis(120));
    drive(
        &mut c,
        &provider,
        start + Duration::from_millis(120),
        start + Duration::from_millis(240),
    );
    c.on_query_change("abc", start + Duration::from_millis(250));
    drive(
        &mut c,
        &provider,
        start + Duration::from_millis(250),
        start + Duration::from_secs(3),
    );

    assert_eq!(*provider.queries.lock().unwrap(), vec!["abc".to_string()]);
}

#[test]
fn blank_query_never_searches_and_cancels_pending() {
    let provider = CountingProvider::default();
    let mut c = SearchCoordinator::new(DELAY);
    let start = Instant::now();

    c.on_query_change("jazz", start);
    c.on_query_change("   ", start + Duration::from_millis(100));
    drive(&mut c, &provider, start, start + Duration::from_secs(2));

    assert!(provider.queries.lock().unwrap().is_empty());
    assert!(!c.is_pending());
}

#[test]
fn query_is_trimmed_before_sending() {
    let mut c = SearchCoordinator::new(DELAY);
    let start = Instant::now();
    c.on_query_change("  daft punk ", start);

    let req = c.poll(start + DELAY).unwrap();
    assert_eq!(req.query, "daft punk");
    assert_eq!(req.generation, 1);
    assert!(c.is_searching());
}

#[test]
fn only_newest_generation_is_accepted() {
    let mut c = SearchCoordinator::new(DELAY);
    let start = Instant::now();

    c.on_query_change("slow", start);
    let first = c.poll(start + DELAY).unwrap();
    c.on_query_change("fast", start + DELAY);
    let second = c.poll(start + DELAY * 2).unwrap();
    assert!(second.generation > first.generation);

    // The newer answer lands first; the older one arrives late.
    assert!(c.complete(second.generation));
    assert!(!c.complete(first.generation));
    assert!(!c.is_searching());
}

#[test]
fn stale_answer_does_not_clear_in_flight_marker() {
    let mut c = SearchCoordinator::new(DELAY);
    let start = Instant::now();

    c.on_query_change("one", start);
    let first = c.poll(start + DELAY).unwrap();
    c.on_query_change("two", start + DELAY);
    let _second = c.poll(start + DELAY * 2).unwrap();

    assert!(!c.complete(first.generation));
    assert!(c.is_searching());
}
