use super::logging::log_dir;
use super::startup::{build_app, initial_tracks};
use super::workers::{SearchWorker, SuggestionWorker};
use crate::catalog::{FetchError, Seed, Track, TrackProvider, fallback_tracks};
use crate::config::{LoggingSettings, Settings};
use crate::playback::{MediaElement, PlaybackController, PlaybackPhase};
use crate::search::SearchRequest;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

struct Silent;

impl MediaElement for Silent {
    fn load(&mut self, _ticket: u64, _track: &Track) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn seek(&mut self, _to: Duration) {}
}

/// Provider standing in for an unreachable catalog.
struct Offline;

impl TrackProvider for Offline {
    fn search(&self, _query: &str, _limit: u32) -> Result<Vec<Track>, FetchError> {
        Err(FetchError::Upstream("offline".into()))
    }

    fn artist_top(&self, _artist_id: &str, _limit: u32) -> Result<Vec<Track>, FetchError> {
        Err(FetchError::Upstream("offline".into()))
    }

    fn playlist(&self, _playlist_id: &str) -> Result<Vec<Track>, FetchError> {
        Err(FetchError::Upstream("offline".into()))
    }

    fn suggestions(&self, _query: &str, _limit: u32) -> Result<Vec<String>, FetchError> {
        Err(FetchError::Upstream("offline".into()))
    }
}

/// Provider answering every search with one track named after the query.
struct Echo;

impl TrackProvider for Echo {
    fn search(&self, query: &str, _limit: u32) -> Result<Vec<Track>, FetchError> {
        let mut track = fallback_tracks().remove(0);
        track.id = query.to_string();
        Ok(vec![track])
    }

    fn artist_top(&self, _artist_id: &str, _limit: u32) -> Result<Vec<Track>, FetchError> {
        Err(FetchError::Empty)
    }

    fn playlist(&self, _playlist_id: &str) -> Result<Vec<Track>, FetchError> {
        Err(FetchError::Empty)
    }

    fn suggestions(&self, query: &str, limit: u32) -> Result<Vec<String>, FetchError> {
        Ok((1..=limit + 2).map(|i| format!("{query} {i}")).collect())
    }
}

#[test]
fn offline_startup_cues_first_fallback_track_paused() {
    let settings = Settings::default();
    let tracks = initial_tracks(&Offline, &Seed::Query(None), &settings);
    assert_eq!(tracks, fallback_tracks());

    let player = PlaybackController::new(Box::new(Silent));
    let app = build_app(player, &settings, tracks, "search: chillhop".into());

    assert_eq!(app.player.current().map(|t| t.id.as_str()), Some("fallback-1"));
    assert!(!app.player.is_playing());
    assert_eq!(app.player.phase(), PlaybackPhase::Loading);
    assert_eq!(app.selected, 0);
    assert_eq!(app.list_label, "search: chillhop");
}

#[test]
fn build_app_applies_playback_and_ui_defaults() {
    let mut settings = Settings::default();
    settings.playback.shuffle = true;
    settings.ui.follow_playback = false;

    let player = PlaybackController::new(Box::new(Silent));
    let app = build_app(player, &settings, fallback_tracks(), String::new());

    assert!(app.player.shuffle());
    assert!(!app.follow_playback);
}

#[test]
fn explicit_log_directory_wins() {
    let settings = LoggingSettings {
        directory: Some("/tmp/otono-logs".into()),
        ..LoggingSettings::default()
    };
    assert_eq!(log_dir(&settings), Some(PathBuf::from("/tmp/otono-logs")));
}

#[test]
fn search_worker_posts_outcome_with_generation() {
    let (tx, rx) = mpsc::channel();
    let worker = SearchWorker::new(Arc::new(Echo), tx, 10);
    worker.spawn(SearchRequest {
        generation: 4,
        query: "lofi".into(),
    });

    let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(outcome.generation, 4);
    assert_eq!(outcome.query, "lofi");
    assert_eq!(outcome.result.unwrap()[0].id, "lofi");
}

#[test]
fn suggestion_worker_posts_capped_titles_with_generation() {
    let (tx, rx) = mpsc::channel();
    let worker = SuggestionWorker::new(Arc::new(Echo), tx, 2);
    worker.spawn(&SearchRequest {
        generation: 7,
        query: "lofi".into(),
    });

    let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(outcome.generation, 7);
    assert_eq!(outcome.titles, vec!["lofi 1", "lofi 2"]);
}

#[test]
fn suggestion_worker_reports_nothing_when_offline() {
    let (tx, rx) = mpsc::channel();
    let worker = SuggestionWorker::new(Arc::new(Offline), tx, 5);
    worker.spawn(&SearchRequest {
        generation: 1,
        query: "lofi".into(),
    });

    let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(outcome.titles.is_empty());
}
