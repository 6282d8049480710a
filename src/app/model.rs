//! Application model: `App`, the single owner of all UI-visible state.
//!
//! The `App` struct holds the playback controller, the search coordinator,
//! the list cursor and the search input line. Only the event loop thread
//! mutates it.

use std::time::Instant;

use tracing::{info, warn};

use crate::catalog::{FetchError, Track};
use crate::playback::{Direction, PlaybackController};
use crate::search::SearchCoordinator;

/// The main application model.
pub struct App {
    pub player: PlaybackController,
    pub search: SearchCoordinator,

    /// Cursor position in the track list.
    pub selected: usize,
    pub follow_playback: bool,

    pub search_mode: bool,
    pub search_input: String,
    /// Title completions for the newest search, shown under the search line.
    pub suggestions: Vec<String>,
    /// Last search failure, shown until dismissed.
    pub search_error: Option<String>,

    /// Title of the track list box (what the list was loaded from).
    pub list_label: String,
    pub metadata_window: bool,
}

impl App {
    pub fn new(player: PlaybackController, search: SearchCoordinator) -> Self {
        Self {
            player,
            search,
            selected: 0,
            follow_playback: true,
            search_mode: false,
            search_input: String::new(),
            suggestions: Vec::new(),
            search_error: None,
            list_label: String::new(),
            metadata_window: false,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        self.player.tracks()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.player.tracks().get(self.selected)
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Enable following playback (cursor follows the now-playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
        self.sync_cursor();
    }

    /// Disable follow-playback.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the cursor onto the now-playing track when following playback.
    pub fn sync_cursor(&mut self) {
        if !self.follow_playback {
            return;
        }
        if let Some(i) = self.player.current_index() {
            self.selected = i;
        }
    }

    /// Set the cursor, clamped to the list.
    pub fn set_selected(&mut self, idx: usize) {
        let len = self.player.tracks().len();
        self.selected = if len == 0 { 0 } else { idx.min(len - 1) };
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.player.tracks().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.player.tracks().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Play the track under the cursor and resume following playback.
    pub fn play_selected(&mut self) {
        let Some(id) = self.selected_track().map(|t| t.id.clone()) else {
            return;
        };
        self.player.select_track(&id);
        self.follow_playback_on();
    }

    pub fn skip(&mut self, direction: Direction) {
        self.player.advance(direction, None);
        self.follow_playback_on();
    }

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
    }

    /// Leave the search line; a pending search still fires.
    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
        self.suggestions.clear();
    }

    /// Leave the search line and forget the pending search.
    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_input.clear();
        self.suggestions.clear();
        self.search.cancel();
    }

    pub fn push_search_char(&mut self, c: char, now: Instant) {
        self.search_input.push(c);
        self.search_input_changed(now);
    }

    pub fn pop_search_char(&mut self, now: Instant) {
        self.search_input.pop();
        self.search_input_changed(now);
    }

    /// Replace the search input with the first suggestion and search for it.
    pub fn accept_suggestion(&mut self, now: Instant) {
        if self.suggestions.is_empty() {
            return;
        }
        self.search_input = self.suggestions.remove(0);
        self.search_input_changed(now);
    }

    fn search_input_changed(&mut self, now: Instant) {
        if self.search_input.trim().is_empty() {
            self.suggestions.clear();
        }
        self.search.on_query_change(&self.search_input, now);
    }

    /// Show suggestions fetched for search `generation`; stale ones are
    /// dropped and reported as `false`.
    pub fn apply_suggestions(&mut self, generation: u64, titles: Vec<String>) -> bool {
        if !self.search.accepts(generation) || !self.search_mode {
            return false;
        }
        self.suggestions = titles;
        true
    }

    /// Apply the answer to search `generation`. Stale answers are ignored
    /// and reported as `false`.
    ///
    /// Results replace the list without interrupting a playing track; a
    /// failure keeps the previous list and playback untouched.
    pub fn apply_search_result(
        &mut self,
        generation: u64,
        query: &str,
        result: Result<Vec<Track>, FetchError>,
    ) -> bool {
        if !self.search.complete(generation) {
            return false;
        }

        match result {
            Ok(tracks) if !tracks.is_empty() => {
                info!(generation, query, count = tracks.len(), "search results applied");
                self.search_error = None;
                self.list_label = format!("search: {query}");
                self.player.replace_track_list(tracks);
                self.selected = 0;
                self.sync_cursor();
            }
            Ok(_) => {
                self.search_error = Some(format!("No playable tracks found for \"{query}\"."));
            }
            Err(e) => {
                warn!(generation, query, error = %e, "search failed");
                self.search_error = Some(match e {
                    FetchError::Empty => format!("No playable tracks found for \"{query}\"."),
                    _ => "Search failed. Please try again later.".to_string(),
                });
            }
        }
        true
    }

    /// The message currently shown in the error banner.
    pub fn visible_error(&self) -> Option<&str> {
        self.player.error().or(self.search_error.as_deref())
    }

    /// Dismiss every visible error. Playback is not resumed.
    pub fn dismiss_error(&mut self) {
        self.player.dismiss_error();
        self.search_error = None;
    }
}
