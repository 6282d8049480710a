use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::catalog::Track;

use super::media::{MediaElement, MediaEvent, MediaEventKind};

/// Message shown when the backend cannot start a clip.
pub const PLAY_FAILED_MESSAGE: &str = "Unable to play this track. Please try another.";
/// Message shown when a clip fails to download or decode.
pub const MEDIA_ERROR_MESSAGE: &str = "Error playing audio. Please try another track.";

/// Which neighbour `advance` moves to when shuffle is off.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Coarse state derived from the controller flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Nothing selected yet.
    #[default]
    Idle,
    /// Waiting for the media element to report `CanPlay`.
    Loading,
    Playing,
    Paused,
    /// The last load or start failed; only a new selection recovers.
    Error,
}

/// Owns the active track list and every playback flag.
///
/// All mutation goes through the methods below; the media element is only
/// ever driven from here.
pub struct PlaybackController {
    tracks: Vec<Track>,
    current: Option<Track>,
    is_playing: bool,
    is_loading: bool,
    error: Option<String>,
    current_time: Duration,
    duration: Duration,
    shuffle: bool,

    /// The media element reported `CanPlay` for the current ticket.
    ready: bool,
    /// Start playback as soon as the current load becomes playable.
    play_when_ready: bool,
    /// Seek requested before the current load became playable.
    pending_seek: Option<Duration>,
    ticket: u64,

    media: Box<dyn MediaElement>,
    rng: StdRng,
}

impl PlaybackController {
    pub fn new(media: Box<dyn MediaElement>) -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            is_playing: false,
            is_loading: false,
            error: None,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
            shuffle: false,
            ready: false,
            play_when_ready: false,
            pending_seek: None,
            ticket: 0,
            media,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Position of the now-playing track in the active list, if it is a member.
    pub fn current_index(&self) -> Option<usize> {
        let id = &self.current.as_ref()?.id;
        self.position_of(id)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Ticket of the most recent media load.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Playing, or about to play once the current load is ready.
    pub fn is_active(&self) -> bool {
        self.is_playing || self.play_when_ready
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.error.is_some() {
            PlaybackPhase::Error
        } else if self.is_loading {
            PlaybackPhase::Loading
        } else if self.is_playing {
            PlaybackPhase::Playing
        } else if self.current.is_some() {
            PlaybackPhase::Paused
        } else {
            PlaybackPhase::Idle
        }
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Replace the active list; select the first track when nothing is selected.
    pub fn load_track_list(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        if self.current.is_none() && !self.tracks.is_empty() {
            self.change_to(0, false);
        }
    }

    /// Replace the active list with search results. Unless something is
    /// playing (or about to), the first result becomes current, paused.
    pub fn replace_track_list(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        if !self.is_active() && !self.tracks.is_empty() {
            self.change_to(0, false);
        }
    }

    /// Make the track with `id` current and start it once playable.
    /// Unknown ids leave everything untouched and return `false`.
    pub fn select_track(&mut self, id: &str) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.change_to(index, true);
                true
            }
            None => {
                debug!(id, "select ignored: id not in the active list");
                false
            }
        }
    }

    /// Move to another track.
    ///
    /// With `explicit_id` the target is that track, or the first track when
    /// the id is not in the list. Otherwise shuffle picks a random member and
    /// the non-shuffled order wraps circularly in both directions. A now
    /// playing track that is not in the list (replaced by a search) counts as
    /// sitting just before the first element.
    pub fn advance(&mut self, direction: Direction, explicit_id: Option<&str>) {
        if self.tracks.is_empty() {
            return;
        }
        let len = self.tracks.len();

        let (target, explicit) = if let Some(id) = explicit_id {
            let index = self.position_of(id).unwrap_or_else(|| {
                debug!(id, "explicit id not in the active list, using the first track");
                0
            });
            (index, true)
        } else if self.shuffle {
            (self.rng.gen_range(0..len), false)
        } else {
            let index = match (self.current_index(), direction) {
                (Some(i), Direction::Forward) => (i + 1) % len,
                (Some(i), Direction::Backward) => (i + len - 1) % len,
                (None, Direction::Forward) => 0,
                (None, Direction::Backward) => len - 1,
            };
            (index, false)
        };

        let resume = explicit || self.is_active();
        self.change_to(target, resume);
    }

    fn change_to(&mut self, index: usize, autoplay: bool) {
        let track = self.tracks[index].clone();

        self.ticket += 1;
        self.current_time = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.error = None;
        self.is_loading = true;
        self.is_playing = false;
        self.ready = false;
        self.play_when_ready = autoplay;
        self.pending_seek = None;

        info!(ticket = self.ticket, id = %track.id, title = %track.name, autoplay, "loading track");
        self.media.load(self.ticket, &track);
        self.current = Some(track);
    }

    /// Pause when playing; otherwise start now if playable, or as soon as the
    /// pending load becomes playable. After an error the current track is
    /// loaded again and started once ready.
    pub fn toggle_play_pause(&mut self) {
        let Some(current_id) = self.current.as_ref().map(|t| t.id.clone()) else {
            return;
        };

        if self.is_playing {
            self.media.pause();
            self.is_playing = false;
        } else if self.play_when_ready {
            self.play_when_ready = false;
        } else if self.ready {
            self.media.play();
            self.is_playing = true;
        } else if self.is_loading {
            self.play_when_ready = true;
        } else {
            match self.position_of(&current_id) {
                Some(index) => self.change_to(index, true),
                None => {
                    if let Some(track) = self.current.clone() {
                        self.reload(track);
                    }
                }
            }
        }
    }

    fn reload(&mut self, track: Track) {
        self.ticket += 1;
        self.current_time = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.error = None;
        self.is_loading = true;
        self.ready = false;
        self.play_when_ready = true;
        self.pending_seek = None;
        self.media.load(self.ticket, &track);
    }

    /// Jump to `to`, clamped to the clip length once that is known. Before
    /// the clip is playable the position is held and applied on `CanPlay`.
    pub fn seek(&mut self, to: Duration) {
        if self.current.is_none() {
            return;
        }
        let to = self.clamp_to_duration(to);
        self.current_time = to;
        if self.ready {
            self.media.seek(to);
        } else {
            self.pending_seek = Some(to);
        }
    }

    fn clamp_to_duration(&self, to: Duration) -> Duration {
        if self.duration > Duration::ZERO {
            to.min(self.duration)
        } else {
            to
        }
    }

    /// Relative seek in whole seconds; negative values scrub backwards.
    pub fn seek_by(&mut self, secs: i64) {
        self.seek_by_micros(secs.saturating_mul(1_000_000));
    }

    /// Relative seek in microseconds, the unit MPRIS offsets use.
    pub fn seek_by_micros(&mut self, micros: i64) {
        let delta = Duration::from_micros(micros.unsigned_abs());
        let to = if micros < 0 {
            self.current_time.saturating_sub(delta)
        } else {
            self.current_time + delta
        };
        self.seek(to);
    }

    /// Pause and rewind to the start of the clip.
    pub fn stop(&mut self) {
        if self.is_playing {
            self.media.pause();
            self.is_playing = false;
        }
        self.play_when_ready = false;
        self.seek(Duration::ZERO);
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    /// Hide the error message. Playback is not resumed.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn on_can_play(&mut self, duration: Option<Duration>) {
        self.is_loading = false;
        self.ready = true;
        self.error = None;
        if let Some(d) = duration {
            self.duration = d;
        }
        if let Some(to) = self.pending_seek.take() {
            let to = self.clamp_to_duration(to);
            self.current_time = to;
            self.media.seek(to);
        }
        if self.play_when_ready {
            self.play_when_ready = false;
            self.media.play();
            self.is_playing = true;
        }
    }

    pub fn on_time_update(&mut self, current: Duration, duration: Option<Duration>) {
        self.current_time = current;
        if let Some(d) = duration {
            self.duration = d;
        }
    }

    pub fn on_media_error(&mut self, message: &str) {
        warn!(ticket = self.ticket, error = message, "media error");
        self.error = Some(MEDIA_ERROR_MESSAGE.to_string());
        self.is_playing = false;
        self.is_loading = false;
        self.ready = false;
        self.play_when_ready = false;
        self.pending_seek = None;
    }

    pub fn on_play_failed(&mut self, message: &str) {
        warn!(ticket = self.ticket, error = message, "playback could not start");
        self.error = Some(PLAY_FAILED_MESSAGE.to_string());
        self.is_playing = false;
        self.play_when_ready = false;
    }

    /// The clip finished: continue with the next track (shuffle honoured).
    pub fn on_ended(&mut self) {
        self.current_time = self.duration;
        self.advance(Direction::Forward, None);
    }

    /// Route an event from the media element. Events for any load other
    /// than the latest are dropped; returns whether the event was applied.
    pub fn handle_media_event(&mut self, event: MediaEvent) -> bool {
        if event.ticket != self.ticket {
            debug!(
                ticket = event.ticket,
                current = self.ticket,
                "dropping stale media event"
            );
            return false;
        }

        match event.kind {
            MediaEventKind::CanPlay { duration } => self.on_can_play(duration),
            MediaEventKind::TimeUpdate { current, duration } => {
                self.on_time_update(current, duration)
            }
            MediaEventKind::Ended => self.on_ended(),
            MediaEventKind::Error(msg) => self.on_media_error(&msg),
            MediaEventKind::PlayFailed(msg) => self.on_play_failed(&msg),
        }
        true
    }
}
