use std::time::Duration;

use crate::catalog::Track;

/// The playback backend as seen by the controller.
///
/// Every `load` carries a ticket; events produced for that load echo it back
/// so the controller can drop events that belong to an earlier track.
pub trait MediaElement {
    /// Stop whatever is playing and start buffering `track` (paused).
    fn load(&mut self, ticket: u64, track: &Track);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, to: Duration);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEventKind {
    /// Buffered and decodable; playback may start.
    CanPlay { duration: Option<Duration> },
    /// Periodic position report.
    TimeUpdate {
        current: Duration,
        duration: Option<Duration>,
    },
    /// Reached the end of the clip.
    Ended,
    /// Download or decode failure.
    Error(String),
    /// The backend refused to start playback.
    PlayFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEvent {
    pub ticket: u64,
    pub kind: MediaEventKind,
}
