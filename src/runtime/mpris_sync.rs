use crate::app::App;
use crate::mpris::MprisHandle;
use crate::playback::PlaybackPhase;

/// What was last published to MPRIS; metadata is only rebuilt on change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MprisSnapshot {
    pub ticket: u64,
    pub phase: PlaybackPhase,
}

impl MprisSnapshot {
    pub fn of(app: &App) -> Self {
        Self {
            ticket: app.player.ticket(),
            phase: app.player.phase(),
        }
    }
}

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let player = &app.player;
    mpris.set_track_metadata(player.current_index(), player.current());
    mpris.set_playback(player.phase());
    mpris.set_progress(player.current_time(), player.duration());
}
