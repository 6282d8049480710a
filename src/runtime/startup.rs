use std::time::Duration;

use crate::app::App;
use crate::catalog::{Seed, Track, TrackProvider, fetch_seed};
use crate::config;
use crate::playback::PlaybackController;
use crate::search::SearchCoordinator;

/// Fetch the initial list for `seed`; never empty.
pub fn initial_tracks(
    provider: &dyn TrackProvider,
    seed: &Seed,
    settings: &config::Settings,
) -> Vec<Track> {
    fetch_seed(provider, seed, &settings.api)
}

/// Assemble the app model with playback and UI defaults applied and the
/// first track cued (paused).
pub fn build_app(
    player: PlaybackController,
    settings: &config::Settings,
    tracks: Vec<Track>,
    list_label: String,
) -> App {
    let search = SearchCoordinator::new(Duration::from_millis(settings.search.debounce_ms));
    let mut app = App::new(player, search);

    app.follow_playback = settings.ui.follow_playback;
    app.list_label = list_label;
    app.player.set_shuffle(settings.playback.shuffle);
    app.player.load_track_list(tracks);
    app.sync_cursor();
    app
}
