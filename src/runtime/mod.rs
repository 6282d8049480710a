use std::sync::{Arc, mpsc};

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::audio::AudioPlayer;
use crate::catalog::{DeezerProvider, TrackProvider};
use crate::cli::Cli;
use crate::mpris::ControlCmd;
use crate::playback::{MediaEvent, PlaybackController};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;
mod workers;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut settings = settings::load_settings();
    cli.apply(&mut settings);

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    }

    let _log_guard = logging::init(&settings.logging);

    let provider: Arc<dyn TrackProvider> = Arc::new(DeezerProvider::new(&settings.api)?);
    let seed = cli.seed();
    let tracks = startup::initial_tracks(provider.as_ref(), &seed, &settings);
    info!(count = tracks.len(), seed = ?seed, "initial track list ready");

    let (media_tx, media_rx) = mpsc::channel::<MediaEvent>();
    let audio_player = AudioPlayer::new(&settings.audio, media_tx)?;
    let player = PlaybackController::new(Box::new(audio_player.remote()));
    let mut app = startup::build_app(player, &settings, tracks, seed.label(&settings.api));

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());
    mpris_sync::update_mpris(&mpris, &app);

    let (search_tx, search_rx) = mpsc::channel::<workers::SearchOutcome>();
    let searches = workers::SearchWorker::new(Arc::clone(&provider), search_tx, settings.api.search_limit);
    let (suggest_tx, suggest_rx) = mpsc::channel::<workers::SuggestionOutcome>();
    let suggester = workers::SuggestionWorker::new(provider, suggest_tx, settings.search.suggestion_limit);
    let inbox = event_loop::Inbox {
        control_rx,
        media_rx,
        search_rx,
        suggest_rx,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &mpris,
            &control_tx,
            &inbox,
            &searches,
            &suggester,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("otono exiting");
    run_result
}
