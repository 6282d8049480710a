use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::{Direction, MediaEvent};
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::runtime::workers::{SearchOutcome, SearchWorker, SuggestionOutcome, SuggestionWorker};
use crate::ui;

/// Receiving ends of every worker channel the loop drains.
pub struct Inbox {
    pub control_rx: mpsc::Receiver<ControlCmd>,
    pub media_rx: mpsc::Receiver<MediaEvent>,
    pub search_rx: mpsc::Receiver<SearchOutcome>,
    pub suggest_rx: mpsc::Receiver<SuggestionOutcome>,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// What MPRIS last saw.
    pub last_mpris: Option<MprisSnapshot>,
}

/// Main terminal event loop: handles input, UI drawing, worker results and
/// MPRIS. Returns `Ok(())` when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    inbox: &Inbox,
    searches: &SearchWorker,
    suggester: &SuggestionWorker,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Media events for superseded loads are dropped by the controller.
        while let Ok(event) = inbox.media_rx.try_recv() {
            if app.player.handle_media_event(event) {
                app.sync_cursor();
            }
        }

        while let Ok(done) = inbox.search_rx.try_recv() {
            app.apply_search_result(done.generation, &done.query, done.result);
        }

        while let Ok(done) = inbox.suggest_rx.try_recv() {
            app.apply_suggestions(done.generation, done.titles);
        }

        if let Some(request) = app.search.poll(Instant::now()) {
            suggester.spawn(&request);
            searches.spawn(request);
        }

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        let snapshot = MprisSnapshot::of(app);
        if state.last_mpris != Some(snapshot) {
            update_mpris(mpris, app);
            state.last_mpris = Some(snapshot);
        } else {
            mpris.set_progress(app.player.current_time(), app.player.duration());
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = inbox.control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, control_tx, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn quit(settings: &config::Settings, audio_player: &AudioPlayer) {
    audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
}

fn scrub_seconds(settings: &config::Settings) -> i64 {
    settings.controls.scrub_seconds.min(i64::MAX as u64) as i64
}

/// Apply a transport command from MPRIS or the keyboard. Returns `true` on quit.
fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> bool {
    match cmd {
        ControlCmd::Quit => {
            quit(settings, audio_player);
            return true;
        }
        ControlCmd::Play => {
            if !app.player.is_active() {
                app.player.toggle_play_pause();
            }
        }
        ControlCmd::Pause => {
            if app.player.is_active() {
                app.player.toggle_play_pause();
            }
        }
        ControlCmd::PlayPause => {
            if !app.search_mode {
                app.follow_playback_on();
            }
            app.player.toggle_play_pause();
        }
        ControlCmd::Stop => app.player.stop(),
        ControlCmd::Next => app.skip(Direction::Forward),
        ControlCmd::Prev => app.skip(Direction::Backward),
        ControlCmd::SeekBy(micros) => app.player.seek_by_micros(micros),
    }

    false
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    control_tx: &mpsc::Sender<ControlCmd>,
    state: &mut EventLoopState,
) -> bool {
    if app.search_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_search(),
            // The pending search still fires after its quiet period.
            KeyCode::Enter => app.exit_search_mode(),
            KeyCode::Backspace => app.pop_search_char(Instant::now()),
            KeyCode::Tab => app.accept_suggestion(Instant::now()),
            KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.follow_playback_off();
                app.next();
            }
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.follow_playback_off();
                app.prev();
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_search_char(c, Instant::now());
                }
            }
            _ => {}
        }

        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            quit(settings, audio_player);
            return true;
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.enter_search_mode();
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            app.player.toggle_shuffle();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.set_selected(0);
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.set_selected(usize::MAX);
        }
        KeyCode::Char('j') => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            let is_current = app
                .selected_track()
                .zip(app.player.current())
                .is_some_and(|(sel, cur)| sel.id == cur.id);
            if !is_current {
                app.play_selected();
            } else if !app.player.is_active() {
                let _ = control_tx.send(ControlCmd::Play);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            app.player.seek_by(scrub_seconds(settings));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            app.player.seek_by(-scrub_seconds(settings));
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            app.toggle_metadata_window();
        }
        KeyCode::Char('x') | KeyCode::Esc => {
            state.pending_gg = false;
            app.dismiss_error();
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}
