//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::App;
use crate::catalog::Track;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::playback::PlaybackPhase;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("h/l", "prev/next song"),
    // H/L is filled in from config.
    ("H/L", ""),
    ("enter", "play selected song"),
    ("space/p", "play/pause"),
    ("gg/G", "top/bottom"),
    ("/", "search (tab takes suggestion)"),
    ("s", "shuffle"),
    ("x", "dismiss error"),
    ("K", "metadata"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| {
            if *k == "H/L" {
                format!("[H/L] scrub -/+{}s", scrub_seconds)
            } else {
                format!("[{}] {}", k, v)
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the seek bar time text (elapsed/total/remaining) per `UiSettings`.
/// An unknown (zero) total omits the total and remaining fields.
fn now_playing_time_text(elapsed: Duration, total: Duration, ui: &UiSettings) -> Option<String> {
    let total = (total > Duration::ZERO).then_some(total);

    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_mmss(elapsed)),
            TimeField::Total => total.map(format_mmss),
            TimeField::Remaining => total.map(|t| format!("-{}", format_mmss(t.saturating_sub(elapsed)))),
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Fraction of the clip already played, in `0.0..=1.0`.
fn progress_ratio(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

fn phase_label(phase: PlaybackPhase) -> &'static str {
    match phase {
        PlaybackPhase::Idle => "Stopped",
        PlaybackPhase::Loading => "Loading...",
        PlaybackPhase::Playing => "Playing",
        PlaybackPhase::Paused => "Paused",
        PlaybackPhase::Error => "Error",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Start, end and selected offset of the list window that keeps `selected`
/// centered when the list is taller than `height`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Suggestions shown after the search input, first one marked as the
/// `Tab` completion.
fn suggestions_text(suggestions: &[String]) -> Option<String> {
    let (first, rest) = suggestions.split_first()?;
    let mut text = format!("[tab] {first}");
    for s in rest {
        text.push_str(" · ");
        text.push_str(s);
    }
    Some(text)
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn track_metadata_text(track: &Track) -> String {
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nId: {}\nPreview: {}\nCover: {}\nArt: {}",
        track.name, track.artist, track.album, track.id, track.audio, track.cover, track.alt
    )
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" otono ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, app, chunks[1]);
    draw_seek_bar(frame, app, ui_settings, chunks[2]);
    draw_search_line(frame, app, chunks[3]);
    draw_track_list(frame, app, chunks[4]);

    // Overlay metadata popup (keeps list visible under it)
    if app.metadata_window {
        // Keep the popup inside the list area so it doesn't cover the rest.
        let popup_area = centered_rect_sized(80, 9, chunks[4]);
        frame.render_widget(Clear, popup_area);

        let meta = app
            .selected_track()
            .map(track_metadata_text)
            .unwrap_or_else(|| "No track selected".to_string());
        let meta_paragraph = Paragraph::new(meta)
            .block(padded_block(" metadata (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    if let Some(message) = app.visible_error() {
        let popup_area = centered_rect_sized(60, 5, frame.area());
        frame.render_widget(Clear, popup_area);
        let error = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red))
            .block(padded_block(" error (x dismisses) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(error, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}

fn draw_now_playing(frame: &mut Frame, app: &App, area: Rect) {
    let player = &app.player;
    let phase = player.phase();

    let mut status = vec![phase_label(phase).to_string()];
    status.push(if player.shuffle() {
        "Shuffle: ON".to_string()
    } else {
        "Shuffle: OFF".to_string()
    });
    if app.follow_playback {
        status.push("CURSOR: Follow".to_string());
    } else {
        status.push("CURSOR: Free-roam".to_string());
    }

    let lines = match player.current() {
        Some(track) => vec![
            Line::from(Span::from(track.name.as_str()).bold()),
            Line::from(track.artist.as_str()),
            Line::from(Span::from(track.alt.as_str()).italic().dim()),
            Line::from(status.join(" • ")),
        ],
        None => vec![
            Line::from("Nothing selected"),
            Line::from(status.join(" • ")),
        ],
    };

    let mut paragraph = Paragraph::new(lines)
        .block(padded_block(" now playing "))
        .wrap(Wrap { trim: true });
    if phase == PlaybackPhase::Loading {
        paragraph = paragraph.slow_blink();
    }
    frame.render_widget(paragraph, area);
}

fn draw_seek_bar(frame: &mut Frame, app: &App, ui: &UiSettings, area: Rect) {
    let player = &app.player;
    let elapsed = player.current_time();
    let total = player.duration();

    let label = now_playing_time_text(elapsed, total, ui).unwrap_or_default();
    let mut gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" seek "))
        .ratio(progress_ratio(elapsed, total))
        .label(label);
    // Nothing to seek in until the clip length is known.
    gauge = if total.is_zero() {
        gauge.gauge_style(Style::default().fg(Color::DarkGray))
    } else {
        gauge.gauge_style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(gauge, area);
}

fn draw_search_line(frame: &mut Frame, app: &App, area: Rect) {
    let mut text = String::new();
    if app.search_mode {
        text.push_str("/ ");
        text.push_str(&app.search_input);
        text.push('_');
    } else if app.search_input.trim().is_empty() {
        text.push_str("press / to search");
    } else {
        text.push_str(&app.search_input);
    }
    if app.search.is_pending() || app.search.is_searching() {
        text.push_str("  (searching...)");
    }

    let mut spans = vec![Span::from(text)];
    if app.search_mode {
        if let Some(hint) = suggestions_text(&app.suggestions) {
            spans.push(Span::from("   "));
            spans.push(Span::from(hint).italic().fg(Color::Cyan));
        }
    }

    let mut paragraph = Paragraph::new(Line::from(spans)).block(padded_block(" search "));
    if !app.search_mode {
        paragraph = paragraph.dim();
    }
    frame.render_widget(paragraph, area);
}

fn draw_track_list(frame: &mut Frame, app: &App, area: Rect) {
    let tracks = app.tracks();
    let now_playing = app.player.current_index();

    // Only build ListItems for the visible window (avoid allocating the entire list).
    let list_height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_in_window) =
        visible_window(tracks.len(), list_height, app.selected.min(tracks.len().saturating_sub(1)));

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let marker = if now_playing == Some(start + offset) {
                "♪ "
            } else {
                "  "
            };
            ListItem::new(format!("{marker}{}", track.display()))
        })
        .collect();

    let title = if app.list_label.is_empty() {
        " tracks ".to_string()
    } else {
        format!(" tracks ({}) ", app.list_label)
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if !tracks.is_empty() {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
