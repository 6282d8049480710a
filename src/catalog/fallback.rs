//! The playlist offered when the catalog cannot produce usable data.

use super::model::{Track, alt_text};

struct FallbackEntry {
    id: &'static str,
    name: &'static str,
    artist: &'static str,
    album: &'static str,
    cover: &'static str,
    audio: &'static str,
}

const FALLBACK: [FallbackEntry; 2] = [
    FallbackEntry {
        id: "fallback-1",
        name: "Sunset Vibes",
        artist: "ChillHop Music",
        album: "Sunset Vibes",
        cover: "https://picsum.photos/200",
        audio: "https://actions.google.com/sounds/v1/alarms/alarm_clock.ogg",
    },
    FallbackEntry {
        id: "fallback-2",
        name: "Morning Coffee",
        artist: "ChillHop Music",
        album: "Morning Coffee",
        cover: "https://picsum.photos/201",
        audio: "https://actions.google.com/sounds/v1/alarms/beep_short.ogg",
    },
];

const _: () = assert!(!FALLBACK.is_empty());

/// Fresh copy of the built-in playlist. Never empty.
pub fn fallback_tracks() -> Vec<Track> {
    FALLBACK
        .iter()
        .map(|e| Track {
            id: e.id.to_string(),
            name: e.name.to_string(),
            artist: e.artist.to_string(),
            album: e.album.to_string(),
            cover: e.cover.to_string(),
            audio: e.audio.to_string(),
            alt: alt_text(e.album, e.artist),
        })
        .collect()
}
