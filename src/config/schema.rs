use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/otono/config.toml` or `~/.config/otono/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `OTONO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub search: SearchSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Root of the catalog API. Point this at a proxy prefix
    /// (e.g. `http://localhost:3000/api/deezer`) to route requests through it.
    pub base_url: String,
    /// Query used to seed the playlist when none is given on the command line.
    pub default_query: String,
    /// Number of tracks requested for the initial playlist.
    pub initial_limit: u32,
    /// Number of tracks requested per interactive search.
    pub search_limit: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional API key forwarded as `x-rapidapi-key`.
    pub key: Option<String>,
    /// Optional API host forwarded as `x-rapidapi-host`.
    pub host: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.deezer.com".to_string(),
            default_query: "chillhop".to_string(),
            initial_limit: 6,
            search_limit: 10,
            timeout_secs: 10,
            key: None,
            host: None,
        }
    }
}

impl ApiSettings {
    /// Both halves of the proxy credential pair are present and non-empty.
    pub fn has_credentials(&self) -> bool {
        self.key.as_ref().is_some_and(|s| !s.is_empty())
            && self.host.as_ref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before a search is sent (milliseconds).
    pub debounce_ms: u64,
    /// Number of title suggestions shown under the search line. 0 turns them off.
    pub suggestion_limit: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            suggestion_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Timeout for downloading a preview clip (seconds).
    pub download_timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 300,
            download_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the cursor starts in "follow playback" mode.
    pub follow_playback: bool,

    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show next to the seek bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            follow_playback: true,
            header_text: " ~ Otonó: thirty seconds of everything ~ ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Directory for `otono.log`. Defaults to the XDG state directory.
    pub directory: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}
