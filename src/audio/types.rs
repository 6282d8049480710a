//! Commands understood by the audio thread.

use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Drop the current clip and start downloading `url` for `ticket`.
    Load { ticket: u64, url: String },
    /// A download finished. Sent by the download worker, never by the UI.
    Buffered {
        ticket: u64,
        result: Result<Arc<[u8]>, String>,
    },
    /// Resume the buffered clip.
    Play,
    /// Pause, keeping the position.
    Pause,
    /// Jump to an absolute position in the current clip.
    Seek(Duration),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
