//! Utilities for creating `rodio` sinks from downloaded clips.
//!
//! Clips are kept in memory as shared bytes so a seek can rebuild the sink
//! without downloading again.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink, Source};

pub(super) type Clip = Decoder<Cursor<Arc<[u8]>>>;

/// Open a decoder over `bytes`; fails on anything rodio cannot play.
pub(super) fn decode(bytes: &Arc<[u8]>) -> Result<Clip, DecoderError> {
    Decoder::new(Cursor::new(Arc::clone(bytes)))
}

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    bytes: &Arc<[u8]>,
    start_at: Duration,
) -> Result<Sink, DecoderError> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decode(bytes)?.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
