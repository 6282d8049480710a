//! Playback controller: the state machine that sits between user intents and
//! the single media element.
//!
//! The controller owns the active track list and playback state and drives
//! the media element through the `MediaElement` trait. The media element
//! answers with `MediaEvent`s that the event loop feeds back in through
//! `PlaybackController::handle_media_event`.

mod controller;
mod media;

pub use controller::*;
pub use media::*;
