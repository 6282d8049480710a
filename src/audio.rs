//! Audio backend: a dedicated thread that downloads preview clips, decodes
//! them with `rodio` and reports progress as `MediaEvent`s.
//!
//! The playback controller talks to it through `AudioRemote`, which
//! implements `MediaElement`.

mod fetch;
mod player;
mod sink;
mod thread;
mod types;

pub use player::{AudioPlayer, AudioRemote};

#[cfg(test)]
mod tests;
