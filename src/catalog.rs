//! Track catalog: the normalized `Track` record, the built-in fallback
//! playlist and the HTTP provider that fills the playlist from the
//! Deezer-compatible search API.

mod deezer;
mod error;
mod fallback;
mod model;
mod provider;

pub use error::FetchError;
pub use fallback::fallback_tracks;
pub use model::Track;
pub use provider::{
    DeezerProvider, Seed, TrackProvider, fetch_or_search, fetch_seed, is_catalog_id, suggest,
};
