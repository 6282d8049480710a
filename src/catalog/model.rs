/// Placeholder title for records without a usable one.
pub const UNKNOWN_TRACK: &str = "Unknown Track";
/// Placeholder artist for records without a usable one.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Placeholder album for records without a usable one.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
/// Artwork shown when the record carries no cover.
pub const PLACEHOLDER_COVER: &str = "https://picsum.photos/200";

/// A playable preview and its display metadata.
///
/// Tracks are built once per fetch and never mutated afterwards; a new
/// search replaces the whole list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    /// Upstream id as a decimal string, or the preview URL when the record had none.
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    /// Artwork URL.
    pub cover: String,
    /// Preview audio URL. Never empty.
    pub audio: String,
    /// Accessible description of the artwork.
    pub alt: String,
}

impl Track {
    /// `Artist - Title`, as rendered in the track list.
    pub fn display(&self) -> String {
        format!("{} - {}", self.artist, self.name)
    }
}

pub(crate) fn alt_text(album: &str, artist: &str) -> String {
    format!("Album cover for '{album}' by {artist}")
}
