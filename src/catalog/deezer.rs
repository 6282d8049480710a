//! Wire types for the Deezer-compatible JSON API and their mapping into
//! `Track`.
//!
//! Records are decoded leniently: a field of the wrong JSON type reads as
//! absent, and a record that is not an object at all is skipped, so one bad
//! entry never poisons the batch.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::FetchError;
use super::model::{
    PLACEHOLDER_COVER, Track, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TRACK, alt_text,
};

/// Body of `/search` and `/artist/<id>/top`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TrackPage {
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<ApiError>,
}

/// Body of `/playlist/<id>`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlaylistBody {
    #[serde(default)]
    tracks: Option<TrackPage>,
    #[serde(default)]
    error: Option<ApiError>,
}

/// Body of `/search/autocomplete`. Proxies answer with a flat `data`
/// array; the public API nests the matching tracks under `tracks`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AutocompleteBody {
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    tracks: Option<TrackPage>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        match (&self.kind, &self.message) {
            (Some(k), Some(m)) => format!("{k}: {m}"),
            (None, Some(m)) => m.clone(),
            (Some(k), None) => k.clone(),
            (None, None) => "unspecified error".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DeezerTrack {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    preview: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    artist: Option<DeezerArtist>,
    #[serde(default, deserialize_with = "lenient_object")]
    album: Option<DeezerAlbum>,
}

#[derive(Debug, Default, Deserialize)]
struct DeezerArtist {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DeezerAlbum {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    cover_medium: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).ok())
}

impl TrackPage {
    /// Normalize the page; an upstream error object or an empty result is an error.
    pub(crate) fn into_tracks(self) -> Result<Vec<Track>, FetchError> {
        if let Some(err) = self.error {
            return Err(FetchError::Upstream(err.describe()));
        }
        let tracks = normalize(self.data.unwrap_or_default());
        if tracks.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(tracks)
    }
}

impl PlaylistBody {
    pub(crate) fn into_tracks(self) -> Result<Vec<Track>, FetchError> {
        if let Some(err) = self.error {
            return Err(FetchError::Upstream(err.describe()));
        }
        self.tracks.unwrap_or_default().into_tracks()
    }
}

impl AutocompleteBody {
    /// Distinct non-blank track titles, in upstream order.
    pub(crate) fn into_titles(self) -> Result<Vec<String>, FetchError> {
        if let Some(err) = self.error {
            return Err(FetchError::Upstream(err.describe()));
        }
        let records = match (self.data, self.tracks) {
            (Some(data), _) => data,
            (None, Some(page)) => page.data.unwrap_or_default(),
            (None, None) => Vec::new(),
        };

        let mut seen = HashSet::new();
        Ok(records
            .into_iter()
            .filter_map(|v| serde_json::from_value::<DeezerTrack>(v).ok())
            .filter_map(|t| non_blank(t.title))
            .filter(|title| seen.insert(title.clone()))
            .collect())
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

fn to_track(record: DeezerTrack) -> Track {
    let artist = non_blank(record.artist.and_then(|a| a.name));
    let (album, cover) = match record.album {
        Some(a) => (non_blank(a.title), non_blank(a.cover_medium)),
        None => (None, None),
    };

    let name = non_blank(record.title).unwrap_or_else(|| UNKNOWN_TRACK.to_string());
    let artist = artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let album = album.unwrap_or_else(|| UNKNOWN_ALBUM.to_string());
    let cover = cover.unwrap_or_else(|| PLACEHOLDER_COVER.to_string());
    let audio = record.preview.unwrap_or_default();
    let id = record.id.unwrap_or_else(|| audio.clone());
    let alt = alt_text(&album, &artist);

    Track {
        id,
        name,
        artist,
        album,
        cover,
        audio,
        alt,
    }
}

/// Map raw records to tracks. Placeholders are applied first; records
/// without a preview URL are dropped afterwards, then duplicate ids.
pub(crate) fn normalize(records: Vec<Value>) -> Vec<Track> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(|v| serde_json::from_value::<DeezerTrack>(v).ok())
        .map(to_track)
        .filter(|t| !t.audio.trim().is_empty())
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}
