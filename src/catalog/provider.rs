use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ApiSettings;

use super::deezer::{AutocompleteBody, PlaylistBody, TrackPage};
use super::error::FetchError;
use super::fallback::fallback_tracks;
use super::model::Track;

/// A source of tracks.
///
/// Every method reports failures instead of hiding them; the fallback policy
/// lives in `fetch_or_search` / `fetch_seed`, written once over this trait.
pub trait TrackProvider: Send + Sync {
    /// Free-text search.
    fn search(&self, query: &str, limit: u32) -> Result<Vec<Track>, FetchError>;
    /// An artist's most popular tracks.
    fn artist_top(&self, artist_id: &str, limit: u32) -> Result<Vec<Track>, FetchError>;
    /// The tracks of a public playlist.
    fn playlist(&self, playlist_id: &str) -> Result<Vec<Track>, FetchError>;
    /// Up to `limit` track titles completing `query`.
    fn suggestions(&self, query: &str, limit: u32) -> Result<Vec<String>, FetchError>;
}

/// What the initial playlist is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seed {
    /// A search; `None` uses the configured default query.
    Query(Option<String>),
    Artist(String),
    Playlist(String),
}

impl Seed {
    /// Short human label for list titles and logs.
    pub fn label(&self, settings: &ApiSettings) -> String {
        match self {
            Seed::Query(Some(q)) => format!("search: {q}"),
            Seed::Query(None) => format!("search: {}", settings.default_query),
            Seed::Artist(id) => format!("artist #{id}"),
            Seed::Playlist(id) => format!("playlist #{id}"),
        }
    }
}

/// Search for `query` (or the default query) and never fail: any error or an
/// empty result yields the built-in fallback playlist.
pub fn fetch_or_search(
    provider: &dyn TrackProvider,
    query: Option<&str>,
    settings: &ApiSettings,
) -> Vec<Track> {
    let query = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(settings.default_query.as_str());
    or_fallback(provider.search(query, settings.initial_limit), query)
}

/// Build the initial playlist for `seed`, with the same fallback guarantee
/// as `fetch_or_search`.
pub fn fetch_seed(provider: &dyn TrackProvider, seed: &Seed, settings: &ApiSettings) -> Vec<Track> {
    match seed {
        Seed::Query(q) => fetch_or_search(provider, q.as_deref(), settings),
        Seed::Artist(id) => or_fallback(provider.artist_top(id, settings.initial_limit), id),
        Seed::Playlist(id) => or_fallback(provider.playlist(id), id),
    }
}

/// Title suggestions for a partial query. Blank input, a zero limit and
/// any failure all yield an empty list.
pub fn suggest(provider: &dyn TrackProvider, query: &str, limit: u32) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }
    match provider.suggestions(query, limit) {
        Ok(mut titles) => {
            titles.truncate(limit as usize);
            titles
        }
        Err(e) => {
            debug!(%query, error = %e, "no suggestions");
            Vec::new()
        }
    }
}

fn or_fallback(result: Result<Vec<Track>, FetchError>, what: &str) -> Vec<Track> {
    match result {
        Ok(tracks) if !tracks.is_empty() => {
            info!(count = tracks.len(), source = what, "catalog tracks loaded");
            tracks
        }
        Ok(_) => {
            warn!(source = what, "catalog returned no tracks, using fallback playlist");
            fallback_tracks()
        }
        Err(e) => {
            warn!(source = what, error = %e, "catalog unavailable, using fallback playlist");
            fallback_tracks()
        }
    }
}

/// Whether `id` can be placed in a request path as is: ASCII digits only.
pub fn is_catalog_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn check_id(id: &str) -> Result<(), FetchError> {
    if is_catalog_id(id) {
        Ok(())
    } else {
        Err(FetchError::InvalidId(id.to_string()))
    }
}

/// HTTP client for the Deezer API, or anything that speaks its JSON
/// (a same-origin style proxy included).
pub struct DeezerProvider {
    client: Client,
    base_url: String,
}

impl DeezerProvider {
    pub fn new(settings: &ApiSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if settings.has_credentials() {
            if let (Some(key), Some(host)) = (&settings.key, &settings.host) {
                headers.insert("x-rapidapi-key", HeaderValue::from_str(key)?);
                headers.insert("x-rapidapi-host", HeaderValue::from_str(host)?);
            }
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("otono/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self::with_client(&settings.base_url, client))
    }

    pub(crate) fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "catalog request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("output", "json")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if !content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
        {
            return Err(FetchError::ContentType(content_type));
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl TrackProvider for DeezerProvider {
    fn search(&self, query: &str, limit: u32) -> Result<Vec<Track>, FetchError> {
        let page: TrackPage = self.get(
            "/search",
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )?;
        page.into_tracks()
    }

    fn artist_top(&self, artist_id: &str, limit: u32) -> Result<Vec<Track>, FetchError> {
        check_id(artist_id)?;
        let page: TrackPage = self.get(
            &format!("/artist/{artist_id}/top"),
            &[("limit", limit.to_string())],
        )?;
        page.into_tracks()
    }

    fn playlist(&self, playlist_id: &str) -> Result<Vec<Track>, FetchError> {
        check_id(playlist_id)?;
        let body: PlaylistBody = self.get(&format!("/playlist/{playlist_id}"), &[])?;
        body.into_tracks()
    }

    fn suggestions(&self, query: &str, limit: u32) -> Result<Vec<String>, FetchError> {
        let body: AutocompleteBody = self.get(
            "/search/autocomplete",
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )?;
        body.into_titles()
    }
}
