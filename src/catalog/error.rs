use reqwest::StatusCode;
use thiserror::Error;

/// Why a catalog request produced no tracks.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog answered with HTTP {0}")]
    Status(StatusCode),

    #[error("expected a JSON response, got content type {0:?}")]
    ContentType(Option<String>),

    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("catalog reported an error: {0}")]
    Upstream(String),

    #[error("not a catalog id: {0:?}")]
    InvalidId(String),

    #[error("no playable tracks found")]
    Empty,

    #[error("invalid API credential header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}
