//! Command line interface.

use clap::Parser;

use crate::catalog::{Seed, is_catalog_id};
use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "otono", version)]
#[command(about = "Terminal player for thirty-second previews from a Deezer-compatible catalog")]
pub struct Cli {
    /// Initial search query (defaults to `api.default_query`)
    pub query: Option<String>,

    /// Start with an artist's top tracks
    #[arg(long, value_name = "ID", value_parser = catalog_id, conflicts_with_all = ["query", "playlist"])]
    pub artist: Option<String>,

    /// Start with the tracks of a public playlist
    #[arg(long, value_name = "ID", value_parser = catalog_id, conflicts_with = "query")]
    pub playlist: Option<String>,

    /// Number of tracks to fetch at startup and per search
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

/// Catalog ids are decimal numbers; anything else would reshape the request path.
fn catalog_id(s: &str) -> Result<String, String> {
    let id = s.trim();
    if is_catalog_id(id) {
        Ok(id.to_string())
    } else {
        Err(format!("`{s}` is not a numeric catalog id"))
    }
}

impl Cli {
    /// What the initial track list is built from.
    pub fn seed(&self) -> Seed {
        if let Some(ref id) = self.artist {
            Seed::Artist(id.clone())
        } else if let Some(ref id) = self.playlist {
            Seed::Playlist(id.clone())
        } else {
            Seed::Query(self.query.clone().filter(|q| !q.trim().is_empty()))
        }
    }

    /// Fold command line overrides into loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(limit) = self.limit {
            settings.api.initial_limit = limit;
            settings.api.search_limit = limit;
        }
    }
}
