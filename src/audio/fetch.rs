use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::catalog::FetchError;

use super::types::AudioCmd;

/// Download a whole preview clip into memory.
pub(super) fn download(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let bytes = response.bytes()?;
    if bytes.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(bytes.to_vec())
}

/// Download `url` on a worker thread and post the result back to the audio
/// thread as `AudioCmd::Buffered`.
pub(super) fn spawn_download(client: Client, ticket: u64, url: String, tx: Sender<AudioCmd>) {
    thread::spawn(move || {
        let result = match download(&client, &url) {
            Ok(bytes) => {
                debug!(ticket, bytes = bytes.len(), "preview downloaded");
                Ok(Arc::<[u8]>::from(bytes))
            }
            Err(e) => {
                warn!(ticket, %url, error = %e, "preview download failed");
                Err(e.to_string())
            }
        };
        // The audio thread is gone when this fails; nothing left to notify.
        let _ = tx.send(AudioCmd::Buffered { ticket, result });
    });
}
