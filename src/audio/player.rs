use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::warn;

use crate::catalog::{FetchError, Track};
use crate::config::AudioSettings;
use crate::playback::{MediaElement, MediaEvent, MediaEventKind};

use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Sender<MediaEvent>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Start the audio thread. Events for every load are sent on `events`.
    pub fn new(audio_settings: &AudioSettings, events: Sender<MediaEvent>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("otono/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(audio_settings.download_timeout_secs))
            .build()?;

        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let audio_handle = spawn_audio_thread(rx, tx.clone(), client, events.clone());

        Ok(Self {
            tx,
            events,
            join: Mutex::new(Some(audio_handle)),
        })
    }

    /// A handle the playback controller drives the audio thread with.
    pub fn remote(&self) -> AudioRemote {
        AudioRemote::new(self.tx.clone(), self.events.clone())
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.tx.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

/// `MediaElement` backed by the audio thread.
///
/// When the thread is gone, commands are answered with failure events so the
/// controller never waits for a `CanPlay` that will not come.
#[derive(Clone)]
pub struct AudioRemote {
    tx: Sender<AudioCmd>,
    events: Sender<MediaEvent>,
    ticket: u64,
}

impl AudioRemote {
    pub(super) fn new(tx: Sender<AudioCmd>, events: Sender<MediaEvent>) -> Self {
        Self {
            tx,
            events,
            ticket: 0,
        }
    }

    fn send(&self, cmd: AudioCmd, on_failure: impl FnOnce() -> MediaEventKind) {
        if self.tx.send(cmd).is_err() {
            warn!(ticket = self.ticket, "audio thread is not running");
            let _ = self.events.send(MediaEvent {
                ticket: self.ticket,
                kind: on_failure(),
            });
        }
    }
}

impl MediaElement for AudioRemote {
    fn load(&mut self, ticket: u64, track: &Track) {
        self.ticket = ticket;
        let url = track.audio.clone();
        self.send(AudioCmd::Load { ticket, url }, || {
            MediaEventKind::Error("audio thread is not running".into())
        });
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play, || {
            MediaEventKind::PlayFailed("audio thread is not running".into())
        });
    }

    fn pause(&mut self) {
        // Nothing is playing without the thread.
        let _ = self.tx.send(AudioCmd::Pause);
    }

    fn seek(&mut self, to: Duration) {
        let _ = self.tx.send(AudioCmd::Seek(to));
    }
}
