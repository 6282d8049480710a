use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::playback::{MediaEvent, MediaEventKind};

use super::fetch::spawn_download;
use super::sink::{create_sink_at, decode};
use super::types::AudioCmd;

const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    self_tx: Sender<AudioCmd>,
    client: Client,
    events: Sender<MediaEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device; clips will fail to load");
                None
            }
        };

        let mut deck = Deck::new(stream, client, self_tx, events);
        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    deck.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => deck.handle(cmd),
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Everything the audio thread knows about the clip it is playing.
pub(super) struct Deck {
    stream: Option<OutputStream>,
    client: Client,
    /// Handed to download workers so their results come back through the command queue.
    self_tx: Sender<AudioCmd>,
    events: Sender<MediaEvent>,

    ticket: u64,
    bytes: Option<Arc<[u8]>>,
    sink: Option<Sink>,
    duration: Option<Duration>,
    paused: bool,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Deck {
    pub(super) fn new(
        stream: Option<OutputStream>,
        client: Client,
        self_tx: Sender<AudioCmd>,
        events: Sender<MediaEvent>,
    ) -> Self {
        Self {
            stream,
            client,
            self_tx,
            events,
            ticket: 0,
            bytes: None,
            sink: None,
            duration: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    fn emit(&self, kind: MediaEventKind) {
        let _ = self.events.send(MediaEvent {
            ticket: self.ticket,
            kind,
        });
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn clear(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.bytes = None;
        self.duration = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    pub(super) fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { ticket, url } => {
                self.clear();
                self.ticket = ticket;
                debug!(ticket, %url, "loading preview");
                spawn_download(self.client.clone(), ticket, url, self.self_tx.clone());
            }

            AudioCmd::Buffered { ticket, result } => {
                if ticket != self.ticket {
                    debug!(ticket, current = self.ticket, "dropping stale download");
                    return;
                }
                match result {
                    Ok(bytes) => self.prepare(bytes),
                    Err(e) => self.emit(MediaEventKind::Error(e)),
                }
            }

            AudioCmd::Play => match self.sink.as_ref() {
                Some(s) => {
                    s.play();
                    if self.paused {
                        self.started_at = Some(Instant::now());
                    }
                    self.paused = false;
                }
                None => self.emit(MediaEventKind::PlayFailed("no clip is buffered".into())),
            },

            AudioCmd::Pause => {
                if let Some(ref s) = self.sink {
                    s.pause();
                    if let Some(st) = self.started_at.take() {
                        self.accumulated += st.elapsed();
                    }
                    self.paused = true;
                }
            }

            AudioCmd::Seek(to) => self.seek(to),

            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    /// Decode a freshly downloaded clip into a paused sink and report `CanPlay`.
    fn prepare(&mut self, bytes: Arc<[u8]>) {
        let duration = match decode(&bytes) {
            Ok(clip) => clip.total_duration(),
            Err(e) => {
                warn!(ticket = self.ticket, error = %e, "preview could not be decoded");
                self.emit(MediaEventKind::Error(format!("decode failed: {e}")));
                return;
            }
        };

        let Some(stream) = self.stream.as_ref() else {
            self.emit(MediaEventKind::Error("no audio output device".into()));
            return;
        };

        match create_sink_at(stream, &bytes, Duration::ZERO) {
            Ok(sink) => {
                self.sink = Some(sink);
                self.bytes = Some(bytes);
                self.duration = duration;
                self.paused = true;
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.emit(MediaEventKind::CanPlay { duration });
            }
            Err(e) => self.emit(MediaEventKind::Error(format!("decode failed: {e}"))),
        }
    }

    /// Rebuild the current sink and skip into the clip.
    fn seek(&mut self, to: Duration) {
        let (Some(stream), Some(bytes)) = (self.stream.as_ref(), self.bytes.as_ref()) else {
            return;
        };

        let new_sink = match create_sink_at(stream, bytes, to) {
            Ok(s) => s,
            Err(e) => {
                self.emit(MediaEventKind::Error(format!("seek failed: {e}")));
                return;
            }
        };

        if let Some(s) = self.sink.as_ref() {
            s.stop();
        }
        if self.paused {
            self.started_at = None;
        } else {
            new_sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(new_sink);
        self.accumulated = to;
    }

    /// Periodic position report and end-of-clip detection.
    pub(super) fn tick(&mut self) {
        let Some(ref s) = self.sink else {
            return;
        };
        if self.paused {
            return;
        }

        if s.empty() {
            self.sink = None;
            self.paused = true;
            self.started_at = None;
            self.emit(MediaEventKind::Ended);
            return;
        }

        let current = match self.duration {
            Some(d) => self.elapsed().min(d),
            None => self.elapsed(),
        };
        self.emit(MediaEventKind::TimeUpdate {
            current,
            duration: self.duration,
        });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(ref s) = self.sink {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(s, fade_out_ms);
            }
            s.stop();
        }
        self.sink = None;
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
