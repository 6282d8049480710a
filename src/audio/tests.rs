use super::fetch::download;
use super::sink::decode;
use super::thread::Deck;
use super::types::AudioCmd;
use super::*;
use crate::catalog::{FetchError, Track};
use crate::playback::{MediaElement, MediaEvent, MediaEventKind};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(WAIT)
        .build()
        .unwrap()
}

/// Serve exactly one canned HTTP response on a loopback port; returns its URL.
fn serve_once(status_line: &str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let head = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: audio/mpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
            let _ = stream.flush();
        }
    });
    format!("http://{addr}/preview.mp3")
}

fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/preview.mp3")
}

/// A deck with no output device, plus its command queue and event stream.
fn deck() -> (Deck, Receiver<AudioCmd>, Receiver<MediaEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (ev_tx, ev_rx) = mpsc::channel();
    (Deck::new(None, client(), cmd_tx, ev_tx), cmd_rx, ev_rx)
}

fn track(audio: &str) -> Track {
    Track {
        id: "1".into(),
        name: "Clip".into(),
        artist: "Artist".into(),
        album: "Album".into(),
        cover: "https://picsum.photos/200".into(),
        audio: audio.into(),
        alt: "Album cover for 'Album' by Artist".into(),
    }
}

#[test]
fn download_returns_body_bytes() {
    let url = serve_once("200 OK", b"ID3fakeclip");
    let bytes = download(&client(), &url).unwrap();
    assert_eq!(bytes, b"ID3fakeclip");
}

#[test]
fn download_reports_http_status() {
    let url = serve_once("404 Not Found", b"");
    let err = download(&client(), &url).unwrap_err();
    assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 404));
}

#[test]
fn garbage_bytes_do_not_decode() {
    let bytes: Arc<[u8]> = Arc::from(&b"definitely not audio"[..]);
    assert!(decode(&bytes).is_err());
}

#[test]
fn load_posts_download_result_back_to_the_queue() {
    let (mut deck, cmd_rx, ev_rx) = deck();
    deck.handle(AudioCmd::Load {
        ticket: 3,
        url: dead_url(),
    });

    let cmd = cmd_rx.recv_timeout(WAIT).unwrap();
    assert!(matches!(cmd, AudioCmd::Buffered { ticket: 3, result: Err(_) }));

    deck.handle(cmd);
    let event = ev_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(event.ticket, 3);
    assert!(matches!(event.kind, MediaEventKind::Error(_)));
}

#[test]
fn stale_download_is_dropped() {
    let (mut deck, cmd_rx, ev_rx) = deck();
    deck.handle(AudioCmd::Load {
        ticket: 1,
        url: dead_url(),
    });
    deck.handle(AudioCmd::Load {
        ticket: 2,
        url: dead_url(),
    });

    deck.handle(AudioCmd::Buffered {
        ticket: 1,
        result: Err("late".into()),
    });
    assert!(ev_rx.try_recv().is_err());

    // Drain the two real download results so the workers can finish.
    let _ = cmd_rx.recv_timeout(WAIT);
    let _ = cmd_rx.recv_timeout(WAIT);
}

#[test]
fn undecodable_clip_reports_error() {
    let (mut deck, _cmd_rx, ev_rx) = deck();
    deck.handle(AudioCmd::Buffered {
        ticket: 0,
        result: Ok(Arc::from(&b"<html>not audio</html>"[..])),
    });

    let event = ev_rx.recv_timeout(WAIT).unwrap();
    assert!(matches!(event.kind, MediaEventKind::Error(ref m) if m.starts_with("decode failed")));
}

#[test]
fn play_without_buffered_clip_fails() {
    let (mut deck, _cmd_rx, ev_rx) = deck();
    deck.handle(AudioCmd::Play);

    let event = ev_rx.recv_timeout(WAIT).unwrap();
    assert!(matches!(event.kind, MediaEventKind::PlayFailed(_)));
}

#[test]
fn idle_deck_is_silent_on_tick_and_seek() {
    let (mut deck, _cmd_rx, ev_rx) = deck();
    deck.tick();
    deck.handle(AudioCmd::Seek(Duration::from_secs(3)));
    deck.handle(AudioCmd::Pause);
    assert!(ev_rx.try_recv().is_err());
}

#[test]
fn remote_reports_failures_when_thread_is_gone() {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (ev_tx, ev_rx) = mpsc::channel();
    drop(cmd_rx);
    let mut remote = AudioRemote::new(cmd_tx, ev_tx);

    remote.load(7, &track("https://cdn.example/1.mp3"));
    let event = ev_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(event.ticket, 7);
    assert!(matches!(event.kind, MediaEventKind::Error(_)));

    remote.play();
    let event = ev_rx.recv_timeout(WAIT).unwrap();
    assert_eq!(event.ticket, 7);
    assert!(matches!(event.kind, MediaEventKind::PlayFailed(_)));

    remote.pause();
    remote.seek(Duration::from_secs(1));
    assert!(ev_rx.try_recv().is_err());
}

#[test]
fn remote_forwards_load_with_track_audio_url() {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (ev_tx, _ev_rx) = mpsc::channel();
    let mut remote = AudioRemote::new(cmd_tx, ev_tx);

    remote.load(2, &track("https://cdn.example/2.mp3"));
    match cmd_rx.try_recv().unwrap() {
        AudioCmd::Load { ticket, url } => {
            assert_eq!(ticket, 2);
            assert_eq!(url, "https://cdn.example/2.mp3");
        }
        other => panic!("unexpected command {other:?}"),
    }
}
