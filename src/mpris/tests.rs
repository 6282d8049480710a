use super::*;
use std::sync::mpsc;
use std::time::Duration;

fn make_track() -> Track {
    Track {
        id: "3135556".to_string(),
        name: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        cover: "https://e-cdns.example/cover.jpg".to_string(),
        audio: "https://cdn.example/preview.mp3".to_string(),
        alt: "Album cover for 'Test Album' by Test Artist".to_string(),
    }
}

fn iface() -> (PlayerIface, Arc<Mutex<SharedState>>, mpsc::Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    (
        PlayerIface {
            tx,
            state: state.clone(),
        },
        state,
        rx,
    )
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track));
    handle.set_progress(Duration::from_secs(2), Duration::from_micros(1_234_567));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.url.as_deref(), Some("https://cdn.example/preview.mp3"));
        assert_eq!(s.art_url.as_deref(), Some("https://e-cdns.example/cover.jpg"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(s.position_micros, 2_000_000);
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn unknown_length_is_not_published() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_progress(Duration::from_secs(1), Duration::ZERO);
    assert_eq!(state.lock().unwrap().length_micros, None);
}

#[test]
fn playback_status_maps_phases() {
    let (iface, state, _rx) = iface();

    for (phase, expected) in [
        (PlaybackPhase::Idle, "Stopped"),
        (PlaybackPhase::Loading, "Paused"),
        (PlaybackPhase::Playing, "Playing"),
        (PlaybackPhase::Paused, "Paused"),
        (PlaybackPhase::Error, "Paused"),
    ] {
        state.lock().unwrap().playback = phase;
        assert_eq!(iface.playback_status(), expected, "phase {phase:?}");
    }
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, state, _rx) = iface();
    let handle = MprisHandle { state };
    handle.set_track_metadata(Some(1), Some(&make_track()));
    handle.set_progress(Duration::ZERO, Duration::from_secs(30));

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_without_track() {
    let (iface, _state, _rx) = iface();
    assert!(iface.metadata().is_empty());
}

#[test]
fn player_methods_forward_control_commands() {
    let (iface, _state, rx) = iface();
    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();
    iface.seek(5_500_000);
    iface.seek(-1_500_000);
    iface.seek(0);

    let cmds: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        cmds,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop,
            ControlCmd::SeekBy(5_500_000),
            ControlCmd::SeekBy(-1_500_000),
        ]
    );
}
