mod common;

use std::time::{Duration, Instant};

use common::FakeDaemon;
use jukebox::player::{ChangeEvent, ItemKind, Tag, RADIO_SNAPSHOT};
use jukebox::Jukebox;

const STATION: &str = "http://radio.example.org:8000/jazz";
const OTHER_STATION: &str = "https://stream.example.net/soul.mp3";

fn with_queue(n: usize) -> Jukebox<FakeDaemon> {
    let mut daemon = FakeDaemon::new();
    daemon.queue_library(n);
    Jukebox::new(daemon, Duration::from_millis(1000))
}

#[test]
fn test_radio_round_trip_restores_playlist() {
    let mut jukebox = with_queue(3);
    let before = jukebox.daemon().queue.clone();

    jukebox.start_radio_station(STATION).unwrap();
    assert!(jukebox.radio().active);
    assert!(jukebox.state().radio_mode);
    assert_eq!(jukebox.daemon().queue, vec![STATION]);
    assert_eq!(jukebox.daemon().saved.get(RADIO_SNAPSHOT), Some(&before));

    jukebox.leave_radio_mode().unwrap();
    assert!(!jukebox.radio().active);
    assert!(!jukebox.state().radio_mode);
    assert_eq!(jukebox.daemon().queue, before);
    assert!(!jukebox.daemon().saved.contains_key(RADIO_SNAPSHOT));
    assert_eq!(jukebox.playlist_current_count(), 3);
}

#[test]
fn test_stale_snapshot_is_replaced() {
    let mut jukebox = with_queue(2);
    let before = jukebox.daemon().queue.clone();
    jukebox
        .daemon_mut()
        .saved
        .insert(RADIO_SNAPSHOT.to_string(), vec!["stale.mp3".to_string()]);

    jukebox.start_radio_station(STATION).unwrap();
    assert_eq!(jukebox.daemon().saved.get(RADIO_SNAPSHOT), Some(&before));
}

#[test]
fn test_switching_station_keeps_first_snapshot() {
    let mut jukebox = with_queue(2);
    let before = jukebox.daemon().queue.clone();

    jukebox.start_radio_station(STATION).unwrap();
    jukebox.start_radio_station(OTHER_STATION).unwrap();
    assert_eq!(jukebox.daemon().queue, vec![OTHER_STATION]);
    assert_eq!(jukebox.daemon().saved.get(RADIO_SNAPSHOT), Some(&before));
    let saves = jukebox.daemon().commands.iter().filter(|c| c.starts_with("save")).count();
    assert_eq!(saves, 1);

    jukebox.leave_radio_mode().unwrap();
    assert_eq!(jukebox.daemon().queue, before);
}

#[test]
fn test_leave_outside_radio_mode_is_noop() {
    let mut jukebox = with_queue(2);
    jukebox.leave_radio_mode().unwrap();
    assert!(jukebox.daemon().commands.is_empty());
    assert_eq!(jukebox.daemon().queue.len(), 2);
}

#[test]
fn test_missing_snapshot_leaves_empty_playlist() {
    let mut jukebox = with_queue(2);
    jukebox.start_radio_station(STATION).unwrap();
    jukebox.daemon_mut().saved.clear();

    jukebox.leave_radio_mode().unwrap();
    assert!(!jukebox.radio().active);
    assert!(jukebox.daemon().queue.is_empty());
}

#[test]
fn test_playlist_add_leaves_radio_first() {
    let mut jukebox = with_queue(1);
    jukebox.start_radio_station(STATION).unwrap();

    jukebox.artists_get(None, true).unwrap();
    jukebox.playlist_add(Tag::Artist, "Nina Simone", false, false).unwrap();

    assert!(!jukebox.radio().active);
    let queue = &jukebox.daemon().queue;
    assert_eq!(queue.len(), 4);
    assert!(queue[0].contains("So What"));
    assert!(queue.iter().all(|f| f != STATION));
}

#[test]
fn test_radio_position_is_unset() {
    let mut jukebox = with_queue(2);
    jukebox.start_radio_station(STATION).unwrap();

    let start = Instant::now();
    jukebox.poll_at(start);
    assert_eq!(jukebox.daemon().status.get("song").map(String::as_str), Some("0"));
    assert_eq!(jukebox.state().playlist_position, -1);
    assert_eq!(jukebox.item().kind, ItemKind::Radio);
    assert_eq!(jukebox.item().title, STATION);
}

#[test]
fn test_startup_recovers_radio_session() {
    let mut daemon = FakeDaemon::new();
    daemon.queue = vec![STATION.to_string()];
    daemon.set_current(STATION);
    daemon.set_status(&[("state", "play"), ("song", "0")]);
    let saved: Vec<String> = daemon.library_files().into_iter().take(2).collect();
    daemon.saved.insert(RADIO_SNAPSHOT.to_string(), saved.clone());

    let mut jukebox = Jukebox::new(daemon, Duration::from_millis(1000));
    jukebox.start().unwrap();
    assert!(jukebox.radio().active);
    assert_eq!(jukebox.radio().snapshot.as_deref(), Some(RADIO_SNAPSHOT));
    assert_eq!(jukebox.state().playlist_position, -1);
    assert!(!jukebox.daemon().commands.iter().any(|c| c.starts_with("save")));

    jukebox.leave_radio_mode().unwrap();
    assert_eq!(jukebox.daemon().queue, saved);
}

#[test]
fn test_startup_with_stream_but_no_snapshot() {
    let mut daemon = FakeDaemon::new();
    daemon.queue = vec![STATION.to_string()];
    daemon.set_current(STATION);

    let mut jukebox = Jukebox::new(daemon, Duration::from_millis(1000));
    jukebox.start().unwrap();
    assert!(jukebox.radio().active);
    assert!(jukebox.radio().snapshot.is_none());

    jukebox.leave_radio_mode().unwrap();
    assert!(jukebox.daemon().queue.is_empty());
}

#[test]
fn test_startup_with_file_is_not_radio() {
    let mut daemon = FakeDaemon::new();
    daemon.queue_library(1);
    let file = daemon.queue[0].clone();
    daemon.set_current(&file);

    let mut jukebox = Jukebox::new(daemon, Duration::from_millis(1000));
    jukebox.start().unwrap();
    assert!(!jukebox.radio().active);
    assert!(!jukebox.state().radio_mode);
}

#[test]
fn test_starting_radio_reports_position_change() {
    let mut jukebox = with_queue(3);
    let daemon = jukebox.daemon_mut();
    let second = daemon.queue[1].clone();
    daemon.set_current(&second);
    daemon.set_status(&[("state", "play"), ("song", "1"), ("elapsed", "10.000")]);
    let start = Instant::now();
    jukebox.poll_at(start);
    jukebox.drain_events();
    assert_eq!(jukebox.state().playlist_position, 1);

    jukebox.start_radio_station(STATION).unwrap();
    assert!(jukebox.poll_at(start + Duration::from_secs(1)));
    let events = jukebox.drain_events();
    assert_eq!(events.iter().filter(|e| **e == ChangeEvent::PlaylistPosition).count(), 1);
    assert!(events.contains(&ChangeEvent::PlayingItem));
    assert_eq!(jukebox.state().playlist_position, -1);
}
