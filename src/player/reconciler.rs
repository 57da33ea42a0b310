//! Status reconciliation 🔄
//!
//! Polls the daemon at a bounded rate, diffs the result against the cached
//! [`PlaybackState`] and [`PlayingItem`], and queues one [`ChangeEvent`] per
//! changed field. Also owns radio mode: the live playlist is saved under a
//! reserved name before a stream replaces it, and restored afterwards.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::error::DaemonError;
use super::events::{ChangeEvent, EventQueue};
use super::item::{is_stream_uri, parse_seconds, title_from_path, PlayingItem};
use super::state::{PlaybackState, Transport};
use super::traits::{Daemon, Record};

/// Stored-playlist name holding the user's playlist during a radio session.
pub const RADIO_SNAPSHOT: &str = "jukebox-radio-restore";

pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(1000);

/// An active radio session and the snapshot it will restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadioSession {
    pub active: bool,
    /// Name of the stored playlist to restore, when one is known to exist.
    pub snapshot: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
}

pub struct StatusReconciler {
    update_interval: Duration,
    last_poll: Option<Instant>,
    item: PlayingItem,
    state: PlaybackState,
    events: EventQueue,
    radio: RadioSession,
    playlist_current: Vec<String>,
    song_changed: bool,
}

impl Default for StatusReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL)
    }
}

impl StatusReconciler {
    pub fn new(update_interval: Duration) -> Self {
        Self {
            update_interval,
            last_poll: None,
            item: PlayingItem::default(),
            state: PlaybackState::default(),
            events: EventQueue::default(),
            radio: RadioSession::default(),
            playlist_current: Vec::new(),
            song_changed: false,
        }
    }

    pub fn item(&self) -> &PlayingItem {
        &self.item
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn radio(&self) -> &RadioSession {
        &self.radio
    }

    pub fn events(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    // ═══════════════════════════════════════════════════════════════
    // Polling
    // ═══════════════════════════════════════════════════════════════

    pub fn poll(&mut self, daemon: &mut dyn Daemon) -> bool {
        self.poll_at(daemon, Instant::now())
    }

    /// Same as [`poll`](Self::poll) with an explicit clock reading.
    ///
    /// Returns whether any cached field changed. A transport failure skips
    /// the tick without touching the cache.
    pub fn poll_at(&mut self, daemon: &mut dyn Daemon, now: Instant) -> bool {
        if let Some(last) = self.last_poll {
            if now.saturating_duration_since(last) < self.update_interval {
                return false;
            }
        }

        let fetched = daemon
            .current_song()
            .and_then(|song| daemon.status().map(|status| (song, status)));
        let (song, status) = match fetched {
            Ok(raw) => raw,
            Err(e) if e.is_transport() => {
                debug!("Status poll skipped: {}", e);
                return false;
            }
            Err(e) => {
                warn!("Status poll rejected: {}", e);
                return false;
            }
        };

        self.last_poll = Some(now);
        self.reconcile(&song, &status)
    }

    fn reconcile(&mut self, song: &Record, status: &Record) -> bool {
        let mut changed = false;

        if self.item.update(song) {
            debug!(file = %self.item.file_uri, "Playing item changed");
            self.events.push(ChangeEvent::PlayingItem);
            self.song_changed = true;
            changed = true;
        }

        let volume = parse_int(status.get("volume")).clamp(0, 100) as u8;
        changed |= self.reconcile_volume(volume);

        changed |= Self::reconcile_flag(
            &mut self.events,
            &mut self.state.repeat,
            parse_flag(status.get("repeat")),
            ChangeEvent::Repeat,
        );
        changed |= Self::reconcile_flag(
            &mut self.events,
            &mut self.state.random,
            parse_flag(status.get("random")),
            ChangeEvent::Random,
        );
        changed |= Self::reconcile_flag(
            &mut self.events,
            &mut self.state.single,
            parse_flag(status.get("single")),
            ChangeEvent::Single,
        );
        changed |= Self::reconcile_flag(
            &mut self.events,
            &mut self.state.consume,
            parse_flag(status.get("consume")),
            ChangeEvent::Consume,
        );

        let transport = Transport::from_mpd(status.get("state").map(String::as_str).unwrap_or(""));
        if self.state.transport != transport {
            self.state.transport = transport;
            self.events.push(ChangeEvent::Transport);
            changed = true;
        }

        if transport == Transport::Stopped {
            changed |= self.reconcile_position(-1);
            changed |= self.reconcile_elapsed(0.0);
        } else {
            let position = if self.radio.active {
                -1
            } else {
                status.get("song").map_or(-1, |pos| parse_int(Some(pos)).max(0))
            };
            changed |= self.reconcile_position(position);
            changed |= self.reconcile_elapsed(parse_seconds(status.get("elapsed")));
        }

        changed
    }

    fn reconcile_volume(&mut self, volume: u8) -> bool {
        // Muted locally: the daemon sits at 0 and the cached volume is what un-muting restores.
        if self.state.muted && volume == 0 {
            return false;
        }
        if self.state.volume == volume && self.state.muted == (volume == 0) {
            return false;
        }
        self.state.volume = volume;
        self.state.muted = volume == 0;
        self.events.push(ChangeEvent::Volume);
        true
    }

    fn reconcile_flag(events: &mut EventQueue, cached: &mut bool, value: bool, event: ChangeEvent) -> bool {
        if *cached == value {
            return false;
        }
        *cached = value;
        events.push(event);
        true
    }

    fn reconcile_position(&mut self, position: i32) -> bool {
        if self.state.playlist_position == position {
            return false;
        }
        self.state.playlist_position = position;
        self.events.push(ChangeEvent::PlaylistPosition);
        true
    }

    fn reconcile_elapsed(&mut self, seconds: f64) -> bool {
        if !self.item.set_elapsed(seconds) {
            return false;
        }
        self.events.push(ChangeEvent::Elapsed);
        true
    }

    /// True once after the playing item changed, then false until it changes again.
    pub fn current_song_changed(&mut self) -> bool {
        std::mem::take(&mut self.song_changed)
    }

    // ═══════════════════════════════════════════════════════════════
    // Radio Mode 📻
    // ═══════════════════════════════════════════════════════════════

    /// Replaces the live playlist with `stream_uri` and starts playing it,
    /// keeping the previous playlist in a reserved stored playlist.
    ///
    /// Switching stations while already in radio mode keeps the existing
    /// snapshot. Nothing is rolled back if a later step fails.
    pub fn start_radio_station(&mut self, daemon: &mut dyn Daemon, stream_uri: &str) -> Result<(), DaemonError> {
        if let Err(e) = self.refresh_playlist(daemon) {
            debug!("Could not read playlist before radio: {}", e);
        }

        if !self.radio.active {
            self.radio.active = true;
            self.state.radio_mode = true;

            if let Err(e) = daemon.remove_playlist(RADIO_SNAPSHOT) {
                debug!("No stale radio snapshot removed: {}", e);
            }
            match daemon.save(RADIO_SNAPSHOT) {
                Ok(()) => self.radio.snapshot = Some(RADIO_SNAPSHOT.to_string()),
                Err(e) => warn!("Could not save playlist before radio: {}", e),
            }
        }

        info!(uri = stream_uri, "Starting radio station");
        daemon.clear()?;
        daemon.add(stream_uri)?;
        daemon.play_pos(0)?;
        Ok(())
    }

    /// Restores the playlist saved by [`start_radio_station`](Self::start_radio_station).
    /// A no-op outside radio mode; a missing snapshot leaves the playlist empty.
    pub fn leave_radio_mode(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        if !self.radio.active {
            return Ok(());
        }

        info!("Leaving radio mode");
        daemon.clear()?;
        if let Err(e) = daemon.load(RADIO_SNAPSHOT) {
            warn!("No radio snapshot to restore, playlist left empty: {}", e);
        }
        if let Err(e) = daemon.remove_playlist(RADIO_SNAPSHOT) {
            debug!("Radio snapshot cleanup failed: {}", e);
        }

        self.radio = RadioSession::default();
        self.state.radio_mode = false;
        if let Err(e) = self.refresh_playlist(daemon) {
            debug!("Could not read restored playlist: {}", e);
        }
        Ok(())
    }

    /// Re-derives radio mode after a restart while a stream is playing.
    /// Adopts an existing snapshot but never saves a new one. Loading it is
    /// deferred to [`leave_radio_mode`](Self::leave_radio_mode), so the stream
    /// keeps the live playlist to itself until then.
    pub fn recover_radio_session(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        let song = daemon.current_song()?;
        let streaming = song.get("file").is_some_and(|file| is_stream_uri(file));
        if !streaming {
            return Ok(());
        }

        self.radio.active = true;
        self.state.radio_mode = true;

        match daemon.playlists() {
            Ok(names) if names.iter().any(|name| name == RADIO_SNAPSHOT) => {
                info!("Recovered radio session with saved playlist");
                self.radio.snapshot = Some(RADIO_SNAPSHOT.to_string());
            }
            Ok(_) => warn!("Recovered radio session without a saved playlist"),
            Err(e) => warn!("Could not look up radio snapshot: {}", e),
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════
    // Playback Controls
    // ═══════════════════════════════════════════════════════════════

    pub fn player_control_set(&mut self, daemon: &mut dyn Daemon, action: PlayerAction) -> Result<(), DaemonError> {
        match action {
            PlayerAction::Play if self.state.transport == Transport::Paused => daemon.pause(false),
            PlayerAction::Play => daemon.play(),
            PlayerAction::Pause => daemon.pause(true),
            PlayerAction::Stop => daemon.stop(),
            PlayerAction::Next => daemon.next(),
            PlayerAction::Previous => daemon.previous(),
        }
    }

    /// Plays the live playlist entry with 1-based `number`.
    pub fn play_playlist_item(&mut self, daemon: &mut dyn Daemon, number: u32) -> Result<(), DaemonError> {
        if number == 0 {
            return Ok(());
        }
        daemon.play_pos(number - 1)
    }

    /// Out-of-range values are ignored.
    pub fn volume_set(&mut self, daemon: &mut dyn Daemon, percentage: u8) -> Result<(), DaemonError> {
        if percentage > 100 {
            return Ok(());
        }
        daemon.set_volume(percentage)?;
        self.state.volume = percentage;
        self.state.muted = percentage == 0;
        Ok(())
    }

    pub fn volume_set_relative(&mut self, daemon: &mut dyn Daemon, delta: i32) -> Result<(), DaemonError> {
        let volume = (self.state.volume as i32 + delta).clamp(0, 100) as u8;
        self.volume_set(daemon, volume)
    }

    /// Mutes by commanding volume 0 while keeping the cached volume,
    /// so that the next switch restores it.
    pub fn volume_mute_switch(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        if self.state.muted {
            daemon.set_volume(self.state.volume)?;
            self.state.muted = false;
        } else {
            daemon.set_volume(0)?;
            self.state.muted = true;
        }
        Ok(())
    }

    pub fn random_switch(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        let enable = !self.state.random;
        daemon.set_random(enable)?;
        self.state.random = enable;
        Ok(())
    }

    pub fn repeat_switch(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        let enable = !self.state.repeat;
        daemon.set_repeat(enable)?;
        self.state.repeat = enable;
        Ok(())
    }

    pub fn single_switch(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        let enable = !self.state.single;
        daemon.set_single(enable)?;
        self.state.single = enable;
        Ok(())
    }

    pub fn consume_switch(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        let enable = !self.state.consume;
        daemon.set_consume(enable)?;
        self.state.consume = enable;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════
    // Live Playlist 📋
    // ═══════════════════════════════════════════════════════════════

    /// Re-reads the live playlist as display lines ("1. Title").
    pub fn refresh_playlist(&mut self, daemon: &mut dyn Daemon) -> Result<&[String], DaemonError> {
        let entries = daemon.playlist_info()?;
        self.playlist_current = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {}", i + 1, entry_title(entry)))
            .collect();
        Ok(&self.playlist_current)
    }

    /// The live playlist as of the last refresh.
    pub fn playlist_current(&self) -> &[String] {
        &self.playlist_current
    }

    pub fn playlist_current_count(&self) -> usize {
        self.playlist_current.len()
    }

    pub fn playlist_current_clear(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        daemon.clear()?;
        self.playlist_current.clear();
        Ok(())
    }

    pub fn playlist_current_playing_index(&self) -> i32 {
        self.state.playlist_position
    }
}

fn entry_title(entry: &Record) -> String {
    match entry.get("title").map(|t| t.trim()).filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => entry.get("file").map(|f| title_from_path(f)).unwrap_or_default(),
    }
}

/// Lenient integer parse: missing or malformed values are 0.
fn parse_int(value: Option<&String>) -> i32 {
    value.and_then(|v| v.trim().parse::<i32>().ok()).unwrap_or(0)
}

/// MPD's `'0'`/`'1'` convention.
fn parse_flag(value: Option<&String>) -> bool {
    value.is_some_and(|v| v.trim() == "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_is_lenient() {
        assert_eq!(parse_int(Some(&"42".to_string())), 42);
        assert_eq!(parse_int(Some(&" 7 ".to_string())), 7);
        assert_eq!(parse_int(Some(&"loud".to_string())), 0);
        assert_eq!(parse_int(None), 0);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some(&"1".to_string())));
        assert!(!parse_flag(Some(&"0".to_string())));
        assert!(!parse_flag(Some(&"yes".to_string())));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_entry_title_falls_back_to_file() {
        let mut entry = Record::new();
        entry.insert("file".to_string(), "Jazz/Take Five.mp3".to_string());
        assert_eq!(entry_title(&entry), "Take Five");
        entry.insert("title".to_string(), "Take 5".to_string());
        assert_eq!(entry_title(&entry), "Take 5");
    }
}
