//! The object a front-end holds: one daemon connection shared by the
//! status reconciler and the library facade.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::library::Library;
use crate::player::{
    ChangeEvent, Daemon, DaemonError, DirEntry, PlaybackState, PlayerAction, PlayingItem, RadioSession,
    StatusReconciler, Tag,
};

pub struct Jukebox<D: Daemon> {
    daemon: D,
    status: StatusReconciler,
    library: Library,
}

impl<D: Daemon> Jukebox<D> {
    pub fn new(daemon: D, update_interval: Duration) -> Self {
        Self {
            daemon,
            status: StatusReconciler::new(update_interval),
            library: Library::new(),
        }
    }

    /// Recovers a radio session left over from a previous run, primes the
    /// library caches and takes the first status snapshot. Events from that
    /// snapshot are dropped: callers paint the initial screen from the model.
    pub fn start(&mut self) -> Result<(), DaemonError> {
        self.status.recover_radio_session(&mut self.daemon)?;
        if let Err(e) = self.library.prime(&mut self.daemon) {
            warn!("Could not load library lists: {}", e);
        }
        if let Err(e) = self.status.refresh_playlist(&mut self.daemon) {
            warn!("Could not load current playlist: {}", e);
        }
        self.status.poll(&mut self.daemon);
        self.status.events().clear();
        self.status.current_song_changed();
        info!(radio = self.status.radio().active, "Jukebox started");
        Ok(())
    }

    pub fn daemon(&self) -> &D {
        &self.daemon
    }

    pub fn daemon_mut(&mut self) -> &mut D {
        &mut self.daemon
    }

    pub fn item(&self) -> &PlayingItem {
        self.status.item()
    }

    pub fn state(&self) -> &PlaybackState {
        self.status.state()
    }

    pub fn radio(&self) -> &RadioSession {
        self.status.radio()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    // ═══════════════════════════════════════════════════════════════
    // Status
    // ═══════════════════════════════════════════════════════════════

    pub fn poll(&mut self) -> bool {
        self.status.poll(&mut self.daemon)
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        self.status.poll_at(&mut self.daemon, now)
    }

    /// Takes every queued change event, oldest first.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        self.status.events().drain().collect()
    }

    pub fn current_song_changed(&mut self) -> bool {
        self.status.current_song_changed()
    }

    // ═══════════════════════════════════════════════════════════════
    // Playback
    // ═══════════════════════════════════════════════════════════════

    pub fn player_control_set(&mut self, action: PlayerAction) -> Result<(), DaemonError> {
        self.status.player_control_set(&mut self.daemon, action)
    }

    pub fn play_playlist_item(&mut self, number: u32) -> Result<(), DaemonError> {
        self.status.play_playlist_item(&mut self.daemon, number)
    }

    pub fn volume_set(&mut self, percentage: u8) -> Result<(), DaemonError> {
        self.status.volume_set(&mut self.daemon, percentage)
    }

    pub fn volume_set_relative(&mut self, delta: i32) -> Result<(), DaemonError> {
        self.status.volume_set_relative(&mut self.daemon, delta)
    }

    pub fn volume_mute_switch(&mut self) -> Result<(), DaemonError> {
        self.status.volume_mute_switch(&mut self.daemon)
    }

    pub fn random_switch(&mut self) -> Result<(), DaemonError> {
        self.status.random_switch(&mut self.daemon)
    }

    pub fn repeat_switch(&mut self) -> Result<(), DaemonError> {
        self.status.repeat_switch(&mut self.daemon)
    }

    pub fn single_switch(&mut self) -> Result<(), DaemonError> {
        self.status.single_switch(&mut self.daemon)
    }

    pub fn consume_switch(&mut self) -> Result<(), DaemonError> {
        self.status.consume_switch(&mut self.daemon)
    }

    // ═══════════════════════════════════════════════════════════════
    // Radio 📻
    // ═══════════════════════════════════════════════════════════════

    pub fn start_radio_station(&mut self, stream_uri: &str) -> Result<(), DaemonError> {
        self.status.start_radio_station(&mut self.daemon, stream_uri)
    }

    pub fn leave_radio_mode(&mut self) -> Result<(), DaemonError> {
        self.status.leave_radio_mode(&mut self.daemon)
    }

    // ═══════════════════════════════════════════════════════════════
    // Live Playlist
    // ═══════════════════════════════════════════════════════════════

    pub fn playlist_current(&mut self) -> Result<Vec<String>, DaemonError> {
        Ok(self.status.refresh_playlist(&mut self.daemon)?.to_vec())
    }

    pub fn playlist_current_count(&self) -> usize {
        self.status.playlist_current_count()
    }

    pub fn playlist_current_clear(&mut self) -> Result<(), DaemonError> {
        self.status.playlist_current_clear(&mut self.daemon)
    }

    pub fn playlist_current_playing_index(&self) -> i32 {
        self.status.playlist_current_playing_index()
    }

    // ═══════════════════════════════════════════════════════════════
    // Library 📚
    // ═══════════════════════════════════════════════════════════════

    pub fn library_update(&mut self) -> Result<(), DaemonError> {
        self.daemon.update()?;
        self.library.invalidate();
        Ok(())
    }

    pub fn library_rescan(&mut self) -> Result<(), DaemonError> {
        self.daemon.rescan()?;
        self.library.invalidate();
        Ok(())
    }

    pub fn artists_get(&mut self, part: Option<&str>, only_start: bool) -> Result<Vec<String>, DaemonError> {
        self.library.artists_get(&mut self.daemon, part, only_start)
    }

    pub fn albums_get(&mut self, part: Option<&str>, only_start: bool) -> Result<Vec<String>, DaemonError> {
        self.library.albums_get(&mut self.daemon, part, only_start)
    }

    pub fn songs_get(&mut self, part: Option<&str>, only_start: bool) -> Result<Vec<String>, DaemonError> {
        self.library.songs_get(&mut self.daemon, part, only_start)
    }

    pub fn artist_albums_get(&mut self, artist: &str) -> Result<Vec<String>, DaemonError> {
        self.library.artist_albums_get(&mut self.daemon, artist)
    }

    pub fn artist_songs_get(&mut self, artist: &str) -> Result<Vec<String>, DaemonError> {
        self.library.artist_songs_get(&mut self.daemon, artist)
    }

    pub fn album_songs_get(&mut self, album: &str) -> Result<Vec<String>, DaemonError> {
        self.library.album_songs_get(&mut self.daemon, album)
    }

    pub fn playlists_get(&mut self, first_letter: Option<&str>) -> Result<Vec<String>, DaemonError> {
        self.library.playlists_get(&mut self.daemon, first_letter)
    }

    pub fn directory_list(&mut self, path: &str) -> Result<Vec<DirEntry>, DaemonError> {
        self.library.directory_list(&mut self.daemon, path)
    }

    /// Every playlist add first leaves radio mode, restoring the saved playlist.
    pub fn playlist_add(&mut self, tag: Tag, value: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.status.leave_radio_mode(&mut self.daemon)?;
        self.library.playlist_add(&mut self.daemon, tag, value, play, clear_first)
    }

    pub fn playlist_add_artist(&mut self, artist: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.playlist_add(Tag::Artist, artist, play, clear_first)
    }

    pub fn playlist_add_album(&mut self, album: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.playlist_add(Tag::Album, album, play, clear_first)
    }

    pub fn playlist_add_song(&mut self, title: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.playlist_add(Tag::Title, title, play, clear_first)
    }

    pub fn playlist_add_playlist(&mut self, name: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.status.leave_radio_mode(&mut self.daemon)?;
        self.library.playlist_add_playlist(&mut self.daemon, name, play, clear_first)
    }

    pub fn playlist_add_file(&mut self, uri: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.status.leave_radio_mode(&mut self.daemon)?;
        self.library.playlist_add_file(&mut self.daemon, uri, play, clear_first)
    }

    pub fn playlist_add_directory(&mut self, path: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.status.leave_radio_mode(&mut self.daemon)?;
        self.library.playlist_add_directory(&mut self.daemon, path, play, clear_first)
    }
}
