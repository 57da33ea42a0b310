use std::collections::HashMap;
use std::fmt;

use super::error::DaemonError;

/// A raw daemon response: tag name (lowercase) to value.
/// Missing keys are normal; consumers parse tolerantly.
pub type Record = HashMap<String, String>;

/// Searchable tag types of the music database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Artist,
    Album,
    Title,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Artist => "artist",
            Tag::Album => "album",
            Tag::Title => "title",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a directory listing in the music database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirEntry {
    Directory(String),
    File(String),
}

impl DirEntry {
    /// Path relative to the music directory root.
    pub fn path(&self) -> &str {
        match self {
            DirEntry::Directory(p) | DirEntry::File(p) => p,
        }
    }

    /// Trailing path segment, as shown in a browser.
    pub fn name(&self) -> &str {
        let path = self.path();
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// Request/reply connection to the music player daemon 🎵
///
/// Every call is synchronous. Query methods return raw records so that the
/// status layer owns all parsing and defaulting.
pub trait Daemon {
    // Queries
    fn status(&mut self) -> Result<Record, DaemonError>;
    fn current_song(&mut self) -> Result<Record, DaemonError>;
    /// The live playlist, one record per entry, in play order.
    fn playlist_info(&mut self) -> Result<Vec<Record>, DaemonError>;

    // Playback
    fn play(&mut self) -> Result<(), DaemonError>;
    /// Start playing the live playlist entry at zero-based `pos`.
    fn play_pos(&mut self, pos: u32) -> Result<(), DaemonError>;
    fn pause(&mut self, paused: bool) -> Result<(), DaemonError>;
    fn stop(&mut self) -> Result<(), DaemonError>;
    fn next(&mut self) -> Result<(), DaemonError>;
    fn previous(&mut self) -> Result<(), DaemonError>;

    // Mixer and options
    fn set_volume(&mut self, volume: u8) -> Result<(), DaemonError>;
    fn set_random(&mut self, enable: bool) -> Result<(), DaemonError>;
    fn set_repeat(&mut self, enable: bool) -> Result<(), DaemonError>;
    fn set_single(&mut self, enable: bool) -> Result<(), DaemonError>;
    fn set_consume(&mut self, enable: bool) -> Result<(), DaemonError>;

    // Live playlist
    fn clear(&mut self) -> Result<(), DaemonError>;
    /// Append a URI (library path or stream URL); returns the new entry id.
    fn add(&mut self, uri: &str) -> Result<u32, DaemonError>;
    /// Append every library song matching all `filters`.
    fn find_add(&mut self, filters: &[(Tag, &str)]) -> Result<(), DaemonError>;

    // Stored playlists
    fn save(&mut self, name: &str) -> Result<(), DaemonError>;
    fn load(&mut self, name: &str) -> Result<(), DaemonError>;
    fn remove_playlist(&mut self, name: &str) -> Result<(), DaemonError>;
    fn playlists(&mut self) -> Result<Vec<String>, DaemonError>;

    // Database
    fn update(&mut self) -> Result<(), DaemonError>;
    fn rescan(&mut self) -> Result<(), DaemonError>;
    /// Distinct values of `tag` among songs matching all `filters`.
    fn list(&mut self, tag: Tag, filters: &[(Tag, &str)]) -> Result<Vec<String>, DaemonError>;
    /// Immediate children of a database directory ("" is the root).
    fn ls_info(&mut self, path: &str) -> Result<Vec<DirEntry>, DaemonError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_entry_name() {
        let entry = DirEntry::File("Rock/Classic/01 Song.flac".to_string());
        assert_eq!(entry.name(), "01 Song.flac");
        let root = DirEntry::Directory("Jazz".to_string());
        assert_eq!(root.name(), "Jazz");
        assert_eq!(root.path(), "Jazz");
    }
}
