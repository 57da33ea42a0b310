//! Library browsing and playlist building 📚
//!
//! A thin layer over the daemon's `list`/`findadd`/`lsinfo` primitives.
//! Browsing into an artist or album sets a filter context that scopes both
//! later searches and later playlist adds, so "add all" on a filtered view
//! adds exactly that view.

use std::cmp::Ordering;

use tracing::debug;

use crate::player::{Daemon, DaemonError, DirEntry, Tag};

#[derive(Debug, Default)]
pub struct Library {
    artists: Option<Vec<String>>,
    albums: Option<Vec<String>>,
    songs: Option<Vec<String>>,
    query_results: Vec<String>,
    searching_artist: Option<String>,
    searching_album: Option<String>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    fn cache_mut(&mut self, tag: Tag) -> &mut Option<Vec<String>> {
        match tag {
            Tag::Artist => &mut self.artists,
            Tag::Album => &mut self.albums,
            Tag::Title => &mut self.songs,
        }
    }

    /// Drops the cached artist/album/song lists.
    pub fn invalidate(&mut self) {
        self.artists = None;
        self.albums = None;
        self.songs = None;
    }

    /// Fills the artist, album and song caches.
    pub fn prime(&mut self, daemon: &mut dyn Daemon) -> Result<(), DaemonError> {
        for tag in [Tag::Artist, Tag::Album, Tag::Title] {
            self.search(daemon, tag)?;
        }
        Ok(())
    }

    pub fn query_results(&self) -> &[String] {
        &self.query_results
    }

    pub fn searching_artist(&self) -> Option<&str> {
        self.searching_artist.as_deref()
    }

    pub fn searching_album(&self) -> Option<&str> {
        self.searching_album.as_deref()
    }

    pub fn clear_filters(&mut self) {
        self.searching_artist = None;
        self.searching_album = None;
    }

    // ═══════════════════════════════════════════════════════════════
    // Searching
    // ═══════════════════════════════════════════════════════════════

    /// All distinct values of `tag`, fetched once and cached until invalidated.
    pub fn search(&mut self, daemon: &mut dyn Daemon, tag: Tag) -> Result<Vec<String>, DaemonError> {
        if self.cache_mut(tag).is_none() {
            let values = daemon.list(tag, &[])?;
            debug!(tag = %tag, count = values.len(), "Library list cached");
            *self.cache_mut(tag) = Some(values);
        }
        let values = self.cache_mut(tag).clone().unwrap_or_default();
        self.query_results = values.clone();
        Ok(values)
    }

    /// Values of `tag` starting with `letter` (case-insensitive), taken
    /// from the cached full list.
    pub fn search_first_letter(
        &mut self,
        daemon: &mut dyn Daemon,
        tag: Tag,
        letter: &str,
    ) -> Result<Vec<String>, DaemonError> {
        let prefix = letter.to_lowercase();
        let results: Vec<String> = self
            .search(daemon, tag)?
            .into_iter()
            .filter(|value| value.to_lowercase().starts_with(&prefix))
            .collect();
        self.query_results = results.clone();
        Ok(results)
    }

    /// Values of `tag` containing `part` (case-insensitive), freshly queried.
    pub fn search_partial(
        &mut self,
        daemon: &mut dyn Daemon,
        tag: Tag,
        part: &str,
    ) -> Result<Vec<String>, DaemonError> {
        let needle = part.to_lowercase();
        let results: Vec<String> = daemon
            .list(tag, &[])?
            .into_iter()
            .filter(|value| value.to_lowercase().contains(&needle))
            .collect();
        self.query_results = results.clone();
        Ok(results)
    }

    /// Active filter context plus one extra filter; the extra one wins for its tag.
    fn filters<'a>(&'a self, tag: Tag, value: &'a str) -> Vec<(Tag, &'a str)> {
        let context = [
            (Tag::Artist, self.searching_artist.as_deref()),
            (Tag::Album, self.searching_album.as_deref()),
        ];
        context
            .into_iter()
            .filter_map(|(t, v)| v.filter(|_| t != tag).map(|v| (t, v)))
            .chain(std::iter::once((tag, value)))
            .collect()
    }

    /// Values of `result` among songs whose `filter` tag is `value`, further
    /// scoped by the active artist/album context.
    pub fn search_of_type(
        &mut self,
        daemon: &mut dyn Daemon,
        result: Tag,
        filter: Tag,
        value: &str,
    ) -> Result<Vec<String>, DaemonError> {
        let filters = self.filters(filter, value);
        let results = daemon.list(result, &filters)?;
        self.query_results = results.clone();
        Ok(results)
    }

    fn browse(
        &mut self,
        daemon: &mut dyn Daemon,
        tag: Tag,
        part: Option<&str>,
        only_start: bool,
    ) -> Result<Vec<String>, DaemonError> {
        self.clear_filters();
        match part {
            None => self.search(daemon, tag),
            Some(part) if only_start => self.search_first_letter(daemon, tag, part),
            Some(part) => self.search_partial(daemon, tag, part),
        }
    }

    /// All artists, or those matching `part` by first letter(s) or substring.
    /// Starts a fresh unfiltered browse.
    pub fn artists_get(
        &mut self,
        daemon: &mut dyn Daemon,
        part: Option<&str>,
        only_start: bool,
    ) -> Result<Vec<String>, DaemonError> {
        self.browse(daemon, Tag::Artist, part, only_start)
    }

    pub fn albums_get(
        &mut self,
        daemon: &mut dyn Daemon,
        part: Option<&str>,
        only_start: bool,
    ) -> Result<Vec<String>, DaemonError> {
        self.browse(daemon, Tag::Album, part, only_start)
    }

    pub fn songs_get(
        &mut self,
        daemon: &mut dyn Daemon,
        part: Option<&str>,
        only_start: bool,
    ) -> Result<Vec<String>, DaemonError> {
        self.browse(daemon, Tag::Title, part, only_start)
    }

    pub fn artist_albums_get(&mut self, daemon: &mut dyn Daemon, artist: &str) -> Result<Vec<String>, DaemonError> {
        self.searching_artist = Some(artist.to_string());
        self.search_of_type(daemon, Tag::Album, Tag::Artist, artist)
    }

    pub fn artist_songs_get(&mut self, daemon: &mut dyn Daemon, artist: &str) -> Result<Vec<String>, DaemonError> {
        self.searching_artist = Some(artist.to_string());
        self.search_of_type(daemon, Tag::Title, Tag::Artist, artist)
    }

    pub fn album_songs_get(&mut self, daemon: &mut dyn Daemon, album: &str) -> Result<Vec<String>, DaemonError> {
        self.searching_album = Some(album.to_string());
        self.search_of_type(daemon, Tag::Title, Tag::Album, album)
    }

    /// Stored playlists, optionally only those starting with `first_letter`.
    pub fn playlists_get(
        &mut self,
        daemon: &mut dyn Daemon,
        first_letter: Option<&str>,
    ) -> Result<Vec<String>, DaemonError> {
        let prefix = first_letter.map(str::to_lowercase);
        Ok(daemon
            .playlists()?
            .into_iter()
            .filter(|name| {
                prefix
                    .as_deref()
                    .map_or(true, |p| name.to_lowercase().starts_with(p))
            })
            .collect())
    }

    // ═══════════════════════════════════════════════════════════════
    // Playlist Building ➕
    // ═══════════════════════════════════════════════════════════════

    /// Runs `add` against the live playlist, optionally clearing it first and
    /// starting playback at the first added entry.
    fn add_with<F>(daemon: &mut dyn Daemon, play: bool, clear_first: bool, add: F) -> Result<(), DaemonError>
    where
        F: FnOnce(&mut dyn Daemon) -> Result<(), DaemonError>,
    {
        if clear_first {
            daemon.clear()?;
        }
        let first_new = daemon.playlist_info()?.len() as u32;
        add(&mut *daemon)?;
        if play {
            daemon.play_pos(first_new)?;
        }
        Ok(())
    }

    /// Adds every song whose `tag` is `value`, scoped by the filter context.
    /// The context is kept afterwards so further adds stay in the same view.
    pub fn playlist_add(
        &mut self,
        daemon: &mut dyn Daemon,
        tag: Tag,
        value: &str,
        play: bool,
        clear_first: bool,
    ) -> Result<(), DaemonError> {
        let filters = self.filters(tag, value);
        debug!(?filters, "Adding to playlist");
        Self::add_with(daemon, play, clear_first, |d| d.find_add(&filters))
    }

    pub fn playlist_add_artist(&mut self, daemon: &mut dyn Daemon, artist: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.playlist_add(daemon, Tag::Artist, artist, play, clear_first)
    }

    pub fn playlist_add_album(&mut self, daemon: &mut dyn Daemon, album: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.playlist_add(daemon, Tag::Album, album, play, clear_first)
    }

    pub fn playlist_add_song(&mut self, daemon: &mut dyn Daemon, title: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        self.playlist_add(daemon, Tag::Title, title, play, clear_first)
    }

    /// Appends a stored playlist to the live one.
    pub fn playlist_add_playlist(&mut self, daemon: &mut dyn Daemon, name: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        Self::add_with(daemon, play, clear_first, |d| d.load(name))
    }

    pub fn playlist_add_file(&mut self, daemon: &mut dyn Daemon, uri: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        Self::add_with(daemon, play, clear_first, |d| d.add(uri).map(|_| ()))
    }

    /// Appends every file below `path`, depth first in browser order.
    pub fn playlist_add_directory(&mut self, daemon: &mut dyn Daemon, path: &str, play: bool, clear_first: bool) -> Result<(), DaemonError> {
        let files = self.directory_files(daemon, path)?;
        Self::add_with(daemon, play, clear_first, |d| {
            for file in &files {
                d.add(file)?;
            }
            Ok(())
        })
    }

    // ═══════════════════════════════════════════════════════════════
    // Directories 📁
    // ═══════════════════════════════════════════════════════════════

    /// Immediate children of `path`: directories first, then files,
    /// each sorted case-insensitively.
    pub fn directory_list(&mut self, daemon: &mut dyn Daemon, path: &str) -> Result<Vec<DirEntry>, DaemonError> {
        let mut entries = daemon.ls_info(path)?;
        entries.sort_by(|a, b| match (a, b) {
            (DirEntry::Directory(_), DirEntry::File(_)) => Ordering::Less,
            (DirEntry::File(_), DirEntry::Directory(_)) => Ordering::Greater,
            _ => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        });
        Ok(entries)
    }

    /// All playable files below `path`, recursively.
    pub fn directory_files(&mut self, daemon: &mut dyn Daemon, path: &str) -> Result<Vec<String>, DaemonError> {
        let mut files = Vec::new();
        for entry in self.directory_list(daemon, path)? {
            match entry {
                DirEntry::Directory(dir) => files.extend(self.directory_files(daemon, &dir)?),
                DirEntry::File(file) => files.push(file),
            }
        }
        Ok(files)
    }
}
