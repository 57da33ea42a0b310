use std::borrow::Cow;
use std::time::Duration;

use mpd::search::{Query, Term};
use mpd::{Client, Song, State};
use tracing::{debug, info};

use super::error::DaemonError;
use super::traits::{Daemon, DirEntry, Record, Tag};

/// [`Daemon`] backed by a TCP connection to MPD.
///
/// The connection is opened eagerly by [`MpdDaemon::connect`]; after an I/O
/// failure it is dropped and reopened lazily on the next call.
pub struct MpdDaemon {
    addr: String,
    client: Option<Client>,
}

impl MpdDaemon {
    pub fn connect(host: &str, port: u16) -> Result<Self, DaemonError> {
        let mut daemon = Self {
            addr: format!("{}:{}", host, port),
            client: None,
        };
        daemon.ensure_connected()?;
        Ok(daemon)
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn ensure_connected(&mut self) -> Result<&mut Client, DaemonError> {
        if self.client.is_none() {
            let client = Client::connect(self.addr.as_str()).map_err(|e| DaemonError::Connect {
                addr: self.addr.clone(),
                message: e.to_string(),
            })?;
            info!(addr = %self.addr, "Connected to MPD");
            self.client = Some(client);
        }
        self.client.as_mut().ok_or(DaemonError::Disconnected)
    }

    /// Runs `f` against the connection, translating MPD errors.
    fn with_client<F, T>(&mut self, command: &str, f: F) -> Result<T, DaemonError>
    where
        F: FnOnce(&mut Client) -> mpd::error::Result<T>,
    {
        let client = self.ensure_connected()?;
        match f(client) {
            Ok(value) => Ok(value),
            Err(mpd::error::Error::Io(e)) => {
                debug!(command, "MPD connection dropped: {}", e);
                self.client = None;
                Err(DaemonError::Disconnected)
            }
            Err(e) => Err(DaemonError::command(command, e.to_string())),
        }
    }
}

fn flag(value: bool) -> String {
    (if value { "1" } else { "0" }).to_string()
}

fn seconds(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

// Helper to find tag (case-insensitive)
fn find_tag(tags: &[(String, String)], key: &str) -> Option<String> {
    tags.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.clone())
}

fn song_record(song: &Song) -> Record {
    let mut record = Record::new();
    record.insert("file".to_string(), song.file.clone());
    let title = song.title.clone().or_else(|| find_tag(&song.tags, "Title"));
    let artist = song.artist.clone().or_else(|| find_tag(&song.tags, "Artist"));
    let name = song.name.clone().or_else(|| find_tag(&song.tags, "Name"));
    let fields = [
        ("title", title),
        ("artist", artist),
        ("album", find_tag(&song.tags, "Album")),
        ("name", name),
        ("time", song.duration.map(seconds)),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            record.insert(key.to_string(), value);
        }
    }
    record
}

fn status_record(status: &mpd::Status) -> Record {
    let mut record = Record::new();
    record.insert("volume".to_string(), status.volume.to_string());
    record.insert("repeat".to_string(), flag(status.repeat));
    record.insert("random".to_string(), flag(status.random));
    record.insert("single".to_string(), flag(status.single));
    record.insert("consume".to_string(), flag(status.consume));
    let state = match status.state {
        State::Play => "play",
        State::Pause => "pause",
        State::Stop => "stop",
    };
    record.insert("state".to_string(), state.to_string());
    if let Some(place) = &status.song {
        record.insert("song".to_string(), place.pos.to_string());
    }
    if let Some(elapsed) = status.elapsed {
        record.insert("elapsed".to_string(), seconds(elapsed));
    }
    record
}

fn query<'a>(filters: &'a [(Tag, &'a str)]) -> Query<'a> {
    let mut query = Query::new();
    for (tag, value) in filters {
        query.and(Term::Tag(Cow::Borrowed(tag.as_str())), *value);
    }
    query
}

impl Daemon for MpdDaemon {
    fn status(&mut self) -> Result<Record, DaemonError> {
        self.with_client("status", |client| client.status().map(|s| status_record(&s)))
    }

    fn current_song(&mut self) -> Result<Record, DaemonError> {
        self.with_client("currentsong", |client| {
            Ok(client.currentsong()?.map(|s| song_record(&s)).unwrap_or_default())
        })
    }

    fn playlist_info(&mut self) -> Result<Vec<Record>, DaemonError> {
        self.with_client("playlistinfo", |client| {
            Ok(client.queue()?.iter().map(song_record).collect())
        })
    }

    fn play(&mut self) -> Result<(), DaemonError> {
        self.with_client("play", |client| client.play())
    }

    fn play_pos(&mut self, pos: u32) -> Result<(), DaemonError> {
        self.with_client("play", |client| client.switch(pos))
    }

    fn pause(&mut self, paused: bool) -> Result<(), DaemonError> {
        self.with_client("pause", |client| client.pause(paused))
    }

    fn stop(&mut self) -> Result<(), DaemonError> {
        self.with_client("stop", |client| client.stop())
    }

    fn next(&mut self) -> Result<(), DaemonError> {
        self.with_client("next", |client| client.next())
    }

    fn previous(&mut self) -> Result<(), DaemonError> {
        self.with_client("previous", |client| client.prev())
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), DaemonError> {
        self.with_client("setvol", |client| client.volume(volume.min(100) as i8))
    }

    fn set_random(&mut self, enable: bool) -> Result<(), DaemonError> {
        self.with_client("random", |client| client.random(enable))
    }

    fn set_repeat(&mut self, enable: bool) -> Result<(), DaemonError> {
        self.with_client("repeat", |client| client.repeat(enable))
    }

    fn set_single(&mut self, enable: bool) -> Result<(), DaemonError> {
        self.with_client("single", |client| client.single(enable))
    }

    fn set_consume(&mut self, enable: bool) -> Result<(), DaemonError> {
        self.with_client("consume", |client| client.consume(enable))
    }

    fn clear(&mut self) -> Result<(), DaemonError> {
        self.with_client("clear", |client| client.clear())
    }

    fn add(&mut self, uri: &str) -> Result<u32, DaemonError> {
        self.with_client("addid", |client| {
            let song = Song {
                file: uri.to_string(),
                ..Default::default()
            };
            client.push(&song).map(|id| id.0)
        })
    }

    fn find_add(&mut self, filters: &[(Tag, &str)]) -> Result<(), DaemonError> {
        self.with_client("findadd", |client| client.findadd(&query(filters)))
    }

    fn save(&mut self, name: &str) -> Result<(), DaemonError> {
        self.with_client("save", |client| client.save(name))
    }

    fn load(&mut self, name: &str) -> Result<(), DaemonError> {
        self.with_client("load", |client| client.load(name, ..))
    }

    fn remove_playlist(&mut self, name: &str) -> Result<(), DaemonError> {
        self.with_client("rm", |client| client.pl_remove(name))
    }

    fn playlists(&mut self) -> Result<Vec<String>, DaemonError> {
        self.with_client("listplaylists", |client| {
            Ok(client.playlists()?.into_iter().map(|p| p.name).collect())
        })
    }

    fn update(&mut self) -> Result<(), DaemonError> {
        self.with_client("update", |client| client.update().map(|_| ()))
    }

    fn rescan(&mut self) -> Result<(), DaemonError> {
        self.with_client("rescan", |client| client.rescan().map(|_| ()))
    }

    fn list(&mut self, tag: Tag, filters: &[(Tag, &str)]) -> Result<Vec<String>, DaemonError> {
        self.with_client("list", |client| {
            client.list(&Term::Tag(Cow::Borrowed(tag.as_str())), &query(filters))
        })
    }

    fn ls_info(&mut self, path: &str) -> Result<Vec<DirEntry>, DaemonError> {
        self.with_client("lsinfo", |client| {
            let join = |name: &str| {
                if path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}/{}", path, name)
                }
            };

            // 1. Folders
            let mut entries: Vec<DirEntry> = client
                .listfiles(path)?
                .into_iter()
                .filter(|(kind, name)| kind == "directory" && !name.starts_with('.'))
                .map(|(_, name)| DirEntry::Directory(join(&name)))
                .collect();

            // 2. Songs
            let dir = Song {
                file: path.to_string(),
                ..Default::default()
            };
            entries.extend(client.lsinfo(&dir)?.into_iter().map(|song| DirEntry::File(song.file)));
            Ok(entries)
        })
    }
}
