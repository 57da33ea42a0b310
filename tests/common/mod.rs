#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use jukebox::player::{Daemon, DaemonError, DirEntry, Record, Tag};

pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn song(file: &str, artist: &str, album: &str, title: &str, time: &str) -> Record {
    record(&[("file", file), ("artist", artist), ("album", album), ("title", title), ("time", time)])
}

/// In-memory daemon: a tiny library, a live playlist and stored playlists.
/// Every mutation is logged in `commands`.
pub struct FakeDaemon {
    pub status: Record,
    pub current: Record,
    pub queue: Vec<String>,
    pub saved: BTreeMap<String, Vec<String>>,
    pub library: Vec<Record>,
    pub commands: Vec<String>,
    pub volume_commands: Vec<u8>,
    pub find_adds: Vec<Vec<(Tag, String)>>,
    pub status_calls: usize,
    pub list_calls: usize,
    pub offline: bool,
}

impl FakeDaemon {
    pub fn new() -> Self {
        Self {
            status: record(&[
                ("volume", "40"),
                ("repeat", "0"),
                ("random", "0"),
                ("single", "0"),
                ("consume", "0"),
                ("state", "stop"),
            ]),
            current: Record::new(),
            queue: Vec::new(),
            saved: BTreeMap::new(),
            library: vec![
                song("Jazz/Miles Davis/Kind of Blue/01 So What.flac", "Miles Davis", "Kind of Blue", "So What", "562"),
                song("Jazz/Miles Davis/Kind of Blue/02 Freddie Freeloader.flac", "Miles Davis", "Kind of Blue", "Freddie Freeloader", "586"),
                song("Jazz/Miles Davis/Bitches Brew/01 Pharaoh's Dance.flac", "Miles Davis", "Bitches Brew", "Pharaoh's Dance", "1219"),
                song("Soul/Nina Simone/Pastel Blues/01 Be My Husband.mp3", "Nina Simone", "Pastel Blues", "Be My Husband", "174"),
                song("Soul/Nina Simone/Pastel Blues/02 Nobody's Fault but Mine.mp3", "Nina Simone", "Pastel Blues", "Nobody's Fault but Mine", "218"),
                song("Soul/loose take.ogg", "Nina Simone", "Sessions", "So What", "120"),
            ],
            commands: Vec::new(),
            volume_commands: Vec::new(),
            find_adds: Vec::new(),
            status_calls: 0,
            list_calls: 0,
            offline: false,
        }
    }

    pub fn set_status(&mut self, pairs: &[(&str, &str)]) {
        for (k, v) in pairs {
            self.status.insert(k.to_string(), v.to_string());
        }
    }

    pub fn unset_status(&mut self, key: &str) {
        self.status.remove(key);
    }

    /// Makes `file` the current song, with library tags when it is a library file.
    pub fn set_current(&mut self, file: &str) {
        self.current = self.lookup(file);
    }

    /// Fills the live playlist with the first `n` library files.
    pub fn queue_library(&mut self, n: usize) {
        self.queue = self.library.iter().take(n).map(|s| s["file"].clone()).collect();
    }

    pub fn library_files(&self) -> Vec<String> {
        self.library.iter().map(|s| s["file"].clone()).collect()
    }

    fn lookup(&self, file: &str) -> Record {
        self.library
            .iter()
            .find(|s| s["file"] == file)
            .cloned()
            .unwrap_or_else(|| record(&[("file", file)]))
    }

    fn online(&self) -> Result<(), DaemonError> {
        if self.offline {
            Err(DaemonError::Disconnected)
        } else {
            Ok(())
        }
    }

    fn log(&mut self, command: String) -> Result<(), DaemonError> {
        self.online()?;
        self.commands.push(command);
        Ok(())
    }

    fn matches(song: &Record, filters: &[(Tag, &str)]) -> bool {
        filters
            .iter()
            .all(|(tag, value)| song.get(tag.as_str()).map(String::as_str) == Some(*value))
    }
}

impl Daemon for FakeDaemon {
    fn status(&mut self) -> Result<Record, DaemonError> {
        self.online()?;
        self.status_calls += 1;
        Ok(self.status.clone())
    }

    fn current_song(&mut self) -> Result<Record, DaemonError> {
        self.online()?;
        Ok(self.current.clone())
    }

    fn playlist_info(&mut self) -> Result<Vec<Record>, DaemonError> {
        self.online()?;
        Ok(self.queue.iter().map(|file| self.lookup(file)).collect())
    }

    fn play(&mut self) -> Result<(), DaemonError> {
        self.log("play".to_string())?;
        self.set_status(&[("state", "play")]);
        Ok(())
    }

    fn play_pos(&mut self, pos: u32) -> Result<(), DaemonError> {
        self.log(format!("play {}", pos))?;
        let Some(file) = self.queue.get(pos as usize).cloned() else {
            return Err(DaemonError::command("play", "Bad song index"));
        };
        self.set_current(&file);
        let pos = pos.to_string();
        self.set_status(&[("state", "play"), ("song", pos.as_str()), ("elapsed", "0.000")]);
        Ok(())
    }

    fn pause(&mut self, paused: bool) -> Result<(), DaemonError> {
        self.log(format!("pause {}", paused as u8))?;
        self.set_status(&[("state", if paused { "pause" } else { "play" })]);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DaemonError> {
        self.log("stop".to_string())?;
        self.set_status(&[("state", "stop")]);
        Ok(())
    }

    fn next(&mut self) -> Result<(), DaemonError> {
        self.log("next".to_string())
    }

    fn previous(&mut self) -> Result<(), DaemonError> {
        self.log("previous".to_string())
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), DaemonError> {
        self.log(format!("setvol {}", volume))?;
        self.volume_commands.push(volume);
        let volume = volume.to_string();
        self.set_status(&[("volume", volume.as_str())]);
        Ok(())
    }

    fn set_random(&mut self, enable: bool) -> Result<(), DaemonError> {
        self.log(format!("random {}", enable as u8))?;
        self.set_status(&[("random", if enable { "1" } else { "0" })]);
        Ok(())
    }

    fn set_repeat(&mut self, enable: bool) -> Result<(), DaemonError> {
        self.log(format!("repeat {}", enable as u8))?;
        self.set_status(&[("repeat", if enable { "1" } else { "0" })]);
        Ok(())
    }

    fn set_single(&mut self, enable: bool) -> Result<(), DaemonError> {
        self.log(format!("single {}", enable as u8))?;
        self.set_status(&[("single", if enable { "1" } else { "0" })]);
        Ok(())
    }

    fn set_consume(&mut self, enable: bool) -> Result<(), DaemonError> {
        self.log(format!("consume {}", enable as u8))?;
        self.set_status(&[("consume", if enable { "1" } else { "0" })]);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DaemonError> {
        self.log("clear".to_string())?;
        self.queue.clear();
        Ok(())
    }

    fn add(&mut self, uri: &str) -> Result<u32, DaemonError> {
        self.log(format!("addid {}", uri))?;
        self.queue.push(uri.to_string());
        Ok(self.queue.len() as u32)
    }

    fn find_add(&mut self, filters: &[(Tag, &str)]) -> Result<(), DaemonError> {
        self.log("findadd".to_string())?;
        self.find_adds
            .push(filters.iter().map(|(t, v)| (*t, v.to_string())).collect());
        let files: Vec<String> = self
            .library
            .iter()
            .filter(|s| Self::matches(s, filters))
            .map(|s| s["file"].clone())
            .collect();
        self.queue.extend(files);
        Ok(())
    }

    fn save(&mut self, name: &str) -> Result<(), DaemonError> {
        self.log(format!("save {}", name))?;
        if self.saved.contains_key(name) {
            return Err(DaemonError::command("save", "Playlist already exists"));
        }
        self.saved.insert(name.to_string(), self.queue.clone());
        Ok(())
    }

    fn load(&mut self, name: &str) -> Result<(), DaemonError> {
        self.log(format!("load {}", name))?;
        match self.saved.get(name) {
            Some(files) => {
                let files = files.clone();
                self.queue.extend(files);
                Ok(())
            }
            None => Err(DaemonError::command("load", "No such playlist")),
        }
    }

    fn remove_playlist(&mut self, name: &str) -> Result<(), DaemonError> {
        self.log(format!("rm {}", name))?;
        match self.saved.remove(name) {
            Some(_) => Ok(()),
            None => Err(DaemonError::command("rm", "No such playlist")),
        }
    }

    fn playlists(&mut self) -> Result<Vec<String>, DaemonError> {
        self.online()?;
        Ok(self.saved.keys().cloned().collect())
    }

    fn update(&mut self) -> Result<(), DaemonError> {
        self.log("update".to_string())
    }

    fn rescan(&mut self) -> Result<(), DaemonError> {
        self.log("rescan".to_string())
    }

    fn list(&mut self, tag: Tag, filters: &[(Tag, &str)]) -> Result<Vec<String>, DaemonError> {
        self.online()?;
        self.list_calls += 1;
        let values: BTreeSet<String> = self
            .library
            .iter()
            .filter(|s| Self::matches(s, filters))
            .filter_map(|s| s.get(tag.as_str()).cloned())
            .collect();
        Ok(values.into_iter().collect())
    }

    fn ls_info(&mut self, path: &str) -> Result<Vec<DirEntry>, DaemonError> {
        self.online()?;
        let prefix = if path.is_empty() { String::new() } else { format!("{}/", path) };
        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();
        for file in self.library_files() {
            if let Some(rest) = file.strip_prefix(&prefix) {
                match rest.split_once('/') {
                    Some((dir, _)) => {
                        dirs.insert(format!("{}{}", prefix, dir));
                    }
                    None => entries.push(DirEntry::File(file.clone())),
                }
            }
        }
        // Files before directories, so callers have to sort
        entries.extend(dirs.into_iter().map(DirEntry::Directory));
        Ok(entries)
    }
}
