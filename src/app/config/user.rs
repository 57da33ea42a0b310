use serde::{Deserialize, Serialize};

/// User-editable configuration, stored in `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub mpd: MpdSettings,
    /// Local root of the daemon's library, used for cover art lookups.
    #[serde(default = "default_music_dir")]
    pub music_directory: String,
    #[serde(default)]
    pub radio_stations: Vec<RadioStation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpdSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Minimum time between status polls.
    #[serde(default = "default_update_interval")]
    pub update_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioStation {
    pub name: String,
    pub url: String,
}

fn default_music_dir() -> String {
    let home = dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());
    format!("{}/Music", home)
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6600
}

fn default_update_interval() -> u64 {
    1000
}

impl Default for MpdSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            update_interval_ms: default_update_interval(),
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            mpd: MpdSettings::default(),
            music_directory: default_music_dir(),
            radio_stations: Vec::new(),
        }
    }
}

impl UserConfig {
    pub fn radio_station_get(&self, name: &str) -> Option<&RadioStation> {
        self.radio_stations.iter().find(|s| s.name == name)
    }

    /// Edits the station called `name`, or appends a new one.
    pub fn radio_station_set(&mut self, name: &str, url: &str) {
        match self.radio_stations.iter_mut().find(|s| s.name == name) {
            Some(station) => station.url = url.to_string(),
            None => self.radio_stations.push(RadioStation {
                name: name.to_string(),
                url: url.to_string(),
            }),
        }
    }

    /// Returns whether a station was removed.
    pub fn radio_station_remove(&mut self, name: &str) -> bool {
        let before = self.radio_stations.len();
        self.radio_stations.retain(|s| s.name != name);
        self.radio_stations.len() != before
    }
}
