use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl Transport {
    /// Maps the daemon's `state` field; anything unknown counts as stopped.
    pub fn from_mpd(state: &str) -> Self {
        match state.trim() {
            "play" => Transport::Playing,
            "pause" => Transport::Paused,
            _ => Transport::Stopped,
        }
    }
}

/// Transport and session state, mutated field by field by the status poller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub transport: Transport,
    /// Last known non-muted volume while `muted` is set.
    pub volume: u8,
    pub muted: bool,
    pub repeat: bool,
    pub random: bool,
    pub single: bool,
    pub consume: bool,
    /// Zero-based index into the live playlist, -1 when stopped or in radio mode.
    pub playlist_position: i32,
    pub radio_mode: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            transport: Transport::Stopped,
            volume: 0,
            muted: false,
            repeat: false,
            random: false,
            single: false,
            consume: false,
            playlist_position: -1,
            radio_mode: false,
        }
    }
}
