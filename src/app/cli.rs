use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Jukebox - touch-friendly MPD front-end core 🎵
#[derive(Parser, Debug)]
#[command(name = "jukebox", version, about)]
pub struct Args {
    /// MPD host (overrides config.toml)
    #[arg(long)]
    pub host: Option<String>,

    /// MPD port (overrides config.toml)
    #[arg(long)]
    pub port: Option<u16>,

    /// Alternate config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Poll the daemon and print change events as they happen (default)
    Monitor,
    /// Print the current playback state
    Status {
        #[arg(long)]
        json: bool,
    },
    Play,
    Pause,
    Stop,
    Next,
    Prev,
    /// Set volume (0-100), or adjust it with a leading + or -
    Volume {
        #[arg(allow_hyphen_values = true)]
        level: String,
    },
    /// Toggle mute, restoring the previous volume on unmute
    Mute,
    /// Toggle a playback option
    Toggle {
        #[arg(value_enum)]
        option: PlaybackOption,
    },
    /// Play a configured station (by name) or a stream URL
    Radio { station: String },
    /// List configured radio stations
    Stations,
    /// Add or edit a radio station
    StationSet { name: String, url: String },
    /// Remove a radio station
    StationRemove { name: String },
    /// Browse artists, optionally filtered by first letter(s)
    Artists {
        #[arg(long)]
        prefix: Option<String>,
        /// Match anywhere in the name instead of at the start
        #[arg(long)]
        contains: bool,
    },
    /// Albums of an artist
    Albums { artist: String },
    /// Songs of an artist, optionally within one album
    Songs {
        artist: String,
        #[arg(long)]
        album: Option<String>,
    },
    /// Add songs to the playlist, scoped by the given artist/album
    Add {
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Start playing the first added song
        #[arg(long)]
        play: bool,
        /// Clear the playlist first
        #[arg(long)]
        clear: bool,
    },
    /// List a database directory
    Ls {
        #[arg(default_value = "")]
        path: String,
    },
    /// Add a directory recursively, or a single file
    AddPath {
        path: String,
        #[arg(long)]
        play: bool,
        #[arg(long)]
        clear: bool,
    },
    /// Show the current playlist
    Playlist,
    /// Stored playlists
    Playlists {
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Update the music database
    Update {
        /// Rescan unchanged files too
        #[arg(long)]
        rescan: bool,
    },
    /// Save the playing file's embedded cover art
    Cover {
        #[arg(default_value = "cover_art.jpg")]
        dest: PathBuf,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum PlaybackOption {
    Random,
    Repeat,
    Single,
    Consume,
}

/// A parsed `volume` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    Absolute(u8),
    Relative(i32),
}

impl VolumeChange {
    pub fn parse(level: &str) -> Option<Self> {
        let level = level.trim();
        if level.starts_with('+') || level.starts_with('-') {
            level.parse::<i32>().ok().map(VolumeChange::Relative)
        } else {
            level.parse::<u8>().ok().filter(|v| *v <= 100).map(VolumeChange::Absolute)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_change_parse() {
        assert_eq!(VolumeChange::parse("40"), Some(VolumeChange::Absolute(40)));
        assert_eq!(VolumeChange::parse("+5"), Some(VolumeChange::Relative(5)));
        assert_eq!(VolumeChange::parse("-10"), Some(VolumeChange::Relative(-10)));
        assert_eq!(VolumeChange::parse("101"), None);
        assert_eq!(VolumeChange::parse("loud"), None);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["jukebox", "--port", "6601", "radio", "Jazz"]);
        assert_eq!(args.port, Some(6601));
        assert!(matches!(args.command, Some(Command::Radio { ref station }) if station == "Jazz"));
    }
}
