use serde::Serialize;
use std::path::Path;

use super::traits::Record;

/// URI schemes the daemon streams from the network rather than the library.
pub const STREAM_SCHEMES: &[&str] = &["http://", "https://", "mms://", "mmsh://", "rtsp://", "rtmp://"];

/// Whether `uri` is a network stream (internet radio) rather than a library path.
pub fn is_stream_uri(uri: &str) -> bool {
    let uri = uri.trim_start().to_ascii_lowercase();
    STREAM_SCHEMES.iter().any(|scheme| uri.starts_with(scheme))
}

/// Formats seconds as `m:ss`.
pub fn make_time_string(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor();
    let left = ((seconds - minutes * 60.0).round() as u64).min(59);
    format!("{}:{:02}", minutes as u64, left)
}

/// Lenient float parse: anything missing or unparsable is 0.
pub(crate) fn parse_seconds(value: Option<&String>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    None,
    File,
    Radio,
}

/// What is loaded to play right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayingItem {
    pub kind: ItemKind,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub file_uri: String,
    pub elapsed_seconds: f64,
    pub total_seconds: f64,
    /// 0..=100, always 0 for radio.
    pub elapsed_percentage: u8,
}

impl PlayingItem {
    /// Rebuilds the item from the daemon's current-song record.
    ///
    /// Elapsed time and percentage are carried over untouched, even when
    /// the record is empty: they come from the status record and only
    /// [`set_elapsed`](Self::set_elapsed) changes them. Returns whether
    /// anything identifying the track changed.
    pub fn update(&mut self, raw: &Record) -> bool {
        let mut next = Self::from_record(raw);
        next.elapsed_seconds = self.elapsed_seconds;
        next.elapsed_percentage = self.elapsed_percentage;

        let changed = next.kind != self.kind
            || next.title != self.title
            || next.artist != self.artist
            || next.album != self.album
            || next.file_uri != self.file_uri
            || next.total_seconds != self.total_seconds;

        *self = next;
        changed
    }

    fn from_record(raw: &Record) -> Self {
        let Some(file) = raw.get("file").filter(|f| !f.trim().is_empty()) else {
            return Self::default();
        };
        let tag = |key: &str| raw.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        if is_stream_uri(file) {
            Self {
                kind: ItemKind::Radio,
                title: tag("title").unwrap_or(file.as_str()).to_string(),
                artist: String::new(),
                album: tag("name").unwrap_or("Unknown").to_string(),
                file_uri: file.clone(),
                ..Default::default()
            }
        } else {
            let total = raw.get("duration").or_else(|| raw.get("time"));
            Self {
                kind: ItemKind::File,
                title: tag("title")
                    .map(str::to_string)
                    .unwrap_or_else(|| title_from_path(file)),
                artist: tag("artist").unwrap_or("Unknown").to_string(),
                album: tag("album").unwrap_or("Unknown").to_string(),
                file_uri: file.clone(),
                total_seconds: parse_seconds(total),
                ..Default::default()
            }
        }
    }

    /// Stores the elapsed time; returns whether the stored value changed.
    pub fn set_elapsed(&mut self, seconds: f64) -> bool {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        let percentage = self.percentage_for(seconds);
        let changed = self.elapsed_seconds != seconds || self.elapsed_percentage != percentage;
        self.elapsed_seconds = seconds;
        self.elapsed_percentage = percentage;
        changed
    }

    fn percentage_for(&self, elapsed: f64) -> u8 {
        if self.kind != ItemKind::File || self.total_seconds <= 0.0 {
            return 0;
        }
        (100.0 * elapsed / self.total_seconds).round().clamp(0.0, 100.0) as u8
    }

    pub fn elapsed_string(&self) -> String {
        make_time_string(self.elapsed_seconds)
    }

    pub fn total_string(&self) -> String {
        make_time_string(self.total_seconds)
    }
}

/// "Music/Some Artist/03 - Track.flac" -> "03 - Track"
pub(crate) fn title_from_path(file: &str) -> String {
    let segment = file.rsplit('/').next().unwrap_or(file);
    Path::new(segment)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| segment.to_string())
}
