pub mod app;
pub mod artwork;
pub mod jukebox;
pub mod library;
pub mod player;

pub use jukebox::Jukebox;
pub use library::Library;
