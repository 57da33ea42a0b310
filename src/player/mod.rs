pub mod error;
pub mod events;
pub mod item;
pub mod reconciler;
pub mod state;
pub mod traits;

#[cfg(feature = "mpd")]
pub mod mpd;

pub use error::DaemonError;
pub use events::{ChangeEvent, EventQueue};
pub use item::{is_stream_uri, make_time_string, ItemKind, PlayingItem};
#[cfg(feature = "mpd")]
pub use self::mpd::MpdDaemon;
pub use reconciler::{PlayerAction, RadioSession, StatusReconciler, RADIO_SNAPSHOT};
pub use state::{PlaybackState, Transport};
pub use traits::{Daemon, DirEntry, Record, Tag};
