use std::collections::VecDeque;
use std::fmt;

/// Which cached field changed. Consumers re-read the model for the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Volume,
    Repeat,
    Random,
    Single,
    Consume,
    Transport,
    PlaylistPosition,
    Elapsed,
    PlayingItem,
}

impl ChangeEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeEvent::Volume => "volume",
            ChangeEvent::Repeat => "repeat",
            ChangeEvent::Random => "random",
            ChangeEvent::Single => "single",
            ChangeEvent::Consume => "consume",
            ChangeEvent::Transport => "transport",
            ChangeEvent::PlaylistPosition => "playlist_position",
            ChangeEvent::Elapsed => "elapsed",
            ChangeEvent::PlayingItem => "playing_item",
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FIFO of change notifications, drained by the UI after each poll.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<ChangeEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: ChangeEvent) {
        self.events.push_back(event);
    }

    /// Oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = ChangeEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
