use thiserror::Error;

/// Failures surfaced by a [`Daemon`](super::Daemon) connection.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to connect to MPD at {addr}: {message}")]
    Connect { addr: String, message: String },

    #[error("MPD rejected `{command}`: {message}")]
    Command { command: String, message: String },

    #[error("connection to MPD lost")]
    Disconnected,
}

impl DaemonError {
    pub fn command(command: &str, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.to_string(),
            message: message.into(),
        }
    }

    /// Whether the connection itself is gone (as opposed to a rejected command).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Disconnected)
    }
}
