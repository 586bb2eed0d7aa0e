//! Connection lifecycle of the transport session.
use std::fmt;

/// Authoritative state of the single transport session.
///
/// `Disconnected -> Connecting -> Connected -> {Disconnected, Error}`; `Error` is
/// also reachable from `Connecting` and is only left by a new connect attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No channel. Initial state, and the state every teardown ends in.
    #[default]
    Disconnected,
    /// The channel is being established.
    Connecting,
    /// The channel is live and both background loops are running.
    Connected,
    /// Establishment or the live channel failed.
    Error(String),
}

impl ConnectionStatus {
    /// `true` only for [`ConnectionStatus::Connected`].
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// `true` only for [`ConnectionStatus::Disconnected`].
    pub fn is_disconnected(&self) -> bool {
        matches!(self, ConnectionStatus::Disconnected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Error(reason) => write!(f, "error: {}", reason),
        }
    }
}
