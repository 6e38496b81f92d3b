use std::fmt;
use std::time::Duration;

/// Errors produced by the connection manager and the console loop.
#[derive(Debug)]
pub enum ClientError {
    /// The URL could not be parsed or does not use the ws/wss scheme.
    InvalidUrl(String),
    /// The handshake failed before the session opened.
    Connect(String),
    /// The handshake did not complete within the configured timeout.
    ConnectTimeout(Duration),
    /// `connect` was called while a session already exists.
    AlreadyConnected,
    /// A send was attempted while the session is not open.
    NotConnected,
    /// `connect` was called after the manager was shut down.
    ShutDown,
    /// An envelope could not be serialized.
    Serialize(serde_json::Error),
    /// The worker thread is gone and can no longer accept frames.
    ChannelClosed,
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUrl(reason) => write!(f, "Invalid URL: {}", reason),
            ClientError::Connect(reason) => write!(f, "Connection failed: {}", reason),
            ClientError::ConnectTimeout(timeout) => {
                write!(f, "Connection not established within {:?}", timeout)
            }
            ClientError::AlreadyConnected => write!(f, "WebSocket is already connected"),
            ClientError::NotConnected => write!(f, "WebSocket is not connected"),
            ClientError::ShutDown => write!(f, "Connection manager has been shut down"),
            ClientError::Serialize(e) => write!(f, "Failed to serialize message: {}", e),
            ClientError::ChannelClosed => write!(f, "WebSocket worker has stopped"),
            ClientError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Serialize(e) => Some(e),
            ClientError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialize(e)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Io(e)
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
