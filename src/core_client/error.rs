use crate::core_network::transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server hung up in the middle of a response.
    #[error("Server closed connection during {phase}")]
    ServerClosed { phase: String },

    /// A local file could not be used. Nothing was sent to the server.
    #[error("{0}")]
    LocalFile(String),

    /// The command line cannot be sent as typed. Nothing was sent.
    #[error("{0}")]
    Usage(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered something the protocol does not allow.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    /// Whether the connection is still usable after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ClientError::LocalFile(_) | ClientError::Usage(_))
    }
}
