// Protocol-fatal conditions: once one of these is raised the session is over.
use crate::core_network::transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("negative binary length {0} received after OK status")]
    NegativeLength(i64),

    #[error("no request received for {0} seconds")]
    IdleTimeout(u64),
}

impl SessionError {
    /// Event text recorded in the audit log when a session dies on this error.
    pub fn to_audit_event(&self) -> String {
        format!("DISCONNECT error: {}", self)
    }
}
