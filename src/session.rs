use crate::constants::STATUS_OK;
use crate::core_log::audit::AuditLog;
use crate::core_network::transport::{read_line, write_line};
use crate::core_network::{BoxedReader, BoxedWriter, SessionError};
use std::path::{Component, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

/// Server-side state of one client connection.
///
/// Owned by the task serving the connection and handed by `&mut` to every
/// command, so none of these fields needs a lock.
pub struct Session {
    pub reader: BoxedReader,
    pub writer: BoxedWriter,
    /// Peer IP address, as written in the audit log.
    pub peer: String,
    /// Sandbox root. Absolute, normalized and identical for every session.
    pub root_dir: PathBuf,
    /// Always equal to `root_dir` or nested under it.
    pub current_dir: PathBuf,
    /// Last request line, paired with the status in the audit record.
    pub last_received: String,
    pub idle_timeout: Option<Duration>,
    audit: Arc<AuditLog>,
}

impl Session {
    pub fn new(
        reader: BoxedReader,
        writer: BoxedWriter,
        peer: String,
        root_dir: PathBuf,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            reader,
            writer,
            peer,
            current_dir: root_dir.clone(),
            root_dir,
            last_received: String::new(),
            idle_timeout: None,
            audit,
        }
    }

    /// Builds the session for an accepted TCP connection.
    pub fn from_tcp(socket: TcpStream, root_dir: PathBuf, audit: Arc<AuditLog>) -> Self {
        let peer = socket
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|_| String::from("unknown"));
        let (reader, writer) = socket.into_split();
        Self::new(Box::new(reader), Box::new(writer), peer, root_dir, audit)
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Waits for the next request line, honoring the idle timeout if any.
    pub async fn read_request(&mut self) -> Result<Option<String>, SessionError> {
        match self.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, read_line(&mut self.reader)).await {
                Ok(line) => Ok(line?),
                Err(_) => Err(SessionError::IdleTimeout(limit.as_secs())),
            },
            None => Ok(read_line(&mut self.reader).await?),
        }
    }

    /// Sends the status line of the current command and records it, together
    /// with the request that triggered it, as a single audit event.
    ///
    /// Must be called exactly once per command, before any payload.
    pub async fn reply(&mut self, status: &str) -> Result<(), SessionError> {
        write_line(&mut self.writer, status).await?;
        self.audit.record(
            &self.peer,
            &format!("RECV: {} -> RESP: {}", self.last_received, status),
        );
        Ok(())
    }

    pub async fn reply_ok(&mut self) -> Result<(), SessionError> {
        self.reply(STATUS_OK).await
    }

    /// Sends one payload line after the status.
    pub async fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        write_line(&mut self.writer, line).await?;
        Ok(())
    }

    pub fn audit_event(&self, event: &str) {
        self.audit.record(&self.peer, event);
    }

    /// Current directory relative to the root, `/`-separated, `.` at the root.
    ///
    /// If the current directory somehow left the root it is reset to it.
    pub fn relative_current_dir(&mut self) -> String {
        let relative = match self.current_dir.strip_prefix(&self.root_dir) {
            Ok(relative) => relative
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => {
                self.current_dir = self.root_dir.clone();
                String::new()
            }
        };

        if relative.is_empty() {
            String::from(".")
        } else {
            relative
        }
    }
}
