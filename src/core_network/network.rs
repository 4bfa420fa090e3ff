use crate::constants::STATUS_KO;
use crate::core_fscommand::CommandCatalog;
use crate::core_log::AuditLog;
use crate::core_network::SessionError;
use crate::session::Session;
use log::{debug, error, info, warn};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Everything the accepted connections share. Immutable once the server runs.
pub struct ServerContext {
    pub root_dir: PathBuf,
    pub catalog: Arc<CommandCatalog>,
    pub audit: Arc<AuditLog>,
    pub idle_timeout: Option<Duration>,
}

/// How a session loop ended without a protocol error.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SessionEnd {
    /// A command (`quit`) asked to end the session.
    DisconnectedClean,
    /// The peer closed the stream while a request was awaited.
    DisconnectedAbnormal,
}

/// Splits a request line into verb and argument on the first space, both
/// trimmed. Returns `None` for a blank line.
pub fn parse_request(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(' ') {
        Some((verb, arg)) => Some((verb, arg.trim())),
        None => Some((line, "")),
    }
}

/// Reads, dispatches and answers requests until a command ends the session
/// or the peer goes away.
///
/// Blank lines are ignored. Unknown verbs get `KO` and the loop carries on.
/// Each response is complete before the next request is read.
///
/// # Errors
///
/// Protocol-fatal conditions: transport failures, a negative upload length,
/// a truncated transfer or the idle timeout.
pub async fn run_session_loop(
    session: &mut Session,
    catalog: &CommandCatalog,
) -> Result<SessionEnd, SessionError> {
    loop {
        let Some(line) = session.read_request().await? else {
            return Ok(SessionEnd::DisconnectedAbnormal);
        };
        let Some((verb, arg)) = parse_request(&line) else {
            continue;
        };

        session.last_received = if arg.is_empty() {
            verb.to_string()
        } else {
            format!("{} {}", verb, arg)
        };
        debug!("[{}] Received command: {}", session.peer, session.last_received);

        match catalog.get(verb) {
            Some(command) => {
                if catalog.execute(command, session, arg.to_string()).await? {
                    return Ok(SessionEnd::DisconnectedClean);
                }
            }
            None => {
                warn!("[{}] Unknown command: {}", session.peer, verb);
                session.reply(STATUS_KO).await?;
            }
        }
    }
}

/// Accepts connections forever, one task per connection.
pub async fn start_server(listener: TcpListener, context: Arc<ServerContext>) -> io::Result<()> {
    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("New connection from {}", addr);

        let context = Arc::clone(&context);
        tokio::spawn(async move {
            handle_connection(socket, context).await;
            info!("Connection closed for {}", addr);
        });
    }
}

/// Serves one client from `CONNECT` to `DISCONNECT`, auditing both ends.
pub async fn handle_connection(socket: TcpStream, context: Arc<ServerContext>) {
    let mut session = Session::from_tcp(
        socket,
        context.root_dir.clone(),
        Arc::clone(&context.audit),
    )
    .with_idle_timeout(context.idle_timeout);
    session.audit_event("CONNECT");

    match run_session_loop(&mut session, &context.catalog).await {
        Ok(SessionEnd::DisconnectedClean) => session.audit_event("DISCONNECT quit"),
        Ok(SessionEnd::DisconnectedAbnormal) => {
            warn!("[{}] Client disconnected unexpectedly", session.peer);
            session.audit_event("DISCONNECT unexpected");
        }
        Err(e) => {
            error!("[{}] Session aborted: {}", session.peer, e);
            session.audit_event(&e.to_audit_event());
        }
    }
}
