use crate::core_network::SessionError;
use crate::session::Session;
use log::info;

/// Handles the `quit` command: acknowledges and ends the session.
pub async fn handle_quit_command(session: &mut Session, _arg: String) -> Result<bool, SessionError> {
    info!("[{}] Client requested to quit", session.peer);
    session.reply_ok().await?;
    Ok(true)
}
