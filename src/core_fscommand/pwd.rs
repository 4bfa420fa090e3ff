use crate::core_network::SessionError;
use crate::session::Session;

/// Handles the `pwd` command.
///
/// Sends the current directory relative to the root, `/`-separated, or `.`
/// when the session sits at the root. Never fails.
pub async fn handle_pwd_command(session: &mut Session, _arg: String) -> Result<bool, SessionError> {
    let current = session.relative_current_dir();
    session.reply_ok().await?;
    session.send_line(&current).await?;
    Ok(false)
}
