use crate::core_network::SessionError;
use crate::session::Session;

pub async fn handle_ping_command(session: &mut Session, _arg: String) -> Result<bool, SessionError> {
    session.reply_ok().await?;
    session.send_line("pong").await?;
    Ok(false)
}
