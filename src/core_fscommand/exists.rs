use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_param, resolve_path};
use crate::core_network::SessionError;
use crate::session::Session;

pub async fn handle_exists_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    let arg = match require_param(&arg) {
        Ok(arg) => arg,
        Err(e) => return reject(session, FsCommand::Exists, e).await,
    };

    let path = resolve_path(session, arg);
    let exists = tokio::fs::try_exists(&path).await.unwrap_or(false);

    session.reply_ok().await?;
    session.send_line(if exists { "true" } else { "false" }).await?;
    Ok(false)
}
