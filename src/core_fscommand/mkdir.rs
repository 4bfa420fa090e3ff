use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_param, resolve_path};
use crate::core_network::SessionError;
use crate::session::Session;
use log::info;
use tokio::fs;

/// Handles the `mkdir` command. Missing parents are created and an existing
/// directory is not an error.
pub async fn handle_mkdir_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    let arg = match require_param(&arg) {
        Ok(arg) => arg,
        Err(e) => return reject(session, FsCommand::Mkdir, e).await,
    };

    let target = resolve_path(session, arg);
    match fs::create_dir_all(&target).await {
        Ok(()) => {
            info!("[{}] Directory created: {:?}", session.peer, target);
            session.reply_ok().await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Mkdir, e.into()).await,
    }
}
