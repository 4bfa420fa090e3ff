use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_param, resolve_path};
use crate::core_network::SessionError;
use crate::session::Session;
use log::info;
use tokio::fs;

/// Handles the `delete` command.
///
/// Removes a file, a symbolic link or an empty directory. Removing a
/// non-empty directory, or the root itself, fails with `KO`.
pub async fn handle_delete_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match delete_target(session, &arg).await {
        Ok(()) => {
            session.reply_ok().await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Delete, e).await,
    }
}

async fn delete_target(session: &mut Session, arg: &str) -> Result<(), CommandError> {
    let arg = require_param(arg)?;
    let target = resolve_path(session, arg);
    if target == session.root_dir {
        return Err(CommandError::RootProtected);
    }

    let metadata = fs::symlink_metadata(&target)
        .await
        .map_err(|_| CommandError::NotFound(target.clone()))?;

    if metadata.is_dir() {
        fs::remove_dir(&target).await?;
    } else {
        fs::remove_file(&target).await?;
    }

    info!("[{}] Deleted {:?}", session.peer, target);
    Ok(())
}
