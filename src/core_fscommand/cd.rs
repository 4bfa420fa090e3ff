use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_dir, require_param, resolve_path};
use crate::core_network::SessionError;
use crate::session::Session;
use log::debug;
use std::path::PathBuf;

/// Handles the `cd` command.
///
/// The target goes through the path resolver, so `cd ..` at the root stays at
/// the root. It must be an existing directory, otherwise `KO` is sent and the
/// current directory is left untouched.
pub async fn handle_cd_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match change_target(session, &arg).await {
        Ok(target) => {
            debug!("[{}] Current directory is now {:?}", session.peer, target);
            session.current_dir = target;
            session.reply_ok().await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Cd, e).await,
    }
}

async fn change_target(session: &mut Session, arg: &str) -> Result<PathBuf, CommandError> {
    let arg = require_param(arg)?;
    let target = resolve_path(session, arg);
    require_dir(&target).await?;
    Ok(target)
}
