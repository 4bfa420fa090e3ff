use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_param, resolve_path};
use crate::core_network::SessionError;
use crate::session::Session;
use filetime::FileTime;
use tokio::fs::{self, OpenOptions};

/// Handles the `touch` command.
///
/// Creates an empty file, along with its missing parent directories, or sets
/// the modification time of an existing regular file to now.
pub async fn handle_touch_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match touch_file(session, &arg).await {
        Ok(()) => {
            session.reply_ok().await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Touch, e).await,
    }
}

async fn touch_file(session: &mut Session, arg: &str) -> Result<(), CommandError> {
    let arg = require_param(arg)?;
    let target = resolve_path(session, arg);

    match fs::metadata(&target).await {
        Ok(metadata) if metadata.is_file() => {
            filetime::set_file_mtime(&target, FileTime::now())?;
        }
        Ok(_) => return Err(CommandError::NotAFile(target)),
        Err(_) => {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(&target)
                .await?;
        }
    }
    Ok(())
}
