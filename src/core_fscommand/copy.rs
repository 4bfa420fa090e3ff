use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_file, resolve_path, split_two};
use crate::core_network::SessionError;
use crate::session::Session;
use filetime::FileTime;
use log::info;
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Handles `copy <src> <dst>`.
///
/// Only regular files are copied. The destination must not exist yet; it is
/// created exclusively so a concurrent session cannot have it overwritten.
/// The modification time of the source is carried over.
pub async fn handle_copy_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match copy_file(session, &arg).await {
        Ok(()) => {
            session.reply_ok().await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Copy, e).await,
    }
}

async fn copy_file(session: &mut Session, arg: &str) -> Result<(), CommandError> {
    let (from, to) = split_two(arg)?;
    let source = resolve_path(session, from);
    let destination = resolve_path(session, to);

    let metadata = require_file(&source).await?;
    if fs::symlink_metadata(&destination).await.is_ok() {
        return Err(CommandError::AlreadyExists(destination));
    }

    if let Err(e) = copy_contents(&source, &destination).await {
        let _ = fs::remove_file(&destination).await;
        return Err(e);
    }

    let modified = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(&destination, modified)?;

    info!(
        "[{}] Copied {:?} to {:?}",
        session.peer, source, destination
    );
    Ok(())
}

async fn copy_contents(source: &Path, destination: &Path) -> Result<(), CommandError> {
    let mut input = File::open(source).await?;
    let mut output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => {
                CommandError::AlreadyExists(destination.to_path_buf())
            }
            _ => e.into(),
        })?;
    tokio::io::copy(&mut input, &mut output).await?;
    output.flush().await?;
    Ok(())
}
