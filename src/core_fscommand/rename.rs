use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{existing_metadata, reject, resolve_path, split_two};
use crate::core_network::SessionError;
use crate::session::Session;
use log::info;
use tokio::fs;

/// Handles `rename <src> <dst>`. An existing destination file is replaced.
pub async fn handle_rename_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match rename_entry(session, &arg).await {
        Ok(()) => {
            session.reply_ok().await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Rename, e).await,
    }
}

async fn rename_entry(session: &mut Session, arg: &str) -> Result<(), CommandError> {
    let (from, to) = split_two(arg)?;
    let source = resolve_path(session, from);
    let destination = resolve_path(session, to);

    if source == session.root_dir || destination == session.root_dir {
        return Err(CommandError::RootProtected);
    }
    existing_metadata(&source).await?;

    fs::rename(&source, &destination).await?;
    info!(
        "[{}] Renamed {:?} to {:?}",
        session.peer, source, destination
    );
    Ok(())
}
