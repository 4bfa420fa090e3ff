use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_file, require_param, resolve_path};
use crate::core_network::transport::{copy_exactly, write_length};
use crate::core_network::SessionError;
use crate::session::Session;
use log::info;
use std::path::PathBuf;
use tokio::fs::File;

/// Handles the `download` command (server to client transfer).
///
/// The file is opened before anything is written, so an unreadable file is
/// still a plain `KO`. Once `OK` is out the response is the 8-byte length
/// followed by exactly that many bytes, with nothing after them.
///
/// # Arguments
///
/// * `session` - The session issuing the command.
/// * `arg` - The file to send, resolved against the current directory.
///
/// # Returns
///
/// `Ok(false)` after a complete transfer or a `KO`. A file that shrinks while
/// it is being sent is reported as a truncated transfer, which ends the
/// session.
pub async fn handle_download_command(
    session: &mut Session,
    arg: String,
) -> Result<bool, SessionError> {
    let (path, mut file, length) = match open_source(session, &arg).await {
        Ok(opened) => opened,
        Err(e) => return reject(session, FsCommand::Download, e).await,
    };

    session.reply_ok().await?;
    write_length(&mut session.writer, length as i64).await?;
    copy_exactly(&mut file, &mut session.writer, length).await?;

    info!(
        "[{}] Sent {:?} ({} bytes)",
        session.peer, path, length
    );
    Ok(false)
}

async fn open_source(
    session: &mut Session,
    arg: &str,
) -> Result<(PathBuf, File, u64), CommandError> {
    let arg = require_param(arg)?;
    let path = resolve_path(session, arg);
    require_file(&path).await?;

    let file = File::open(&path).await?;
    let length = file.metadata().await?.len();
    Ok((path, file, length))
}
