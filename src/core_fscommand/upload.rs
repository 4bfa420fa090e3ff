use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_param, resolve_path};
use crate::core_network::transport::{copy_exactly, read_length};
use crate::core_network::SessionError;
use crate::session::Session;
use log::{error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};

/// Handles the `upload` command (client to server transfer).
///
/// Only the base name of the argument is used, the file always lands in the
/// current directory. The destination is created exclusively *before* `OK` is
/// sent: an existing file, or one that cannot be created, is a plain `KO`.
/// After `OK` the client sends the 8-byte length and the bytes.
///
/// # Returns
///
/// `Ok(false)` once the file is stored. A negative length or a stream that
/// ends mid-transfer is fatal for the session; the partial file is removed.
pub async fn handle_upload_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    let (path, mut file) = match create_destination(session, &arg).await {
        Ok(created) => created,
        Err(e) => return reject(session, FsCommand::Upload, e).await,
    };

    session.reply_ok().await?;

    match receive_into(session, &mut file).await {
        Ok(length) => {
            info!(
                "[{}] Received {:?} ({} bytes)",
                session.peer, path, length
            );
            Ok(false)
        }
        Err(e) => {
            error!("[{}] Upload of {:?} aborted: {}", session.peer, path, e);
            drop(file);
            let _ = fs::remove_file(&path).await;
            Err(e)
        }
    }
}

async fn create_destination(
    session: &mut Session,
    arg: &str,
) -> Result<(PathBuf, File), CommandError> {
    let arg = require_param(arg)?;
    let name = Path::new(arg)
        .file_name()
        .ok_or_else(|| CommandError::InvalidArgument(arg.to_string()))?
        .to_string_lossy()
        .into_owned();

    let dir = resolve_path(session, "");
    fs::create_dir_all(&dir).await?;

    let path = resolve_path(session, &name);
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => CommandError::AlreadyExists(path.clone()),
            _ => e.into(),
        })?;
    Ok((path, file))
}

async fn receive_into(session: &mut Session, file: &mut File) -> Result<u64, SessionError> {
    let length = read_length(&mut session.reader).await?;
    if length < 0 {
        return Err(SessionError::NegativeLength(length));
    }
    let length = length as u64;
    copy_exactly(&mut session.reader, file, length).await?;
    file.sync_all().await?;
    Ok(length)
}
