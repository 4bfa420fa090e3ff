use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{
    reject, require_dir, require_param, resolve_path, send_terminated_list,
};
use crate::core_network::SessionError;
use crate::session::Session;
use std::path::Path;
use tokio::fs;

/// Handles the `list` command.
///
/// Sends one `"<name> <kib>"` line per entry of the directory, sorted by name,
/// followed by a blank line. Sizes are rounded up to the next kibibyte;
/// directories report 0.
///
/// # Arguments
///
/// * `session` - The session issuing the command.
/// * `arg` - The directory to list, resolved against the current directory.
///
/// # Returns
///
/// `Ok(false)`; a missing argument or a target that is not a directory is
/// answered with `KO`.
pub async fn handle_list_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    let listing = match require_param(&arg) {
        Ok(arg) => {
            let dir = resolve_path(session, arg);
            list_directory(&dir).await
        }
        Err(e) => Err(e),
    };

    match listing {
        Ok(lines) => {
            session.reply_ok().await?;
            send_terminated_list(session, &lines).await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::List, e).await,
    }
}

async fn list_directory(dir: &Path) -> Result<Vec<String>, CommandError> {
    require_dir(dir).await?;

    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follow links so a link to a file shows the file's size.
        let kib = match fs::metadata(entry.path()).await {
            Ok(metadata) if metadata.is_file() => metadata.len().div_ceil(1024),
            _ => 0,
        };
        entries.push((name, kib));
    }
    entries.sort();

    Ok(entries
        .into_iter()
        .map(|(name, kib)| format!("{} {}", name, kib))
        .collect())
}
