use crate::constants::TREE_MAX_ITEMS;
use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_dir, resolve_path, send_terminated_list};
use crate::core_network::SessionError;
use crate::session::Session;
use std::io;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Handles `tree [dir]`.
///
/// The first line is the name of the start directory (`.` at the root). Each
/// entry below it follows on its own line, indented by two spaces per level,
/// siblings sorted case-insensitively and directories expanded depth-first.
/// Output stops after a fixed number of entries; a blank line ends it.
/// Unreadable subdirectories are skipped. Symbolic links are listed but not
/// followed.
pub async fn handle_tree_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    let start = resolve_path(session, arg.trim());
    let title = if start == session.root_dir {
        String::from(".")
    } else {
        start
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| start.display().to_string())
    };

    match render_tree(start).await {
        Ok(entries) => {
            session.reply_ok().await?;
            session.send_line(&title).await?;
            send_terminated_list(session, &entries).await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Tree, e).await,
    }
}

async fn render_tree(start: PathBuf) -> Result<Vec<String>, CommandError> {
    require_dir(&start).await?;

    tokio::task::spawn_blocking(move || {
        WalkDir::new(&start)
            .follow_links(false)
            .min_depth(1)
            .sort_by(|a, b| {
                a.file_name()
                    .to_string_lossy()
                    .to_lowercase()
                    .cmp(&b.file_name().to_string_lossy().to_lowercase())
            })
            .into_iter()
            .filter_map(Result::ok)
            .take(TREE_MAX_ITEMS)
            .map(|entry| {
                format!(
                    "{}{}",
                    "  ".repeat(entry.depth()),
                    entry.file_name().to_string_lossy()
                )
            })
            .collect::<Vec<String>>()
    })
    .await
    .map_err(|e| CommandError::Io(io::Error::other(e)))
}
