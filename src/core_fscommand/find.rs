use crate::constants::FIND_MAX_RESULTS;
use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{
    relative_display, reject, require_dir, require_param, resolve_path, send_terminated_list,
};
use crate::core_network::SessionError;
use crate::session::Session;
use std::io;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Handles `find <pattern> [dir]`.
///
/// Walks the directory (the current one by default) and reports every entry
/// whose name contains `pattern`, ignoring case. Results are paths relative
/// to the start directory with `/` separators, capped, sorted, and followed by
/// a blank line.
pub async fn handle_find_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match search(session, &arg).await {
        Ok(matches) => {
            session.reply_ok().await?;
            send_terminated_list(session, &matches).await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Find, e).await,
    }
}

async fn search(session: &mut Session, arg: &str) -> Result<Vec<String>, CommandError> {
    let arg = require_param(arg)?;
    let (pattern, dir) = match arg.split_once(char::is_whitespace) {
        Some((pattern, dir)) => (pattern, dir.trim()),
        None => (arg, ""),
    };
    let start = resolve_path(session, dir);
    require_dir(&start).await?;

    find_matching(start, pattern.to_lowercase()).await
}

async fn find_matching(start: PathBuf, needle: String) -> Result<Vec<String>, CommandError> {
    tokio::task::spawn_blocking(move || {
        let mut matches: Vec<String> = WalkDir::new(&start)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .to_lowercase()
                    .contains(&needle)
            })
            .take(FIND_MAX_RESULTS)
            .map(|entry| relative_display(&start, entry.path()))
            .collect();
        matches.sort();
        matches
    })
    .await
    .map_err(|e| CommandError::Io(io::Error::other(e)))
}
