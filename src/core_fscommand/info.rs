use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{existing_metadata, reject, require_param, resolve_path};
use crate::core_network::SessionError;
use crate::session::Session;
use chrono::{DateTime, SecondsFormat, Utc};

/// Handles `info` (and its alias `stat`).
///
/// Sends four `key=value` lines: `name`, `type` (`dir` or `file`), `size`
/// (0 for directories) and `modified` as an RFC 3339 UTC timestamp.
pub async fn handle_info_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match describe(session, &arg).await {
        Ok(lines) => {
            session.reply_ok().await?;
            for line in &lines {
                session.send_line(line).await?;
            }
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Info, e).await,
    }
}

async fn describe(session: &mut Session, arg: &str) -> Result<[String; 4], CommandError> {
    let arg = require_param(arg)?;
    let path = resolve_path(session, arg);
    let metadata = existing_metadata(&path).await?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let (kind, size) = if metadata.is_dir() {
        ("dir", 0)
    } else {
        ("file", metadata.len())
    };
    let modified: DateTime<Utc> = metadata.modified()?.into();

    Ok([
        format!("name={}", name),
        format!("type={}", kind),
        format!("size={}", size),
        format!(
            "modified={}",
            modified.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
    ])
}
