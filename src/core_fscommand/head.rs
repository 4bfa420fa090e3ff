use crate::core_fscommand::error::CommandError;
use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{
    parse_line_count, read_first_lines, reject, require_param, resolve_path, send_counted_lines,
};
use crate::core_network::SessionError;
use crate::session::Session;

/// Handles `head <file> [n]`: the first `n` lines of a text file (10 by
/// default, at most 5000).
pub async fn handle_head_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    match first_lines(session, &arg).await {
        Ok(lines) => {
            session.reply_ok().await?;
            send_counted_lines(session, &lines).await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Head, e).await,
    }
}

async fn first_lines(session: &mut Session, arg: &str) -> Result<Vec<String>, CommandError> {
    let mut parts = require_param(arg)?.split_whitespace();
    let file = parts.next().ok_or(CommandError::MissingArgument)?;
    let count = parse_line_count(parts.next());

    let path = resolve_path(session, file);
    read_first_lines(&path, count).await
}
