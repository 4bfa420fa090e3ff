use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{
    read_text_lines, reject, require_param, resolve_path, send_counted_lines,
};
use crate::core_network::SessionError;
use crate::session::Session;

/// Handles the `show` command: the whole text file as a count line followed
/// by that many lines.
pub async fn handle_show_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    let lines = match require_param(&arg) {
        Ok(arg) => {
            let path = resolve_path(session, arg);
            read_text_lines(&path).await
        }
        Err(e) => Err(e),
    };

    match lines {
        Ok(lines) => {
            session.reply_ok().await?;
            send_counted_lines(session, &lines).await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Show, e).await,
    }
}
