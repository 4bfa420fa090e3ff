use crate::core_fscommand::fscommand::FsCommand;
use crate::core_fscommand::utils::{reject, require_file, require_param, resolve_path};
use crate::core_network::SessionError;
use crate::session::Session;

/// Handles the `size` command: the byte length of a regular file.
pub async fn handle_size_command(session: &mut Session, arg: String) -> Result<bool, SessionError> {
    let metadata = match require_param(&arg) {
        Ok(arg) => {
            let path = resolve_path(session, arg);
            require_file(&path).await
        }
        Err(e) => Err(e),
    };

    match metadata {
        Ok(metadata) => {
            session.reply_ok().await?;
            session.send_line(&metadata.len().to_string()).await?;
            Ok(false)
        }
        Err(e) => reject(session, FsCommand::Size, e).await,
    }
}
