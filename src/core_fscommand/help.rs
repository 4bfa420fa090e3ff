use crate::core_fscommand::handlers::CommandCatalog;
use crate::core_fscommand::utils::send_terminated_list;
use crate::core_network::SessionError;
use crate::session::Session;

/// Handles the `help` command: every verb of the catalog, sorted, aliases
/// left out, followed by a blank line.
pub async fn handle_help_command(
    session: &mut Session,
    catalog: &CommandCatalog,
) -> Result<bool, SessionError> {
    let names = catalog.names_sorted();
    session.reply_ok().await?;
    send_terminated_list(session, &names).await?;
    Ok(false)
}
