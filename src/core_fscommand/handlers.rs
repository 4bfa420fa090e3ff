use crate::core_fscommand::fscommand::{FsCommand, ALIASES};
use crate::core_fscommand::{
    cd, copy, delete, download, exists, find, hash, head, help, info, list, mkdir, ping, pwd,
    quit, rename, show, size, tail, touch, tree, upload,
};
use crate::core_network::SessionError;
use crate::session::Session;
use std::collections::HashMap;

/// Verb to command mapping, built once before the first connection is
/// accepted and only read afterwards.
pub struct CommandCatalog {
    commands: HashMap<String, FsCommand>,
}

impl CommandCatalog {
    pub fn new() -> Self {
        let mut commands = HashMap::new();

        for command in FsCommand::ALL {
            commands.insert(command.verb().to_string(), command);
        }
        for (alias, command) in ALIASES {
            commands.insert(alias.to_string(), *command);
        }

        Self { commands }
    }

    pub fn get(&self, verb: &str) -> Option<FsCommand> {
        self.commands.get(verb).copied()
    }

    /// Verb names in sorted order, aliases excluded.
    pub fn names_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .iter()
            .filter(|(name, command)| name.as_str() == command.verb())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Runs `command` for this session.
    ///
    /// Returns `Ok(true)` when the session must end. A command failure has
    /// already been answered with `KO` when this returns; only protocol-fatal
    /// conditions come back as `Err`.
    pub async fn execute(
        &self,
        command: FsCommand,
        session: &mut Session,
        arg: String,
    ) -> Result<bool, SessionError> {
        match command {
            FsCommand::List => list::handle_list_command(session, arg).await,
            FsCommand::Show => show::handle_show_command(session, arg).await,
            FsCommand::Delete => delete::handle_delete_command(session, arg).await,
            FsCommand::Upload => upload::handle_upload_command(session, arg).await,
            FsCommand::Download => download::handle_download_command(session, arg).await,
            FsCommand::Quit => quit::handle_quit_command(session, arg).await,
            FsCommand::Ping => ping::handle_ping_command(session, arg).await,
            FsCommand::Mkdir => mkdir::handle_mkdir_command(session, arg).await,
            FsCommand::Rename => rename::handle_rename_command(session, arg).await,
            FsCommand::Info => info::handle_info_command(session, arg).await,
            FsCommand::Exists => exists::handle_exists_command(session, arg).await,
            FsCommand::Copy => copy::handle_copy_command(session, arg).await,
            FsCommand::Pwd => pwd::handle_pwd_command(session, arg).await,
            FsCommand::Cd => cd::handle_cd_command(session, arg).await,
            FsCommand::Touch => touch::handle_touch_command(session, arg).await,
            FsCommand::Size => size::handle_size_command(session, arg).await,
            FsCommand::Head => head::handle_head_command(session, arg).await,
            FsCommand::Tail => tail::handle_tail_command(session, arg).await,
            FsCommand::Tree => tree::handle_tree_command(session, arg).await,
            FsCommand::Find => find::handle_find_command(session, arg).await,
            FsCommand::Hash => hash::handle_hash_command(session, arg).await,
            FsCommand::Help => help::handle_help_command(session, self).await,
        }
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::new()
    }
}
