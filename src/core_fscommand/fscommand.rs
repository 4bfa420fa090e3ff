/// Every verb the server understands.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FsCommand {
    List,
    Show,
    Delete,
    Upload,
    Download,
    Quit,
    Ping,
    Mkdir,
    Rename,
    Info,
    Exists,
    Copy,
    Pwd,
    Cd,
    Touch,
    Size,
    Head,
    Tail,
    Tree,
    Find,
    Hash,
    Help,
}

/// Alternative verbs resolving to the same command. Hidden from `help`.
pub const ALIASES: &[(&str, FsCommand)] = &[("stat", FsCommand::Info)];

impl FsCommand {
    pub const ALL: [FsCommand; 22] = [
        FsCommand::List,
        FsCommand::Show,
        FsCommand::Delete,
        FsCommand::Upload,
        FsCommand::Download,
        FsCommand::Quit,
        FsCommand::Ping,
        FsCommand::Mkdir,
        FsCommand::Rename,
        FsCommand::Info,
        FsCommand::Exists,
        FsCommand::Copy,
        FsCommand::Pwd,
        FsCommand::Cd,
        FsCommand::Touch,
        FsCommand::Size,
        FsCommand::Head,
        FsCommand::Tail,
        FsCommand::Tree,
        FsCommand::Find,
        FsCommand::Hash,
        FsCommand::Help,
    ];

    /// Canonical verb as typed on the wire.
    pub fn verb(self) -> &'static str {
        match self {
            FsCommand::List => "list",
            FsCommand::Show => "show",
            FsCommand::Delete => "delete",
            FsCommand::Upload => "upload",
            FsCommand::Download => "download",
            FsCommand::Quit => "quit",
            FsCommand::Ping => "ping",
            FsCommand::Mkdir => "mkdir",
            FsCommand::Rename => "rename",
            FsCommand::Info => "info",
            FsCommand::Exists => "exists",
            FsCommand::Copy => "copy",
            FsCommand::Pwd => "pwd",
            FsCommand::Cd => "cd",
            FsCommand::Touch => "touch",
            FsCommand::Size => "size",
            FsCommand::Head => "head",
            FsCommand::Tail => "tail",
            FsCommand::Tree => "tree",
            FsCommand::Find => "find",
            FsCommand::Hash => "hash",
            FsCommand::Help => "help",
        }
    }
}
