// One file per verb
pub mod cd;
pub mod copy;
pub mod delete;
pub mod download;
pub mod exists;
pub mod find;
pub mod hash;
pub mod head;
pub mod help;
pub mod info;
pub mod list;
pub mod mkdir;
pub mod ping;
pub mod pwd;
pub mod quit;
pub mod rename;
pub mod show;
pub mod size;
pub mod tail;
pub mod touch;
pub mod tree;
pub mod upload;

pub mod error;
pub mod fscommand;
pub mod handlers;

// Path resolution and the helpers shared by the commands
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::CommandError;
pub use fscommand::FsCommand;
pub use handlers::CommandCatalog;
