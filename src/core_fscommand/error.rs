// Recoverable command failures. Each one becomes a single KO status line and
// the session carries on.
use crate::constants::STATUS_KO;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Missing argument")]
    MissingArgument,

    #[error("Expected two arguments")]
    ExpectedTwoArguments,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Refusing to modify the sandbox root")]
    RootProtected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Status line sent for any command failure. The reason stays server-side.
    pub fn to_status_line(&self) -> &'static str {
        STATUS_KO
    }
}
