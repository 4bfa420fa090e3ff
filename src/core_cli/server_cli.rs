use crate::constants::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments of the server
#[derive(Parser, Debug)]
#[command(name = "rouillefsd", about = "A sandboxed remote file server written in Rust.")]
pub struct ServerCli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Listening port, overrides the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Sandbox root directory, overrides the configuration file
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Audit log file, overrides the configuration file
    #[arg(long)]
    pub audit_log: Option<PathBuf>,

    /// Do not write the audit log
    #[arg(long)]
    pub no_audit: bool,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
