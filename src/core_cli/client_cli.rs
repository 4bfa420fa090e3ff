use crate::constants::DEFAULT_LISTEN_PORT;
use clap::Parser;

/// Command-line arguments of the interactive client
#[derive(Parser, Debug)]
#[command(name = "rouillefs", about = "Interactive client for rouillefsd.")]
pub struct ClientCli {
    /// Server host name or address
    #[arg(default_value = "localhost")]
    pub host: String,

    /// Server port
    #[arg(default_value_t = DEFAULT_LISTEN_PORT)]
    pub port: u16,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
