pub mod config;
pub mod constants;
pub mod core_cli;
pub mod core_client;
pub mod core_fscommand;
pub mod core_log;
pub mod core_network;
pub mod server;
pub mod session;

pub use config::Config;
