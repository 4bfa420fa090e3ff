pub mod client_cli;
pub mod server_cli;

pub use client_cli::ClientCli;
pub use server_cli::ServerCli;
