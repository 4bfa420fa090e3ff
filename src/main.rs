use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rouillefsd::config::Config;
use rouillefsd::core_cli::ServerCli;
use rouillefsd::core_log::init_logger;
use rouillefsd::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = ServerCli::parse();

    init_logger(args.verbose);

    // Load configuration from the TOML file, then let the CLI override it
    let mut config = Config::load_from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    config.apply_cli(&args);

    info!("Starting rouillefsd with configuration:");
    config.log_config();

    server::run(config).await
}
