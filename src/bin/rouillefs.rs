use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rouillefsd::core_cli::ClientCli;
use rouillefsd::core_client::Client;
use rouillefsd::core_log::init_logger;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ClientCli::parse();
    init_logger(args.verbose);

    let mut client = Client::connect(&args.host, args.port)
        .await
        .with_context(|| format!("Failed to connect to {}:{}", args.host, args.port))?;
    info!("Local directory: {}", client.local_dir().display());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    client
        .run_interactive(stdin, &mut stdout)
        .await
        .context("Session ended")?;

    Ok(())
}
