mod auth;
mod cli;
mod config;
mod download;
mod error;
mod jenkins;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    output::print_banner();

    info!("Starting jenlogs");
    cli.execute().await?;

    Ok(())
}
