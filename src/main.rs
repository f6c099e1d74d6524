mod cli;
mod commands;

use clap::Parser;
use rollcall::utils::config::read_config;
use rollcall::init_logger;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = read_config()?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    if let Some(level) = cli.log_level {
        config.log_config.level = level.into();
    }
    let _log_guard = init_logger(&config.log_config)?;

    let output = commands::run(&config, cli.command).await?;
    println!("{output}");
    Ok(())
}
