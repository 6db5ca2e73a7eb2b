use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use harvester::cli::{commands, Cli};
use harvester::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the JSON, so logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    commands::run(&cli, &config).await?;

    Ok(())
}
