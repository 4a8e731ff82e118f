mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize tracing (stderr, so stdout stays machine-readable)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Redact {
            input,
            output,
            keyed,
        } => {
            let config = config::load(cli.config.as_deref(), keyed)?;
            commands::redact::handle(&config, &input, &output)
        }
        cli::Commands::Classify {
            json,
            id,
            keyed,
        } => {
            let config = config::load(cli.config.as_deref(), keyed)?;
            commands::classify::handle(&config, &id, &json)
        }
        cli::Commands::Config(cmd) => commands::config::handle(cmd, cli.config.as_deref()),
    }
}
