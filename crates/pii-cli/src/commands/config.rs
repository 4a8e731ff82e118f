use anyhow::Result;
use pii_config::Config;
use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::{load, resolve_path};

pub fn handle(cmd: ConfigCommands, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = load(explicit, false)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => init(&resolve_path(explicit), force),
        ConfigCommands::Path => {
            println!("{}", resolve_path(explicit).display());
            Ok(())
        }
    }
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(path)?;
    println!("✓ Wrote default config to {}", path.display());

    Ok(())
}
