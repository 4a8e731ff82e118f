use anyhow::{Context, Result};
use pii_config::{Config, StandaloneScope};
use std::path::{Path, PathBuf};

/// Config file to use: the explicit one, or the per-user default
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path)
}

/// Load the effective config, applying command-line overrides
pub fn load(explicit: Option<&Path>, keyed: bool) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    if keyed {
        config.standalone.scope = StandaloneScope::Keyed;
    }

    tracing::debug!(
        scope = ?config.standalone.scope,
        rules = config.effective_rules().len(),
        "loaded config"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sentinels]\naddress = \"<addr>\"\n").unwrap();

        let config = load(Some(&path), false).unwrap();
        assert_eq!(config.sentinels.address, "<addr>");
        assert_eq!(config.standalone.scope, StandaloneScope::AnyField);

        let config = load(Some(&path), true).unwrap();
        assert_eq!(config.standalone.scope, StandaloneScope::Keyed);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.toml")), false).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_resolve_path() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(resolve_path(Some(&explicit)), explicit);
        assert_eq!(resolve_path(None), Config::config_path());
    }
}
