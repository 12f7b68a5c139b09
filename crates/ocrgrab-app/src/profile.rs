use std::path::{Path, PathBuf};

use anyhow::Context;
use ocrgrab_config::Config;

/// `<config_dir>/ocrgrab/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ocrgrab").join("config.json"))
}

/// Write a default config at `path` if nothing is there yet
pub fn init_user_config(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    Config::default()
        .save(path)
        .with_context(|| format!("Failed to create default config at {}", path.display()))?;
    tracing::info!("Created default config at {}", path.display());
    Ok(true)
}

/// Resolve the config for this run: explicit file, user file, or defaults
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => {
                init_user_config(&path)?;
                path
            }
            None => {
                tracing::warn!("No config directory on this platform, using defaults");
                let config = Config::new();
                config.validate()?;
                return Ok(config);
            }
        },
    };

    tracing::debug!("Loading config from {}", path.display());
    Config::load(&path).with_context(|| format!("Failed to load config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ocrgrab-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn first_run_writes_defaults_once() {
        let dir = scratch_dir("profile-init");
        let path = dir.join("ocrgrab").join("config.json");

        assert!(init_user_config(&path).unwrap());
        assert!(!init_user_config(&path).unwrap());

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.preprocess, Config::default().preprocess);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = scratch_dir("profile-missing");

        let err = load_config(Some(dir.join("nope.json").as_path())).unwrap_err();

        assert!(format!("{err:#}").contains("nope.json"));
    }
}
