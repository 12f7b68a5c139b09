use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::ocr::OcrConfig;
use self::preprocess::PreprocessConfig;
use self::ui::UiConfig;

pub mod ocr;
pub mod preprocess;
pub mod ui;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrConfig,
    pub preprocess: PreprocessConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let data = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        fs::write(path, data).map_err(write_err)
    }

    pub fn apply_env(&mut self) {
        if let Ok(command) = env::var("OCRGRAB_TESSERACT_CMD") {
            tracing::debug!("Tesseract command from env: {}", command);
            self.ocr.tesseract.command = PathBuf::from(command);
        }

        if let Ok(dir) = env::var("OCRGRAB_TESSDATA_DIR") {
            tracing::debug!("Tessdata dir from env: {}", dir);
            self.ocr.tesseract.tessdata_dir = Some(PathBuf::from(dir));
        }

        if let Ok(value) = env::var("OCRGRAB_MODE") {
            match value.parse() {
                Ok(mode) => {
                    tracing::debug!("Default mode from env: {}", mode);
                    self.ocr.default_mode = mode;
                }
                Err(_) => tracing::warn!("Ignoring OCRGRAB_MODE={:?}, not a known mode", value),
            }
        }

        if let Ok(hotkey) = env::var("OCRGRAB_HOTKEY") {
            tracing::debug!("Hotkey from env: {}", hotkey);
            self.ui.hotkey = hotkey;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.preprocess;

        if !(p.clahe_clip_limit > 0.0) {
            return Err(invalid("preprocess.clahe_clip_limit", "must be positive"));
        }
        if p.clahe_tile_grid == 0 {
            return Err(invalid("preprocess.clahe_tile_grid", "must be at least 1"));
        }
        if !(p.denoise_strength > 0.0) {
            return Err(invalid("preprocess.denoise_strength", "must be positive"));
        }
        for (field, size) in [
            ("preprocess.denoise_template_window", p.denoise_template_window),
            ("preprocess.denoise_search_window", p.denoise_search_window),
            ("preprocess.threshold_block_size", p.threshold_block_size),
        ] {
            if size < 3 || size % 2 == 0 {
                return Err(invalid(field, "must be an odd number of at least 3"));
            }
        }
        if !(p.contrast_factor > 0.0) {
            return Err(invalid("preprocess.contrast_factor", "must be positive"));
        }

        for (field, lang) in [
            ("ocr.languages.printed", &self.ocr.languages.printed),
            ("ocr.languages.handwriting", &self.ocr.languages.handwriting),
            ("ocr.languages.kannada", &self.ocr.languages.kannada),
        ] {
            if lang.trim().is_empty() {
                return Err(invalid(field, "must name a language pack"));
            }
        }

        if self.ocr.tesseract.command.as_os_str().is_empty() {
            return Err(invalid("ocr.tesseract.command", "must not be empty"));
        }

        if self.ocr.capture_region.is_some_and(|r| r.is_empty()) {
            return Err(invalid("ocr.capture_region", "must have a non-zero area"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
