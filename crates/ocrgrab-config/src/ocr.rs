use std::path::PathBuf;

use ocrgrab_types::{OcrMode, ScreenRect};
use serde::{Deserialize, Serialize};

fn default_command() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_printed_language() -> String {
    "eng".to_string()
}

fn default_handwriting_language() -> String {
    "eng".to_string()
}

fn default_kannada_language() -> String {
    "kan".to_string()
}

/// Where to find the engine binary and its trained data
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TesseractConfig {
    #[serde(default = "default_command")]
    pub command: PathBuf,
    /// Passed as `--tessdata-dir`; the engine's own lookup is used when unset
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            tessdata_dir: None,
        }
    }
}

/// Language pack identifiers per mode
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LanguageConfig {
    #[serde(default = "default_printed_language")]
    pub printed: String,
    #[serde(default = "default_handwriting_language")]
    pub handwriting: String,
    #[serde(default = "default_kannada_language")]
    pub kannada: String,
}

impl LanguageConfig {
    pub fn for_mode(&self, mode: OcrMode) -> &str {
        match mode {
            OcrMode::Printed => &self.printed,
            OcrMode::Handwriting => &self.handwriting,
            OcrMode::Kannada => &self.kannada,
        }
    }

    /// Every distinct pack the configured modes need.
    pub fn required(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = Vec::new();
        for mode in OcrMode::ALL {
            for lang in self.for_mode(mode).split('+') {
                if !lang.is_empty() && !languages.contains(&lang) {
                    languages.push(lang);
                }
            }
        }
        languages
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            printed: default_printed_language(),
            handwriting: default_handwriting_language(),
            kannada: default_kannada_language(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct OcrConfig {
    pub tesseract: TesseractConfig,
    pub languages: LanguageConfig,
    pub default_mode: OcrMode,
    /// Forwarded as `--dpi` when set
    pub dpi: Option<u32>,
    /// Region captured by the hotkey listener
    pub capture_region: Option<ScreenRect>,
}
