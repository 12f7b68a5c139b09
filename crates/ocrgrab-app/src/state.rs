use ocrgrab_config::Config;
use ocrgrab_core::{FilterChain, Pipeline};
use ocrgrab_ocr::{TesseractEngine, XcapCapturer};

use crate::clipboard::SystemClipboard;
use crate::shell::HostShell;

pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn engine(&self) -> TesseractEngine {
        TesseractEngine::new(self.config.ocr.tesseract.clone())
    }

    /// Pipeline wired to the real screen and engine
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            Box::new(XcapCapturer),
            Box::new(FilterChain::new(self.config.preprocess.clone())),
            Box::new(self.engine()),
            self.config.ocr.clone(),
        )
    }

    pub fn shell(&self) -> HostShell {
        HostShell::new(self.pipeline(), Box::new(SystemClipboard::default()))
            .with_copy_on_success(self.config.ui.copy_on_success)
    }

    /// Warn about language packs the configured modes need but are not installed
    pub fn check_languages(&self) -> Vec<String> {
        let required = self.config.ocr.languages.required();
        match self.engine().missing_languages(&required) {
            Ok(missing) => {
                if !missing.is_empty() {
                    tracing::warn!("Missing language packs: {}", missing.join(", "));
                }
                missing
            }
            Err(e) => {
                tracing::warn!("Could not list language packs: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use super::*;

    fn config_with_engine(name: &str, listing: &str) -> (Config, PathBuf) {
        let dir = std::env::temp_dir().join(format!("ocrgrab-state-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("tesseract");
        std::fs::write(&script, format!("#!/bin/sh\nprintf '{listing}'\n")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = Config::default();
        config.ocr.tesseract.command = script;
        (config, dir)
    }

    #[test]
    fn reports_packs_modes_need() {
        let (mut config, dir) = config_with_engine("missing", "List of available languages (2):\\neng\\nosd\\n");
        config.ocr.languages.kannada = "kan+eng".to_string();

        let missing = AppState::new(config).check_languages();
        let _ = std::fs::remove_dir_all(dir);

        assert_eq!(missing, ["kan"]);
    }

    #[test]
    fn unreachable_engine_is_only_a_warning() {
        let mut config = Config::default();
        config.ocr.tesseract.command = PathBuf::from("/nonexistent/ocrgrab-state/tesseract");

        assert!(AppState::new(config).check_languages().is_empty());
    }
}
