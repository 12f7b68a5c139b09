use ocrgrab_config::ocr::OcrConfig;
use ocrgrab_types::OcrMode;

use crate::error::RecognitionError;
use crate::raster::RasterImage;

/// Which recognizer the engine runs internally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Legacy,
    /// Neural (LSTM) recognizer only
    LstmOnly,
    LegacyAndLstm,
    Default,
}

impl EngineMode {
    pub fn code(&self) -> u8 {
        match self {
            EngineMode::Legacy => 0,
            EngineMode::LstmOnly => 1,
            EngineMode::LegacyAndLstm => 2,
            EngineMode::Default => 3,
        }
    }
}

/// Layout the engine should expect on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegMode {
    Auto,
    SingleColumn,
    /// One uniform block of text
    SingleBlock,
    SingleLine,
    SingleWord,
    SparseText,
}

impl PageSegMode {
    pub fn code(&self) -> u8 {
        match self {
            PageSegMode::Auto => 3,
            PageSegMode::SingleColumn => 4,
            PageSegMode::SingleBlock => 6,
            PageSegMode::SingleLine => 7,
            PageSegMode::SingleWord => 8,
            PageSegMode::SparseText => 11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizeOptions {
    /// Language pack identifier, `+`-joined for several
    pub language: String,
    pub engine_mode: Option<EngineMode>,
    pub page_segmentation: Option<PageSegMode>,
    pub dpi: Option<u32>,
}

impl RecognizeOptions {
    pub fn for_mode(mode: OcrMode, config: &OcrConfig) -> Self {
        let language = config.languages.for_mode(mode).to_string();
        let (engine_mode, page_segmentation) = match mode {
            OcrMode::Printed | OcrMode::Kannada => (None, None),
            // Handwritten captures are usually one paragraph or line
            OcrMode::Handwriting => (Some(EngineMode::LstmOnly), Some(PageSegMode::SingleBlock)),
        };

        Self {
            language,
            engine_mode,
            page_segmentation,
            dpi: config.dpi,
        }
    }
}

/// Text extraction backend
pub trait Recognizer {
    fn recognize(&self, image: &RasterImage, options: &RecognizeOptions) -> Result<String, RecognitionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printed_uses_engine_defaults() {
        let options = RecognizeOptions::for_mode(OcrMode::Printed, &OcrConfig::default());

        assert_eq!(options.language, "eng");
        assert_eq!(options.engine_mode, None);
        assert_eq!(options.page_segmentation, None);
    }

    #[test]
    fn handwriting_forces_lstm_single_block() {
        let options = RecognizeOptions::for_mode(OcrMode::Handwriting, &OcrConfig::default());

        assert_eq!(options.engine_mode.map(|m| m.code()), Some(1));
        assert_eq!(options.page_segmentation.map(|m| m.code()), Some(6));
    }

    #[test]
    fn kannada_selects_script_pack() {
        let mut config = OcrConfig::default();
        config.dpi = Some(300);
        let options = RecognizeOptions::for_mode(OcrMode::Kannada, &config);

        assert_eq!(options.language, "kan");
        assert_eq!(options.dpi, Some(300));
        assert_eq!(options.engine_mode, None);
    }
}
