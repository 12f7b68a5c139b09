use std::path::PathBuf;

use ocrgrab_types::ScreenRect;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("selected region {0} has zero area")]
    EmptyRegion(ScreenRect),

    #[error("region {0} is outside every monitor")]
    OutOfBounds(ScreenRect),

    #[error("no monitor found")]
    NoMonitor,

    /// Message from the platform capture call, unmodified
    #[error("{0}")]
    Platform(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("image has zero width or height")]
    EmptyImage,

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("OCR engine not found at '{}': {source}", command.display())]
    EngineMissing {
        command: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("language pack '{0}' is not installed")]
    LanguagePackMissing(String),

    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("failed to talk to OCR engine: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Any stage failure, tagged with the stage it came from
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("recognition failed: {0}")]
    Recognition(#[from] RecognitionError),
}
