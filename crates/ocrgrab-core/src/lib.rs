pub mod capture;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod preprocess;
pub mod raster;
pub mod recognize;
pub mod selector;

pub use capture::ScreenCapturer;
pub use error::{CaptureError, PipelineError, PreprocessError, RecognitionError};
pub use overlay::{OverlayStyle, render_overlay};
pub use pipeline::{OcrOutcome, Pipeline};
pub use preprocess::{FilterChain, Preprocessor};
pub use raster::RasterImage;
pub use recognize::{EngineMode, PageSegMode, RecognizeOptions, Recognizer};
pub use selector::{SelectionSession, SelectorState, Step};
