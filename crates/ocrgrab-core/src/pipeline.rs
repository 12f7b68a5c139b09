use std::time::Instant;

use ocrgrab_config::ocr::OcrConfig;
use ocrgrab_types::{OcrMode, ScreenRect};

use crate::capture::ScreenCapturer;
use crate::error::{CaptureError, PipelineError};
use crate::preprocess::Preprocessor;
use crate::raster::RasterImage;
use crate::recognize::{RecognizeOptions, Recognizer};

/// What the host shell gets back from one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    Text(String),
    /// The engine ran fine but found nothing
    Empty,
    Failed(String),
}

impl OcrOutcome {
    pub fn from_result(result: Result<String, PipelineError>) -> Self {
        match result {
            Ok(text) if text.trim().is_empty() => OcrOutcome::Empty,
            Ok(text) => OcrOutcome::Text(text),
            Err(e) => OcrOutcome::Failed(e.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, OcrOutcome::Failed(_))
    }

    /// Text for the result pane
    pub fn display_text(&self) -> String {
        match self {
            OcrOutcome::Text(text) => text.clone(),
            OcrOutcome::Empty => String::new(),
            OcrOutcome::Failed(message) => format!("Error: {message}"),
        }
    }

    /// One-line status for the label above the result pane
    pub fn status(&self) -> String {
        match self {
            OcrOutcome::Text(_) => "Text extracted! Select and copy what you need.".to_string(),
            OcrOutcome::Empty => "No text found".to_string(),
            OcrOutcome::Failed(message) => format!("Error: {message}"),
        }
    }
}

/// Capture -> preprocess -> recognize, each stage run once per call
pub struct Pipeline {
    capturer: Box<dyn ScreenCapturer>,
    preprocessor: Box<dyn Preprocessor>,
    recognizer: Box<dyn Recognizer>,
    config: OcrConfig,
}

impl Pipeline {
    pub fn new(
        capturer: Box<dyn ScreenCapturer>,
        preprocessor: Box<dyn Preprocessor>,
        recognizer: Box<dyn Recognizer>,
        config: OcrConfig,
    ) -> Self {
        Self {
            capturer,
            preprocessor,
            recognizer,
            config,
        }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    pub fn screen_bounds(&self) -> Result<ScreenRect, CaptureError> {
        self.capturer.screen_bounds()
    }

    /// Preprocess and recognize an image that is already in hand.
    pub fn run_pipeline(&self, image: &RasterImage, mode: OcrMode) -> OcrOutcome {
        OcrOutcome::from_result(self.try_run(image, mode))
    }

    pub fn capture_and_recognize(&self, rect: ScreenRect, mode: OcrMode) -> OcrOutcome {
        OcrOutcome::from_result(self.try_capture_and_recognize(rect, mode))
    }

    pub fn try_capture_and_recognize(&self, rect: ScreenRect, mode: OcrMode) -> Result<String, PipelineError> {
        if rect.is_empty() {
            return Err(CaptureError::EmptyRegion(rect).into());
        }

        let start = Instant::now();
        let image = self.capturer.capture(rect)?;
        tracing::debug!("captured {} in {:?}", rect, start.elapsed());

        self.try_run(&image, mode)
    }

    pub fn try_run(&self, image: &RasterImage, mode: OcrMode) -> Result<String, PipelineError> {
        let prepared = self.preprocessor.process(image, mode)?;
        let options = RecognizeOptions::for_mode(mode, &self.config);

        let start = Instant::now();
        let text = self.recognizer.recognize(&prepared, &options)?;
        tracing::debug!(
            "recognized {} chars ({}, lang {}) in {:?}",
            text.len(),
            mode,
            options.language,
            start.elapsed()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use image::{GrayImage, Luma, Rgb, RgbImage};

    use super::*;
    use crate::error::RecognitionError;
    use crate::preprocess::FilterChain;

    struct FakeScreen {
        calls: Rc<Cell<usize>>,
    }

    impl ScreenCapturer for FakeScreen {
        fn capture(&self, rect: ScreenRect) -> Result<RasterImage, CaptureError> {
            self.calls.set(self.calls.get() + 1);
            Ok(RasterImage::Rgb(RgbImage::from_pixel(rect.width, rect.height, Rgb([255, 255, 255]))))
        }

        fn screen_bounds(&self) -> Result<ScreenRect, CaptureError> {
            Ok(ScreenRect::new(0, 0, 800, 600))
        }
    }

    /// Reads nothing from white images; `missing_pack` makes every call fail
    struct FakeEngine {
        missing_pack: Option<&'static str>,
        seen: Rc<RefCell<Vec<(RecognizeOptions, u8)>>>,
    }

    impl Recognizer for FakeEngine {
        fn recognize(&self, image: &RasterImage, options: &RecognizeOptions) -> Result<String, RecognitionError> {
            self.seen.borrow_mut().push((options.clone(), image.channels()));
            if let Some(lang) = self.missing_pack {
                return Err(RecognitionError::LanguagePackMissing(lang.to_string()));
            }
            let dark = image.to_luma().pixels().any(|p| p[0] < 128);
            Ok(if dark { "hello\n".to_string() } else { String::new() })
        }
    }

    struct Harness {
        pipeline: Pipeline,
        captures: Rc<Cell<usize>>,
        seen: Rc<RefCell<Vec<(RecognizeOptions, u8)>>>,
    }

    fn harness(missing_pack: Option<&'static str>) -> Harness {
        let captures = Rc::new(Cell::new(0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let pipeline = Pipeline::new(
            Box::new(FakeScreen {
                calls: captures.clone(),
            }),
            Box::new(FilterChain::default()),
            Box::new(FakeEngine {
                missing_pack,
                seen: seen.clone(),
            }),
            OcrConfig::default(),
        );
        Harness {
            pipeline,
            captures,
            seen,
        }
    }

    #[test]
    fn zero_area_never_reaches_capturer() {
        let h = harness(None);

        let outcome = h.pipeline.capture_and_recognize(ScreenRect::new(10, 10, 0, 50), OcrMode::Printed);

        assert!(outcome.is_failure());
        assert_eq!(h.captures.get(), 0);
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn kannada_on_blank_white_is_empty_not_error() {
        let h = harness(None);

        let outcome = h.pipeline.capture_and_recognize(ScreenRect::new(0, 0, 40, 20), OcrMode::Kannada);

        assert_eq!(outcome, OcrOutcome::Empty);
        assert_eq!(outcome.status(), "No text found");
        assert_eq!(h.captures.get(), 1);
        assert_eq!(h.seen.borrow()[0].0.language, "kan");
    }

    #[test]
    fn engine_failure_becomes_message() {
        let h = harness(Some("kan"));

        let outcome = h.pipeline.capture_and_recognize(ScreenRect::new(0, 0, 40, 20), OcrMode::Kannada);

        match &outcome {
            OcrOutcome::Failed(message) => {
                assert!(message.starts_with("recognition failed"));
                assert!(message.contains("'kan'"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(outcome.display_text().starts_with("Error: "));
    }

    #[test]
    fn handwriting_passes_binary_image_and_engine_flags() {
        let h = harness(None);
        let page = RasterImage::Gray(GrayImage::from_fn(48, 32, |x, y| {
            Luma([if y == 16 && x > 4 && x < 40 { 30 } else { 200 }])
        }));

        let outcome = h.pipeline.run_pipeline(&page, OcrMode::Handwriting);

        assert_eq!(outcome, OcrOutcome::Text("hello\n".to_string()));
        let seen = h.seen.borrow();
        let (options, channels) = &seen[0];
        assert_eq!(*channels, 1);
        assert_eq!(options.engine_mode, Some(crate::EngineMode::LstmOnly));
        assert_eq!(options.page_segmentation, Some(crate::PageSegMode::SingleBlock));
    }

    #[test]
    fn printed_sends_capture_untouched() {
        let h = harness(None);

        h.pipeline.capture_and_recognize(ScreenRect::new(5, 5, 10, 10), OcrMode::Printed);

        let seen = h.seen.borrow();
        assert_eq!(seen[0].1, 3);
        assert_eq!(seen[0].0.engine_mode, None);
    }
}
