//! Shell and event flow tests against a fake screen and engine

use std::cell::RefCell;
use std::rc::Rc;

use image::{Rgb, RgbImage};
use ocrgrab_config::ocr::OcrConfig;
use ocrgrab_core::{
    CaptureError, FilterChain, Pipeline, RasterImage, RecognitionError, RecognizeOptions, Recognizer, ScreenCapturer,
};
use ocrgrab_types::ScreenRect;

use crate::clipboard::TextSink;
use crate::shell::HostShell;


/// White screen; with `text` set every capture has a black line across it
struct FakeScreen {
    text: bool,
    captures: Rc<RefCell<Vec<ScreenRect>>>,
}

impl ScreenCapturer for FakeScreen {
    fn capture(&self, rect: ScreenRect) -> Result<RasterImage, CaptureError> {
        self.captures.borrow_mut().push(rect);
        let middle = rect.height / 2;
        let text = self.text;
        Ok(RasterImage::Rgb(RgbImage::from_fn(rect.width, rect.height, |_, y| {
            if text && y == middle {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })))
    }

    fn screen_bounds(&self) -> Result<ScreenRect, CaptureError> {
        Ok(ScreenRect::new(0, 0, 1920, 1080))
    }
}

/// "Hello world" for any dark pixel, nothing for blank input
struct FakeEngine {
    fails: bool,
    languages: Rc<RefCell<Vec<String>>>,
}

impl Recognizer for FakeEngine {
    fn recognize(&self, image: &RasterImage, options: &RecognizeOptions) -> Result<String, RecognitionError> {
        self.languages.borrow_mut().push(options.language.clone());
        if self.fails {
            return Err(RecognitionError::Engine("engine crashed".to_string()));
        }
        let dark = image.to_luma().pixels().any(|p| p[0] < 128);
        Ok(if dark { "Hello world".to_string() } else { " \n".to_string() })
    }
}

struct FakeClipboard {
    copied: Rc<RefCell<Vec<String>>>,
}

impl TextSink for FakeClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

pub(crate) struct Fixture {
    pub shell: HostShell,
    pub captures: Rc<RefCell<Vec<ScreenRect>>>,
    pub languages: Rc<RefCell<Vec<String>>>,
    pub copied: Rc<RefCell<Vec<String>>>,
}

pub(crate) fn fixture_with(text_on_screen: bool, engine_fails: bool, config: OcrConfig) -> Fixture {
    let captures = Rc::new(RefCell::new(Vec::new()));
    let languages = Rc::new(RefCell::new(Vec::new()));
    let copied = Rc::new(RefCell::new(Vec::new()));

    let pipeline = Pipeline::new(
        Box::new(FakeScreen {
            text: text_on_screen,
            captures: captures.clone(),
        }),
        Box::new(FilterChain::default()),
        Box::new(FakeEngine {
            fails: engine_fails,
            languages: languages.clone(),
        }),
        config,
    );
    let shell = HostShell::new(
        pipeline,
        Box::new(FakeClipboard {
            copied: copied.clone(),
        }),
    );

    Fixture {
        shell,
        captures,
        languages,
        copied,
    }
}

pub(crate) fn fixture() -> Fixture {
    fixture_with(true, false, OcrConfig::default())
}
