use anyhow::{Context, bail};
use ocrgrab_core::{OcrOutcome, Pipeline, RasterImage, SelectionSession, Step};
use ocrgrab_types::{AppEvent, OcrMode, PointerEvent, ScreenRect};

use crate::clipboard::TextSink;
use crate::status::OcrStatus;

/// Headless stand-in for the window: owns the open selection, the mode and
/// whatever text is on display.
pub struct HostShell {
    pipeline: Pipeline,
    clipboard: Box<dyn TextSink>,
    mode: OcrMode,
    session: Option<SelectionSession>,
    displayed: String,
    last_outcome: Option<OcrOutcome>,
    status: OcrStatus,
    copy_on_success: bool,
}

impl HostShell {
    pub fn new(pipeline: Pipeline, clipboard: Box<dyn TextSink>) -> Self {
        let mode = pipeline.config().default_mode;
        Self {
            pipeline,
            clipboard,
            mode,
            session: None,
            displayed: String::new(),
            last_outcome: None,
            status: OcrStatus::default(),
            copy_on_success: false,
        }
    }

    pub fn with_copy_on_success(mut self, copy: bool) -> Self {
        self.copy_on_success = copy;
        self
    }

    pub fn mode(&self) -> OcrMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: OcrMode) {
        tracing::info!("OCR mode set to {}", mode);
        self.mode = mode;
    }

    pub fn displayed_text(&self) -> &str {
        &self.displayed
    }

    pub fn last_outcome(&self) -> Option<&OcrOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn status(&self) -> &OcrStatus {
        &self.status
    }

    pub fn is_selecting(&self) -> bool {
        self.session.is_some()
    }

    pub fn screen_bounds(&self) -> anyhow::Result<ScreenRect> {
        self.pipeline
            .screen_bounds()
            .context("Failed to read screen bounds")
    }

    /// Open a selection over `bounds`, or the primary screen when `None`
    pub fn start_selection(&mut self, bounds: Option<ScreenRect>) -> anyhow::Result<ScreenRect> {
        if self.session.is_some() {
            bail!("a selection is already in progress");
        }

        let bounds = match bounds {
            Some(bounds) => bounds,
            None => self.screen_bounds()?,
        };
        self.session = Some(SelectionSession::start(bounds));
        self.status.current_message = "Drag to select a region".to_string();
        Ok(bounds)
    }

    pub fn on_pointer(&mut self, event: PointerEvent) -> Vec<AppEvent> {
        let Some(session) = self.session.take() else {
            tracing::debug!("Pointer event with no selection open");
            return Vec::new();
        };

        match session.handle(event) {
            Step::Continue(session, rect) => {
                self.session = Some(session);
                rect.map(AppEvent::SelectionChanged).into_iter().collect()
            }
            Step::Finished(Some(rect)) => {
                let mut replies = vec![AppEvent::SelectionClosed(Some(rect))];
                replies.extend(self.on_region_selected(rect));
                replies
            }
            Step::Finished(None) => {
                self.status.current_message = "Selection cancelled".to_string();
                vec![
                    AppEvent::SelectionClosed(None),
                    self.status_event(),
                ]
            }
        }
    }

    /// Capture `rect` with the current mode and put the result on display
    pub fn on_region_selected(&mut self, rect: ScreenRect) -> Vec<AppEvent> {
        tracing::info!("OCR on {} ({})", rect, self.mode);
        self.status.begin_capture();
        let outcome = self.pipeline.capture_and_recognize(rect, self.mode);
        self.show(outcome)
    }

    /// Same as a capture, but for pixels that are already loaded
    pub fn on_image(&mut self, image: &RasterImage) -> Vec<AppEvent> {
        tracing::info!("OCR on {}x{} image ({})", image.width(), image.height(), self.mode);
        self.status.begin_capture();
        let outcome = self.pipeline.run_pipeline(image, self.mode);
        self.show(outcome)
    }

    pub fn copy_text(&mut self) -> anyhow::Result<()> {
        match &self.last_outcome {
            Some(OcrOutcome::Text(text)) => self.clipboard.set_text(text),
            _ => bail!("no recognized text to copy"),
        }
    }

    fn show(&mut self, outcome: OcrOutcome) -> Vec<AppEvent> {
        match &outcome {
            OcrOutcome::Failed(message) => tracing::error!("OCR failed: {}", message),
            OcrOutcome::Empty => tracing::info!("No text found"),
            OcrOutcome::Text(text) => tracing::info!("Recognized {} chars", text.len()),
        }

        self.status.record(&outcome);
        self.displayed = match &outcome {
            OcrOutcome::Empty => "No text found".to_string(),
            other => other.display_text(),
        };
        self.last_outcome = Some(outcome);

        if self.copy_on_success
            && let Err(e) = self.copy_text_if_any()
        {
            tracing::warn!("Auto copy failed: {:#}", e);
        }

        vec![AppEvent::ShowText(self.displayed.clone()), self.status_event()]
    }

    fn copy_text_if_any(&mut self) -> anyhow::Result<()> {
        if matches!(self.last_outcome, Some(OcrOutcome::Text(_))) {
            self.copy_text()?;
        }
        Ok(())
    }

    pub fn status_event(&self) -> AppEvent {
        AppEvent::OcrStatusUpdate {
            status: self.status.current_message.clone(),
            capturing: self.status.capturing,
        }
    }
}
