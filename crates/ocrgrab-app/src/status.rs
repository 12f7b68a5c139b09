use std::time::SystemTime;

use ocrgrab_core::OcrOutcome;

/// OCR status information
#[derive(Clone, Debug, Default)]
pub struct OcrStatus {
    pub capturing: bool,
    pub last_capture_time: Option<SystemTime>,
    pub capture_count: u64,
    pub empty_count: u64,
    pub error_count: u64,
    pub current_message: String,
}

impl OcrStatus {
    pub fn begin_capture(&mut self) {
        self.capturing = true;
        self.current_message = "Capturing...".to_string();
    }

    pub fn record(&mut self, outcome: &OcrOutcome) {
        self.capturing = false;
        self.last_capture_time = Some(SystemTime::now());
        self.capture_count += 1;
        match outcome {
            OcrOutcome::Text(_) => {}
            OcrOutcome::Empty => self.empty_count += 1,
            OcrOutcome::Failed(_) => self.error_count += 1,
        }
        self.current_message = outcome.status();
    }
}
