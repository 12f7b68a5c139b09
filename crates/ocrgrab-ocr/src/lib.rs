mod capture;
mod hotkey;
mod tesseract;

pub use capture::{MonitorInfo, XcapCapturer, capture_full_screen, list_monitors};
pub use hotkey::HotkeyManager;
pub use tesseract::TesseractEngine;
