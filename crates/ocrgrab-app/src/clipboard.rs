use anyhow::Context;
use arboard::Clipboard;

/// Where copied text ends up
pub trait TextSink {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// System clipboard, opened on first use so headless runs never touch it
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl TextSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().context("Failed to open clipboard")?,
        };
        let result = clipboard
            .set_text(text.to_string())
            .context("Failed to write clipboard");
        self.clipboard = Some(clipboard);
        result
    }
}
