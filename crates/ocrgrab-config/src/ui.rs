use serde::{Deserialize, Serialize};

fn default_hotkey() -> String {
    "Ctrl+Shift+S".to_string()
}

fn default_overlay_alpha() -> u8 {
    100
}

fn default_outline_width() -> u32 {
    2
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    /// Copy recognized text to the clipboard without asking
    #[serde(default)]
    pub copy_on_success: bool,
    /// Opacity of the dimming layer drawn over the screen while selecting
    #[serde(default = "default_overlay_alpha")]
    pub overlay_alpha: u8,
    #[serde(default = "default_outline_width")]
    pub outline_width: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            copy_on_success: false,
            overlay_alpha: default_overlay_alpha(),
            outline_width: default_outline_width(),
        }
    }
}
