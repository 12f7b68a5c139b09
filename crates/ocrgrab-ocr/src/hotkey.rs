use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};

/// Owns one registered global shortcut and unregisters it on drop
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl HotkeyManager {
    /// Register a shortcut written like `Ctrl+Shift+S`
    pub fn new(spec: &str) -> Result<Self> {
        let hotkey = parse_hotkey(spec)?;
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        manager
            .register(hotkey)
            .with_context(|| format!("Failed to register hotkey {spec}"))?;

        tracing::info!("Registered hotkey {}", spec);
        Ok(Self { manager, hotkey })
    }

    /// Check if hotkey was pressed (non-blocking)
    pub fn poll(&self) -> bool {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.try_recv() {
            if event.id != self.hotkey.id() {
                tracing::trace!("Ignoring hotkey event {:?}", event.id);
                continue;
            }
            if event.state == HotKeyState::Pressed {
                return true;
            }
        }
        false
    }

    /// Wait up to `timeout` for a press
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let receiver = GlobalHotKeyEvent::receiver();
        match receiver.recv_timeout(timeout) {
            Ok(event) => event.id == self.hotkey.id() && event.state == HotKeyState::Pressed,
            Err(_) => false,
        }
    }

    pub fn id(&self) -> u32 {
        self.hotkey.id()
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        let _ = self.manager.unregister(self.hotkey);
    }
}

fn parse_hotkey(spec: &str) -> Result<HotKey> {
    let normalized: String = spec.split('+').map(str::trim).collect::<Vec<_>>().join("+");
    if normalized.is_empty() {
        return Err(anyhow!("hotkey is empty"));
    }
    normalized
        .parse::<HotKey>()
        .map_err(|e| anyhow!("invalid hotkey '{spec}': {e}"))
}

#[cfg(test)]
mod tests {
    use global_hotkey::hotkey::{Code, Modifiers};

    use super::*;

    #[test]
    fn parses_default_shortcut() {
        let hotkey = parse_hotkey("Ctrl+Shift+S").unwrap();

        assert_eq!(hotkey, HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyS));
    }

    #[test]
    fn tolerates_spaces() {
        let hotkey = parse_hotkey(" ctrl + alt + F9 ").unwrap();

        assert_eq!(hotkey, HotKey::new(Some(Modifiers::CONTROL | Modifiers::ALT), Code::F9));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hotkey("").is_err());
        assert!(parse_hotkey("Ctrl+Shift+NotAKey").is_err());
    }
}
