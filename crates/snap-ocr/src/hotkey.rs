use anyhow::{Context, Result};
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};

/// Global shortcut that starts a capture
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl HotkeyManager {
    /// Create a new hotkey manager with Ctrl+Shift+T
    pub fn new() -> Result<Self> {
        Self::with_hotkey(Modifiers::CONTROL | Modifiers::SHIFT, Code::KeyT)
    }

    /// Create with custom hotkey
    pub fn with_hotkey(modifiers: Modifiers, code: Code) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        let hotkey = HotKey::new(Some(modifiers), code);

        manager
            .register(hotkey)
            .context("Failed to register hotkey")?;

        Ok(Self { manager, hotkey })
    }

    /// Check if hotkey was pressed (non-blocking)
    pub fn poll(&self) -> bool {
        let receiver = GlobalHotKeyEvent::receiver();
        match receiver.try_recv() {
            Ok(event) if event.id == self.hotkey.id() => event.state == HotKeyState::Pressed,
            Ok(event) => {
                tracing::debug!(
                    "Ignoring hotkey event {:?}, expected {:?}",
                    event.id,
                    self.hotkey.id()
                );
                false
            }
            Err(_) => false,
        }
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        let _ = self.manager.unregister(self.hotkey);
    }
}
