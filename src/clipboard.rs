//! Clipboard access.
//!
//! The clipboard is a process-wide shared resource, so it is injected into the
//! dispatcher (and the reference host) as a handle rather than reached for
//! globally. [`MemoryClipboard`] clones share one buffer; [`SystemClipboard`]
//! talks to the OS clipboard through `arboard`.

use std::cell::RefCell;
use std::rc::Rc;

/// Read/write access to clipboard text.
pub trait Clipboard {
    /// Current clipboard text, `None` when empty or unavailable.
    fn get_text(&mut self) -> Option<String>;

    fn set_text(&mut self, text: &str);
}

/// In-process clipboard. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        let clipboard = Self::new();
        clipboard.text.replace(Some(text.to_string()));
        clipboard
    }

    /// Peek without requiring `&mut`
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.text()
    }

    fn set_text(&mut self, text: &str) {
        self.text.replace(Some(text.to_string()));
    }
}

/// OS clipboard. Platform errors are logged and treated as an empty clipboard.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                tracing::warn!("System clipboard unavailable: {}", e);
                None
            }
        };
        Self { inner }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("available", &self.is_available())
            .finish()
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        let clipboard = self.inner.as_mut()?;
        match clipboard.get_text() {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("Clipboard read failed: {}", e);
                None
            }
        }
    }

    fn set_text(&mut self, text: &str) {
        let Some(clipboard) = self.inner.as_mut() else {
            return;
        };
        if let Err(e) = clipboard.set_text(text.to_string()) {
            tracing::warn!("Clipboard write failed: {}", e);
        }
    }
}
