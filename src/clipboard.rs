//! System clipboard access
//!
//! Uses `arboard` crate for cross-platform support (Windows, macOS, Linux).
//! One handle is kept for the life of the process: on X11/Wayland the
//! contents we set are only served while a handle is alive. If the handle
//! fails it is dropped and recreated on the next call.

use anyhow::{Context, Result};

/// The paste/copy capability the clip state machine needs
pub trait Clipboard {
    /// Current clipboard text, `None` when empty or unreadable
    fn paste(&mut self) -> Option<String>;

    /// Replace the clipboard text
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by the OS via `arboard`
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        if self.handle.is_none() {
            self.handle = Some(arboard::Clipboard::new().context("Failed to access clipboard")?);
        }
        self.handle.as_mut().context("Clipboard unavailable")
    }
}

impl Clipboard for SystemClipboard {
    fn paste(&mut self) -> Option<String> {
        let handle = match self.handle() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::trace!("Clipboard read skipped: {:#}", e);
                return None;
            }
        };
        match handle.get_text() {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) | Err(arboard::Error::ContentNotAvailable) => None,
            Err(e) => {
                tracing::debug!("Clipboard read failed, reopening: {}", e);
                self.handle = None;
                None
            }
        }
    }

    fn copy(&mut self, text: &str) -> Result<()> {
        let result = self
            .handle()?
            .set_text(text)
            .context("Failed to set clipboard text");
        if result.is_err() {
            self.handle = None;
        }
        result
    }
}

/// In-memory clipboard for driving the state machine in tests
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: std::rc::Rc<std::cell::RefCell<Option<String>>>,
    pub copies: std::rc::Rc<std::cell::Cell<usize>>,
    pub fail_copy: bool,
}

#[cfg(test)]
impl MemoryClipboard {
    /// Simulate another application putting `text` on the clipboard
    pub fn set_external(&self, text: &str) {
        *self.contents.borrow_mut() = Some(text.to_string());
    }

    pub fn current(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

#[cfg(test)]
impl Clipboard for MemoryClipboard {
    fn paste(&mut self) -> Option<String> {
        self.contents.borrow().clone().filter(|s| !s.is_empty())
    }

    fn copy(&mut self, text: &str) -> Result<()> {
        if self.fail_copy {
            anyhow::bail!("clipboard locked");
        }
        self.copies.set(self.copies.get() + 1);
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
