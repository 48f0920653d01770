// Resize coordination
//
// A terminal resize shows up twice: as SIGWINCH (caught via signal-hook into
// an atomic flag) and as crossterm's `Event::Resize` in the input queue.
// Only one of them may be applied per resize. The signal is checked first
// each loop iteration; when it wins, the size it applied is latched and the
// matching input event is swallowed, which clears the latch. An input event
// for a different size is a new resize and is applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Decides which resize notifications to act on
#[derive(Debug, Default)]
pub struct ResizeCoordinator {
    /// Set asynchronously by the SIGWINCH handler
    signal: Arc<AtomicBool>,

    /// Size applied from the signal path whose input event hasn't arrived yet
    latched: Option<(u16, u16)>,
}

impl ResizeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag to hand to the signal handler
    pub fn signal_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.signal)
    }

    /// Consume a pending signal. `size` is queried only when one fired.
    ///
    /// Returns the size to apply.
    pub fn poll_signal(&mut self, size: impl FnOnce() -> Option<(u16, u16)>) -> Option<(u16, u16)> {
        if !self.signal.swap(false, Ordering::SeqCst) {
            return None;
        }
        let size = size()?;
        self.latched = Some(size);
        Some(size)
    }

    /// An `Event::Resize(width, height)` came out of the input queue
    ///
    /// Returns the size to apply, or `None` when the signal path already did.
    pub fn on_resize_event(&mut self, width: u16, height: u16) -> Option<(u16, u16)> {
        match self.latched.take() {
            Some(size) if size == (width, height) => None,
            _ => Some((width, height)),
        }
    }

    #[cfg(test)]
    fn is_latched(&self) -> bool {
        self.latched.is_some()
    }
}
