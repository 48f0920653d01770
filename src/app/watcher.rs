//! Clipboard watcher
//!
//! Polled once per loop iteration. New external clipboard text is
//! normalized, optionally run through the capture hook, and pushed onto the
//! front of the capture history. Text the app wrote itself is recognized via
//! `last_seen` and ignored.

use super::{ActiveList, App};
use crate::clip::TrimPolicy;
use crate::transform::Surface;

impl App {
    /// Check the clipboard for new content. Returns true if a clip was captured.
    pub fn poll_clipboard(&mut self, surface: &mut dyn Surface) -> bool {
        let Some(raw) = self.clipboard.paste() else {
            return false;
        };
        if raw.is_empty() || raw == self.last_seen {
            return false;
        }

        let mut clip = self.normalizer.apply(raw.clone(), TrimPolicy::Normalize);
        if let Some(hook) = self.capture_hook.clone() {
            if let Some(hooked) = self.transforms.run(&hook, &clip, surface) {
                clip = hooked;
            }
        }

        if clip != raw {
            match self.clipboard.copy(&clip) {
                Ok(()) => self.last_seen = clip.clone(),
                Err(e) => {
                    tracing::warn!("Could not write normalized clip back: {:#}", e);
                    // Still the raw text on the clipboard; don't capture it again
                    self.last_seen = raw;
                }
            }
        } else {
            self.last_seen = raw;
        }

        if self.active == ActiveList::Saved {
            self.toggle();
        }

        tracing::debug!("Captured clip ({} chars)", clip.chars().count());
        self.capture.push_front(clip);
        self.view.reset();
        self.needs_redraw = true;
        true
    }
}
