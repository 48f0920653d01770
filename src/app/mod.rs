// Application state - the clip history state machine
//
// `App` owns both clip lists, the view state, the key table and the
// collaborators (clipboard, transform runner, stores). The main loop holds
// the only instance and feeds it keys, resizes and clipboard polls; nothing
// here touches the terminal directly, so the whole machine runs in tests
// against an in-memory clipboard.

pub mod actions;
pub mod keys;
pub mod resize;
pub mod view;
mod watcher;


pub use actions::{Action, Direction, Vertical};
pub use keys::{KeyChord, KeyDispatcher};
pub use resize::ResizeCoordinator;
pub use view::ViewState;

use crate::clip::{ClipList, Normalizer};
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::storage::ClipStore;
use crate::transform::{Transform, TransformRunner};

/// Header line shown above the saved list
pub const SAVED_HEADER: &str = "Saved Clippings";

/// Which list is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveList {
    #[default]
    Capture,
    Saved,
}

/// Main application state
pub struct App {
    /// Rolling history, newest first, bounded
    capture: ClipList,

    /// User-curated list; index 0 is the staging slot
    saved: ClipList,

    active: ActiveList,

    /// Selection, viewport and pan of the active list
    pub view: ViewState,

    /// Whether move_up already opened the staging slot this visit
    staging_used: bool,

    /// Last clipboard text we saw or wrote
    last_seen: String,

    keys: KeyDispatcher,
    transforms: TransformRunner,
    normalizer: Normalizer,

    /// Transform applied to every new capture
    capture_hook: Option<Transform>,

    clipboard: Box<dyn Clipboard>,

    saved_store: Option<ClipStore>,
    history_store: Option<ClipStore>,

    should_quit: bool,
    needs_redraw: bool,
}

impl App {
    /// State with the given lists, default keys and no persistence
    pub fn new(capture: ClipList, saved: ClipList, clipboard: Box<dyn Clipboard>) -> Self {
        let last_seen = capture.get(0).to_string();
        Self {
            capture,
            saved,
            active: ActiveList::Capture,
            view: ViewState::default(),
            staging_used: false,
            last_seen,
            keys: KeyDispatcher::with_default_config(),
            transforms: TransformRunner::default(),
            normalizer: Normalizer::default(),
            capture_hook: None,
            clipboard,
            saved_store: None,
            history_store: None,
            should_quit: false,
            needs_redraw: true,
        }
    }

    /// Build from configuration, loading persisted lists
    pub fn from_config(config: &Config, clipboard: Box<dyn Clipboard>) -> Self {
        let saved_store = ClipStore::saved(&config.config_dir);
        let history_store = config
            .persist_history
            .then(|| ClipStore::history(&config.config_dir));

        let saved = ClipList::unbounded(saved_store.load());
        let history = history_store.as_ref().map(ClipStore::load).unwrap_or_default();
        let capture = ClipList::bounded(config.buffer_size, history);
        tracing::info!(
            "Loaded {} saved and {} captured clips",
            saved.len(),
            capture.len()
        );

        let keys = config.key_table();
        tracing::debug!("{} key bindings active", keys.len());

        let normalizer = Normalizer::new(config.leave_crlf);
        let mut app = Self::new(capture, saved, clipboard)
            .with_keys(keys)
            .with_normalizer(normalizer)
            .with_transforms(TransformRunner::new(config.editor.clone(), normalizer))
            .with_capture_hook(config.on_capture.clone())
            .with_saved_store(saved_store);
        app.history_store = history_store;
        app
    }

    pub fn with_keys(mut self, keys: KeyDispatcher) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_transforms(mut self, transforms: TransformRunner) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_capture_hook(mut self, hook: Option<Transform>) -> Self {
        self.capture_hook = hook;
        self
    }

    pub fn with_saved_store(mut self, store: ClipStore) -> Self {
        self.saved_store = Some(store);
        self
    }

    pub fn active(&self) -> ActiveList {
        self.active
    }

    pub fn capture(&self) -> &ClipList {
        &self.capture
    }

    pub fn saved(&self) -> &ClipList {
        &self.saved
    }

    pub fn active_list(&self) -> &ClipList {
        match self.active {
            ActiveList::Capture => &self.capture,
            ActiveList::Saved => &self.saved,
        }
    }

    fn active_list_mut(&mut self) -> &mut ClipList {
        match self.active {
            ActiveList::Capture => &mut self.capture,
            ActiveList::Saved => &mut self.saved,
        }
    }

    pub fn selected_clip(&self) -> &str {
        self.active_list().get(self.view.selected)
    }

    pub fn last_seen(&self) -> &str {
        &self.last_seen
    }

    /// Lines reserved above the list (the saved-list header)
    pub fn header_lines(&self) -> usize {
        match self.active {
            ActiveList::Capture => 0,
            ActiveList::Saved => 1,
        }
    }

    /// Lines available for clips
    pub fn visible_rows(&self) -> usize {
        self.view.rows(self.header_lines())
    }

    /// Apply a new terminal size
    pub fn resize(&mut self, width: u16, height: u16) {
        let header = self.header_lines();
        self.view.resize(width as usize, height as usize, header);
        self.needs_redraw = true;
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether a redraw is due; clears the flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Write the saved list out
    pub fn persist_saved(&self) {
        if let Some(store) = &self.saved_store {
            store.save(self.saved.as_slice());
        }
    }

    /// Final persistence before exit
    ///
    /// The saved list is written only if it is on screen; leaving it via
    /// toggle already wrote it.
    pub fn shutdown(&mut self) {
        if self.active == ActiveList::Saved {
            self.persist_saved();
        }
        if let Some(store) = &self.history_store {
            store.save(self.capture.as_slice());
        }
        tracing::info!("Shutting down");
    }
}
