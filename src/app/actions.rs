//! Actions and the state transitions they perform
//!
//! Every key binding resolves to one [`Action`]. Control actions touch only
//! the lists and view state; transform actions run an external program on
//! the selected clip and write the result back.

use super::{ActiveList, App};
use crate::transform::{Surface, Transform};

/// Cursor movement for [`Action::Navigate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward older clips
    Up,
    /// Toward newer clips
    Down,
    /// Pan the selected clip left by a screen width
    Left,
    /// Pan the selected clip right by a screen width
    Right,
}

/// Reordering direction for [`Action::Move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

/// Everything a key can be bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(Direction),
    Toggle,
    Delete,
    Move(Vertical),
    Quit,
    Transform(Transform),
}

impl Action {
    /// Config-file name of a control action
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "up" => Action::Navigate(Direction::Up),
            "down" => Action::Navigate(Direction::Down),
            "scroll_left" | "left" => Action::Navigate(Direction::Left),
            "scroll_right" | "right" => Action::Navigate(Direction::Right),
            "toggle" | "toggle_saved" => Action::Toggle,
            "delete" | "delete_clip" => Action::Delete,
            "move_up" => Action::Move(Vertical::Up),
            "move_down" => Action::Move(Vertical::Down),
            "quit" => Action::Quit,
            "editor" | "call_editor" => Action::Transform(Transform::editor()),
            _ => return None,
        };
        Some(action)
    }

    /// Short description for `config --show`
    pub fn describe(&self) -> String {
        match self {
            Action::Navigate(Direction::Up) => "up".into(),
            Action::Navigate(Direction::Down) => "down".into(),
            Action::Navigate(Direction::Left) => "scroll_left".into(),
            Action::Navigate(Direction::Right) => "scroll_right".into(),
            Action::Toggle => "toggle".into(),
            Action::Delete => "delete".into(),
            Action::Move(Vertical::Up) => "move_up".into(),
            Action::Move(Vertical::Down) => "move_down".into(),
            Action::Quit => "quit".into(),
            Action::Transform(t) => crate::config::transform_to_toml(t),
        }
    }
}

impl App {
    /// Run the action bound to `key`. Unbound keys do nothing.
    pub fn dispatch(&mut self, key: &super::KeyChord, surface: &mut dyn Surface) {
        let Some(action) = self.keys.resolve(key).cloned() else {
            return;
        };
        tracing::trace!("{} -> {:?}", key, action);
        self.perform(action, surface);
    }

    pub fn perform(&mut self, action: Action, surface: &mut dyn Surface) {
        match action {
            Action::Navigate(Direction::Up) => self.up(),
            Action::Navigate(Direction::Down) => self.down(),
            Action::Navigate(Direction::Left) => self.scroll_left(),
            Action::Navigate(Direction::Right) => self.scroll_right(),
            Action::Toggle => self.toggle(),
            Action::Delete => self.delete(),
            Action::Move(Vertical::Up) => self.move_up(),
            Action::Move(Vertical::Down) => self.move_down(),
            Action::Quit => self.request_quit(),
            Action::Transform(transform) => self.apply_transform(&transform, surface),
        }
    }

    /// Select the next older clip and put it on the clipboard
    pub fn up(&mut self) {
        if self.view.selected + 1 >= self.active_list().len() {
            return;
        }
        self.view.selected += 1;
        let rows = self.visible_rows();
        if self.view.selected >= self.view.bottom + rows {
            self.view.bottom += 1;
        }
        self.copy_selected();
        self.view.h_offset = 0;
        self.needs_redraw = true;
    }

    /// Select the next newer clip and put it on the clipboard
    pub fn down(&mut self) {
        if self.view.selected == 0 {
            return;
        }
        self.view.selected -= 1;
        if self.view.selected < self.view.bottom {
            self.view.bottom = self.view.selected;
        }
        self.copy_selected();
        self.view.h_offset = 0;
        self.needs_redraw = true;
    }

    pub fn scroll_left(&mut self) {
        self.view.scroll_left();
        self.needs_redraw = true;
    }

    pub fn scroll_right(&mut self) {
        let len = self.selected_clip().chars().count();
        self.view.scroll_right(len);
        self.needs_redraw = true;
    }

    /// Switch between the capture history and the saved list
    ///
    /// Leaving the saved list writes it out. Entering it seeds the staging
    /// slot (saved[0]) with a copy of the selected capture.
    pub fn toggle(&mut self) {
        match self.active {
            ActiveList::Saved => {
                self.persist_saved();
                self.active = ActiveList::Capture;
            }
            ActiveList::Capture => {
                let seed = self.capture.get(self.view.selected).to_string();
                self.saved.set(0, seed);
                self.staging_used = false;
                self.active = ActiveList::Saved;
            }
        }
        self.view.reset();
        tracing::debug!("Showing {:?} list", self.active);
        self.needs_redraw = true;
    }

    /// Bubble the selected saved clip one place older
    ///
    /// From the staging slot the first press inserts a blank slot in front,
    /// which leaves the staged clip at index 1 as a regular saved entry.
    pub fn move_up(&mut self) {
        if self.active == ActiveList::Capture {
            return;
        }
        let selected = self.view.selected;
        if selected == 0 && !self.staging_used {
            self.saved.insert(0, String::new());
            self.view.selected = 1;
            self.staging_used = true;
        } else if selected + 1 < self.saved.len() {
            self.saved.swap(selected, selected + 1);
            self.view.selected += 1;
        } else {
            return;
        }
        self.follow_selection();
        self.needs_redraw = true;
    }

    /// Bubble the selected saved clip one place newer
    pub fn move_down(&mut self) {
        if self.active == ActiveList::Capture || self.view.selected == 0 {
            return;
        }
        let selected = self.view.selected;
        self.saved.swap(selected, selected - 1);
        self.view.selected -= 1;
        self.follow_selection();
        self.needs_redraw = true;
    }

    /// Delete the selected clip
    ///
    /// The last remaining clip and the saved list's staging slot are blanked
    /// in place instead of removed.
    pub fn delete(&mut self) {
        let selected = self.view.selected;
        let removable = self.active_list().len() > 1
            && (self.active == ActiveList::Capture || selected != 0);

        let list = self.active_list_mut();
        if removable {
            list.remove(selected);
            let last = list.len() - 1;
            self.view.selected = selected.min(last);
        } else {
            list.set(selected, String::new());
        }
        self.view.h_offset = 0;
        self.follow_selection();
        self.needs_redraw = true;
    }

    /// Replace the selected clip with the transform's output
    pub fn apply_transform(&mut self, transform: &Transform, surface: &mut dyn Surface) {
        let clip = self.selected_clip().to_string();
        let Some(text) = self.transforms.run(transform, &clip, surface) else {
            // The display may have been suspended even when nothing changed
            self.needs_redraw = true;
            return;
        };

        let selected = self.view.selected;
        self.active_list_mut().set(selected, text.clone());
        self.copy_to_clipboard(&text);
        self.view.h_offset = 0;
        self.needs_redraw = true;
    }

    fn copy_selected(&mut self) {
        let text = self.selected_clip().to_string();
        self.copy_to_clipboard(&text);
    }

    /// Put `text` on the clipboard and remember it so the watcher skips it
    pub(super) fn copy_to_clipboard(&mut self, text: &str) {
        match self.clipboard.copy(text) {
            Ok(()) => self.last_seen = text.to_string(),
            Err(e) => tracing::warn!("Clipboard write failed: {:#}", e),
        }
    }

    fn follow_selection(&mut self) {
        let rows = self.visible_rows();
        self.view.follow_selection(rows);
    }
}
