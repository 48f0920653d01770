// Key binding table
//
// Maps key chords to actions. Defaults mirror the classic layout
// (e/s/u/d/c plus arrows); the [keys] config table layers on top, and a
// binding of "none" removes a default.

use super::actions::{Action, Direction, Vertical};
use crate::transform::Transform;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::fmt;

/// A key plus the modifiers that matter for binding (Ctrl, Alt)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    /// Build a chord, dropping Shift from characters (the char already says it)
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let mut modifiers =
            modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        if matches!(code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), KeyModifiers::CONTROL)
    }

    /// Parse a key name as written in the config file
    ///
    /// Accepts single characters (`"e"`, `"E"`, `"?"`), named keys (`"up"`,
    /// `"pagedown"`, `"f5"`, `"space"`) and `ctrl-`/`alt-`/`shift-` prefixes
    /// (`"ctrl-c"`, `"alt-up"`).
    pub fn parse(spec: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = spec;
        loop {
            let lower = rest.to_ascii_lowercase();
            let prefix = ["ctrl-", "ctrl+", "alt-", "alt+", "shift-", "shift+"]
                .iter()
                .find(|p| lower.starts_with(*p) && rest.len() > p.len());
            match prefix {
                Some(p) => {
                    modifiers |= match &p[..p.len() - 1] {
                        "ctrl" => KeyModifiers::CONTROL,
                        "alt" => KeyModifiers::ALT,
                        _ => KeyModifiers::SHIFT,
                    };
                    rest = &rest[p.len()..];
                }
                None => break,
            }
        }

        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => {
                if modifiers.contains(KeyModifiers::CONTROL) {
                    KeyCode::Char(c.to_ascii_lowercase())
                } else if modifiers.contains(KeyModifiers::SHIFT) {
                    // Terminals report Shift+a as 'A'
                    KeyCode::Char(c.to_ascii_uppercase())
                } else {
                    KeyCode::Char(c)
                }
            }
            _ => named_key(&rest.to_ascii_lowercase())?,
        };
        Some(Self::new(code, modifiers))
    }
}

fn named_key(name: &str) -> Option<KeyCode> {
    let code = match name {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        f if f.starts_with('f') => {
            KeyCode::F(f[1..].parse().ok().filter(|n| (1..=24).contains(n))?)
        }
        _ => return None,
    };
    Some(code)
}

impl From<KeyEvent> for KeyChord {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "alt-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "shift-")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "f{}", n),
            KeyCode::PageUp => write!(f, "pageup"),
            KeyCode::PageDown => write!(f, "pagedown"),
            KeyCode::BackTab => write!(f, "backtab"),
            other => write!(f, "{}", format!("{:?}", other).to_ascii_lowercase()),
        }
    }
}

/// Registry of key → action bindings
#[derive(Debug, Clone)]
pub struct KeyDispatcher {
    bindings: HashMap<KeyChord, Action>,
}

impl KeyDispatcher {
    /// Empty table
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `action`; `None` removes the binding
    ///
    /// Rebinding an existing key replaces it.
    pub fn register(&mut self, key: KeyChord, action: Option<Action>) {
        match action {
            Some(action) => {
                self.bindings.insert(key, action);
            }
            None => {
                self.bindings.remove(&key);
            }
        }
    }

    /// Look up the action for `key`
    pub fn resolve(&self, key: &KeyChord) -> Option<&Action> {
        self.bindings.get(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Bindings sorted by key name, for display
    pub fn sorted(&self) -> Vec<(KeyChord, &Action)> {
        let mut all: Vec<_> = self.bindings.iter().map(|(k, a)| (*k, a)).collect();
        all.sort_by_key(|(k, _)| k.to_string());
        all
    }

    /// Default bindings
    pub fn with_default_config() -> Self {
        let mut keys = Self::new();

        keys.register(KeyChord::char('e'), Some(Action::Transform(Transform::editor())));
        keys.register(KeyChord::char('s'), Some(Action::Toggle));
        keys.register(KeyChord::char('u'), Some(Action::Move(Vertical::Up)));
        keys.register(KeyChord::char('d'), Some(Action::Move(Vertical::Down)));
        keys.register(KeyChord::char('c'), Some(Action::Delete));

        keys.register(KeyChord::plain(KeyCode::Up), Some(Action::Navigate(Direction::Up)));
        keys.register(KeyChord::plain(KeyCode::Down), Some(Action::Navigate(Direction::Down)));
        keys.register(KeyChord::plain(KeyCode::Left), Some(Action::Navigate(Direction::Left)));
        keys.register(KeyChord::plain(KeyCode::Right), Some(Action::Navigate(Direction::Right)));

        // Raw mode turns the interrupt key into a plain key event
        keys.register(KeyChord::ctrl('c'), Some(Action::Quit));

        keys
    }
}

impl Default for KeyDispatcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_chars() {
        assert_eq!(KeyChord::parse("e"), Some(KeyChord::char('e')));
        assert_eq!(KeyChord::parse("E"), Some(KeyChord::char('E')));
        assert_eq!(KeyChord::parse("-"), Some(KeyChord::char('-')));
    }

    #[test]
    fn test_parse_named_and_modified() {
        assert_eq!(KeyChord::parse("up"), Some(KeyChord::plain(KeyCode::Up)));
        assert_eq!(KeyChord::parse("PageDown"), Some(KeyChord::plain(KeyCode::PageDown)));
        assert_eq!(KeyChord::parse("f5"), Some(KeyChord::plain(KeyCode::F(5))));
        assert_eq!(KeyChord::parse("space"), Some(KeyChord::char(' ')));
        assert_eq!(KeyChord::parse("ctrl-c"), Some(KeyChord::ctrl('c')));
        assert_eq!(KeyChord::parse("Ctrl+X"), Some(KeyChord::ctrl('x')));
        assert_eq!(
            KeyChord::parse("alt-up"),
            Some(KeyChord::new(KeyCode::Up, KeyModifiers::ALT))
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(KeyChord::parse(""), None);
        assert_eq!(KeyChord::parse("hyper"), None);
        assert_eq!(KeyChord::parse("f99"), None);
        assert_eq!(KeyChord::parse("ctrl-"), None);
    }

    #[test]
    fn test_shift_dropped_from_chars() {
        let event = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(KeyChord::from(event), KeyChord::char('S'));
    }

    #[test]
    fn test_shift_letter_matches_key_event() {
        let event = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(KeyChord::parse("shift-a"), Some(KeyChord::from(event)));
        assert_eq!(KeyChord::parse("Shift+a"), Some(KeyChord::char('A')));
        assert_eq!(
            KeyChord::parse("shift-up"),
            Some(KeyChord::new(KeyCode::Up, KeyModifiers::SHIFT))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for chord in [
            KeyChord::char('e'),
            KeyChord::ctrl('c'),
            KeyChord::plain(KeyCode::Left),
            KeyChord::plain(KeyCode::PageUp),
            KeyChord::plain(KeyCode::F(2)),
            KeyChord::char(' '),
        ] {
            assert_eq!(KeyChord::parse(&chord.to_string()), Some(chord), "{}", chord);
        }
    }

    #[test]
    fn test_register_replace_and_unregister() {
        let mut keys = KeyDispatcher::new();
        let k = KeyChord::char('x');

        keys.register(k, Some(Action::Delete));
        keys.register(k, Some(Action::Toggle));
        assert_eq!(keys.resolve(&k), Some(&Action::Toggle));
        assert_eq!(keys.len(), 1);

        keys.register(k, None);
        assert_eq!(keys.resolve(&k), None);

        // Unregistering an unknown key is fine
        keys.register(KeyChord::char('z'), None);
        assert_eq!(keys.len(), 0);
    }

    #[test]
    fn test_default_layout() {
        let keys = KeyDispatcher::default();
        assert_eq!(keys.resolve(&KeyChord::char('s')), Some(&Action::Toggle));
        assert_eq!(keys.resolve(&KeyChord::char('c')), Some(&Action::Delete));
        assert_eq!(keys.resolve(&KeyChord::ctrl('c')), Some(&Action::Quit));
        assert_eq!(
            keys.resolve(&KeyChord::plain(KeyCode::Up)),
            Some(&Action::Navigate(Direction::Up))
        );
        assert_eq!(keys.resolve(&KeyChord::char('q')), None);
    }
}
