// Clip model - the two ordered text collections behind the UI
//
// A clip is plain text (any Unicode, newlines allowed). Both the capture
// history and the saved list are `ClipList`s: ordered, index 0 first, and
// never empty. A list that would become empty holds a single "" instead.

/// Whether a clip's leading/trailing CR/LF runs are stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimPolicy {
    /// Strip CR/LF runs (unless normalization is disabled globally)
    #[default]
    Normalize,
    /// Keep the text exactly as returned
    Keep,
}

impl TrimPolicy {
    pub fn from_bool(trim: bool) -> Self {
        if trim {
            Self::Normalize
        } else {
            Self::Keep
        }
    }
}

/// Strip leading and trailing runs of '\r' / '\n'
pub fn normalize(text: &str) -> &str {
    text.trim_matches(|c| c == '\r' || c == '\n')
}

/// Applies CR/LF normalization according to the global `--leavecrlf` switch
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    strip_crlf: bool,
}

impl Normalizer {
    pub fn new(leave_crlf: bool) -> Self {
        Self {
            strip_crlf: !leave_crlf,
        }
    }

    /// Normalize `text` if both the global switch and `policy` allow it
    pub fn apply(&self, text: String, policy: TrimPolicy) -> String {
        if !self.strip_crlf || policy == TrimPolicy::Keep {
            return text;
        }
        let trimmed = normalize(&text);
        if trimmed.len() == text.len() {
            text
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Ordered, never-empty list of clips with an optional capacity bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipList {
    clips: Vec<String>,
    capacity: Option<usize>,
}

impl ClipList {
    /// Unbounded list (the saved list)
    pub fn unbounded(clips: Vec<String>) -> Self {
        Self::build(clips, None)
    }

    /// List holding at most `capacity` clips (the capture history)
    ///
    /// Extra clips beyond the bound are dropped from the tail.
    pub fn bounded(capacity: usize, clips: Vec<String>) -> Self {
        Self::build(clips, Some(capacity.max(1)))
    }

    fn build(mut clips: Vec<String>, capacity: Option<usize>) -> Self {
        if let Some(cap) = capacity {
            clips.truncate(cap);
        }
        if clips.is_empty() {
            clips.push(String::new());
        }
        Self { clips, capacity }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Clip at `index`, or "" when out of range
    pub fn get(&self, index: usize) -> &str {
        self.clips.get(index).map(String::as_str).unwrap_or("")
    }

    /// Replace the clip at `index` in place (ignored when out of range)
    pub fn set(&mut self, index: usize, text: String) {
        if let Some(slot) = self.clips.get_mut(index) {
            *slot = text;
        }
    }

    /// Add a clip at the front, evicting the oldest entry past capacity
    ///
    /// An empty clip at index 0 is a placeholder and is replaced rather than
    /// pushed back.
    pub fn push_front(&mut self, text: String) {
        if self.clips[0].is_empty() {
            self.clips[0] = text;
            return;
        }
        self.clips.insert(0, text);
        if let Some(cap) = self.capacity {
            self.clips.truncate(cap);
        }
    }

    /// Insert a clip at `index` without the placeholder rule
    pub fn insert(&mut self, index: usize, text: String) {
        let index = index.min(self.clips.len());
        self.clips.insert(index, text);
        if let Some(cap) = self.capacity {
            self.clips.truncate(cap);
        }
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a < self.clips.len() && b < self.clips.len() {
            self.clips.swap(a, b);
        }
    }

    /// Remove the clip at `index`; the last remaining clip is blanked instead
    pub fn remove(&mut self, index: usize) {
        if index >= self.clips.len() {
            return;
        }
        if self.clips.len() == 1 {
            self.clips[0].clear();
        } else {
            self.clips.remove(index);
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.clips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_strips_only_outer_crlf() {
        assert_eq!(normalize("\r\n\nhello\nworld\r\n"), "hello\nworld");
        assert_eq!(normalize("  padded  "), "  padded  ");
        assert_eq!(normalize("\n\r\n"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["", "\n", "a", "\ra\nb\n", "\n\n x \r", "日本\r\n語\n"] {
            let once = normalize(s);
            assert_eq!(normalize(once), once, "input {:?}", s);
        }
    }

    #[test]
    fn test_normalizer_respects_leave_crlf() {
        let strip = Normalizer::new(false);
        let leave = Normalizer::new(true);
        assert_eq!(strip.apply("x\n".into(), TrimPolicy::Normalize), "x");
        assert_eq!(strip.apply("x\n".into(), TrimPolicy::Keep), "x\n");
        assert_eq!(leave.apply("x\n".into(), TrimPolicy::Normalize), "x\n");
    }

    #[test]
    fn test_new_list_never_empty() {
        assert_eq!(ClipList::unbounded(Vec::new()).as_slice(), &[""]);
        assert_eq!(ClipList::bounded(3, Vec::new()).len(), 1);
    }

    #[test]
    fn test_bounded_truncates_on_load() {
        let l = ClipList::bounded(2, list(&["a", "b", "c"]));
        assert_eq!(l.as_slice(), &list(&["a", "b"])[..]);
    }

    #[test]
    fn test_capacity_keeps_most_recent() {
        let cap = 5;
        let mut l = ClipList::bounded(cap, Vec::new());
        for i in 0..40 {
            l.push_front(format!("clip-{}", i));
            assert!(l.len() <= cap);
        }
        let expected: Vec<String> = (35..40).rev().map(|i| format!("clip-{}", i)).collect();
        assert_eq!(l.as_slice(), &expected[..]);
    }

    #[test]
    fn test_push_front_replaces_placeholder() {
        let mut l = ClipList::bounded(10, Vec::new());
        l.push_front("first".into());
        assert_eq!(l.as_slice(), &list(&["first"])[..]);
        l.push_front("second".into());
        assert_eq!(l.as_slice(), &list(&["second", "first"])[..]);
    }

    #[test]
    fn test_remove_last_blanks_instead() {
        let mut l = ClipList::unbounded(list(&["only"]));
        l.remove(0);
        assert_eq!(l.as_slice(), &list(&[""])[..]);

        let mut l = ClipList::unbounded(list(&["a", "b"]));
        l.remove(1);
        assert_eq!(l.as_slice(), &list(&["a"])[..]);
    }

    #[test]
    fn test_get_out_of_range_is_empty() {
        let l = ClipList::unbounded(list(&["a"]));
        assert_eq!(l.get(7), "");
    }
}
