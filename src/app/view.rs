// View state for the active clip list
//
// The list is drawn bottom-up: index 0 (newest) sits on the last screen
// line and older clips stack above it. `bottom` is the lowest list index
// on screen, so the visible window is `bottom..bottom + rows`.
//
// `h_offset` pans the selected clip horizontally in whole screen widths.

/// Selection, viewport and horizontal pan for the displayed list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Index of the selected clip in the active list
    pub selected: usize,

    /// Lowest list index that is visible
    pub bottom: usize,

    /// Character offset into the selected clip
    pub h_offset: usize,

    /// Screen width in cells
    pub width: usize,

    /// Screen height in lines
    pub height: usize,
}

impl ViewState {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            selected: 0,
            bottom: 0,
            h_offset: 0,
            width,
            height,
        }
    }

    /// Back to the newest clip, unpanned
    pub fn reset(&mut self) {
        self.selected = 0;
        self.bottom = 0;
        self.h_offset = 0;
    }

    /// Lines available for clips after `header` reserved lines (at least one)
    pub fn rows(&self, header: usize) -> usize {
        self.height.saturating_sub(header).max(1)
    }

    /// Move `bottom` just enough to keep the selection on screen
    pub fn follow_selection(&mut self, rows: usize) {
        let rows = rows.max(1);
        if self.selected < self.bottom {
            self.bottom = self.selected;
        } else if self.selected >= self.bottom + rows {
            self.bottom = self.selected + 1 - rows;
        }
    }

    /// Adopt a new screen size, re-anchoring the viewport on the selection
    pub fn resize(&mut self, width: usize, height: usize, header: usize) {
        self.width = width;
        self.height = height;
        let rows = self.rows(header);
        self.bottom = (self.selected + 1).saturating_sub(rows);
        self.h_offset = 0;
    }

    /// Pan one screen width toward the start of the clip
    pub fn scroll_left(&mut self) {
        self.h_offset = self.h_offset.saturating_sub(self.width);
    }

    /// Pan one screen width toward the end of a clip `text_len` chars long
    pub fn scroll_right(&mut self, text_len: usize) {
        self.h_offset = (self.h_offset + self.width).min(self.max_h_offset(text_len));
    }

    /// Largest useful pan for a clip `text_len` chars long
    pub fn max_h_offset(&self, text_len: usize) -> usize {
        text_len.saturating_sub(self.width)
    }

    /// List indices on screen: `(start, end)` with `end` exclusive
    pub fn visible_range(&self, rows: usize, total: usize) -> (usize, usize) {
        let start = self.bottom.min(total);
        let end = (self.bottom + rows).min(total);
        (start, end)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
