// UI rendering - draws the active clip list
//
// The newest clip sits on the bottom line and older clips stack upward, so
// the list reads like shell scrollback. Each clip takes exactly one line:
// newlines and tabs are shown as ↵ and ⇥, long clips are cut at the screen
// edge. The selected clip is drawn reversed, starting at the horizontal
// offset, and carries the cursor.

use crate::app::{ActiveList, App, SAVED_HEADER};
use ratatui::{
    layout::Position,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// One clip placed on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRow {
    /// Screen line
    pub y: u16,
    /// Index into the active list
    pub index: usize,
    pub selected: bool,
}

/// Clip text as shown on a single line
pub fn display_text(clip: &str) -> String {
    clip.replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\n' | '\r' => '↵',
            '\t' => '⇥',
            c if c.is_control() => '·',
            c => c,
        })
        .collect()
}

/// Cut `text` to `width` cells and pad it out with spaces
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

/// Which clips land on which lines for a screen `height` lines tall
pub fn layout_rows(app: &App, height: u16) -> Vec<ClipRow> {
    if height == 0 {
        return Vec::new();
    }
    // Same row count navigation uses, never more than the screen
    let rows = app.visible_rows().min(height as usize);
    let (start, end) = app.view.visible_range(rows, app.active_list().len());

    (start..end)
        .map(|index| ClipRow {
            y: height - 1 - (index - start) as u16,
            index,
            selected: index == app.view.selected,
        })
        .collect()
}

/// Draw the whole screen
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let width = area.width as usize;
    let reversed = Style::default().add_modifier(Modifier::REVERSED);

    let mut lines: Vec<Line> = vec![Line::default(); area.height as usize];

    if app.active() == ActiveList::Saved {
        if let Some(first) = lines.first_mut() {
            let pad = width.saturating_sub(SAVED_HEADER.len()) / 2;
            let header = format!("{}{}", " ".repeat(pad), SAVED_HEADER);
            *first = Line::from(Span::styled(fit_to_width(&header, width), reversed));
        }
    }

    let mut cursor = None;
    for row in layout_rows(app, area.height) {
        let text = display_text(app.active_list().get(row.index));
        let line = if row.selected {
            cursor = Some(row.y);
            let panned: String = text.chars().skip(app.view.h_offset).collect();
            Line::from(Span::styled(fit_to_width(&panned, width), reversed))
        } else {
            Line::from(fit_to_width(&text, width))
        };
        lines[row.y as usize] = line;
    }

    frame.render_widget(Paragraph::new(lines), area);

    if let Some(y) = cursor {
        frame.set_cursor_position(Position::new(area.x, area.y + y));
    }
}
