//! Input normalization and click-target hit testing.
//!
//! Keyboard, mouse and touch all end up as an [`InputEvent`]. Clicks are
//! resolved against the targets the renderer registered for the frame that
//! is currently on screen.

use ratzilla::ratatui::layout::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A printable key.
    Key(char),
    Enter,
    Backspace,
    Escape,
    Up,
    Down,
    /// A click/tap on a registered target, identified by its action ID.
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets of the last rendered frame plus the terminal size they were
/// laid out for.
#[derive(Debug, Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Full-width target for one row of `area`; rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a row of labels laid out left to right.
    ///
    /// `widths` holds `(display_width, action_id)` per label. Each target
    /// covers its label plus half of the separator on either side; the first
    /// and last reach the edges of the bar so there are no dead columns.
    pub fn register_tab_targets(&mut self, widths: &[(u16, u16)], separator_width: u16, bar: Rect) {
        if widths.is_empty() || bar.width == 0 {
            return;
        }

        let mut starts = Vec::with_capacity(widths.len());
        let mut cursor = 0u16;
        for (i, &(w, _)) in widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }

        let last = widths.len() - 1;
        for (i, &(w, action_id)) in widths.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                let prev_end = starts[i - 1] + widths[i - 1].0;
                prev_end + (starts[i] - prev_end) / 2
            };
            let right = if i == last {
                bar.width
            } else {
                let end = starts[i] + w;
                end + (starts[i + 1] - end) / 2
            };
            let width = right.min(bar.width).saturating_sub(left);
            if width > 0 {
                self.add_click_target(Rect::new(bar.x + left, bar.y, width, bar.height), action_id);
            }
        }
    }

    /// Action under a terminal cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }
}

pub fn is_narrow_layout(width: u16) -> bool {
    width < 70
}

/// Map a pixel offset inside the terminal grid to a cell index along one
/// axis. `None` when outside the grid or the grid has no size yet.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
