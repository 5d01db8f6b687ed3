//! Clickable building blocks for the calculator screen.
//!
//! Each widget renders itself and registers the click targets for what it
//! drew, so rows and labels can never drift away from their actions.
//!
//! - [`TabBar`]: one row of selectable labels (the language switcher).
//! - [`ClickableList`]: vertical lines, some bound to actions (ingredient
//!   rows, settings, the picker).

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

/// Labels in a single row, separated by `separator`.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("English", selected, LOCALE_BASE)
///     .tab("Deutsch", normal, LOCALE_BASE + 3)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Display width of every padded label paired with its action.
    fn widths(&self) -> Vec<(u16, u16)> {
        self.tabs
            .iter()
            .map(|(label, _, action_id)| (Line::from(format!(" {label} ")).width() as u16, *action_id))
            .collect()
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let sep_width = Line::from(self.separator).width() as u16;
        let widths = self.widths();

        let mut spans: Vec<Span> = Vec::with_capacity(self.tabs.len() * 2);
        for (i, (label, style, _)) in self.tabs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(format!(" {label} "), style));
        }

        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        let paragraph = match self.block {
            Some(block) => Paragraph::new(Line::from(spans)).block(block),
            None => Paragraph::new(Line::from(spans)),
        };
        f.render_widget(paragraph, area);

        // inner columns, outer rows: the border rows are tappable too
        let bar = Rect::new(inner.x, area.y, inner.width, area.height.max(1));
        cs.register_tab_targets(&widths, sep_width, bar);
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines for a [`Paragraph`], some of them bound to an action.
///
/// Targets follow their line: inserting a header above a row moves the row's
/// target with it.
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    /// Index of the first line bound to `action_id`.
    pub fn line_of(&self, action_id: u16) -> Option<u16> {
        self.actions
            .iter()
            .find(|&&(_, id)| id == action_id)
            .map(|&(line, _)| line)
    }

    /// Smallest scroll offset that keeps `line` inside `visible_rows`.
    pub fn scroll_to_show(line: u16, visible_rows: u16) -> u16 {
        if visible_rows == 0 {
            return 0;
        }
        line.saturating_sub(visible_rows - 1)
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a target for every clickable line that is on screen.
    ///
    /// `top_offset`/`bottom_offset` are the rows taken by borders, `scroll`
    /// the number of lines scrolled out at the top. Lines never wrap.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, action_id) in &self.actions {
            if line_idx < scroll {
                continue;
            }
            let row = content_y + (line_idx - scroll);
            if row < content_end {
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}
