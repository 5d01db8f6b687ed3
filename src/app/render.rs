//! Calculator screen rendering.
//!
//! Title, language tabs, the ingredients panel (or the item picker), the
//! output prices and a help line. Every interactive row registers its click
//! target while it is drawn.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::catalog::Item;
use crate::display;
use crate::input::{is_narrow_layout, ClickState};
use crate::locale::LOCALES;
use crate::messages::message;
use crate::number::format_grouped;
use crate::widgets::{ClickableList, TabBar};

use super::actions::{
    CLOSE, EDIT_LABOR_COST, EDIT_PROFIT_PERCENT, INGREDIENT_BASE, LOCALE_BASE, OPEN_PICKER, PICK_BASE,
    REMOVE_SELECTED,
};
use super::state::{Field, Mode, Row};
use super::CalculatorApp;

/// Widest an item name column gets before names are cut.
const NAME_COLUMN_MAX: usize = 24;
const EDIT_CARET: &str = "▏";

pub fn render(app: &CalculatorApp, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area);

    render_title(app, f, chunks[0]);
    render_language_bar(app, f, chunks[1], cs);

    let outputs = outputs_paragraph(app);
    let (panel_area, outputs_area) = if is_narrow_layout(area.width) {
        // outputs get what they need, up to half of the content
        let wanted = outputs.line_count(chunks[2].width) as u16;
        let height = wanted.clamp(3, (chunks[2].height / 2).max(3));
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(height)])
            .split(chunks[2]);
        (split[0], split[1])
    } else {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[2]);
        (split[0], split[1])
    };

    match app.mode() {
        Mode::Picking { cursor } => render_picker(app, *cursor, f, panel_area, cs),
        _ => render_ingredients(app, f, panel_area, cs),
    }
    f.render_widget(outputs, outputs_area);

    render_help(app, f, chunks[3], cs);
}

fn lang(app: &CalculatorApp) -> &'static str {
    app.panel().locale().lang_code()
}

fn render_title(app: &CalculatorApp, f: &mut Frame, area: Rect) {
    let lang = lang(app);
    let title = Line::from(vec![
        Span::styled(
            message("navTitle", lang),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" · ", Style::default().fg(Color::DarkGray)),
        Span::styled(message("ingredientsHeader", lang), Style::default().fg(Color::White)),
    ]);
    let widget = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn render_language_bar(app: &CalculatorApp, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let current = app.panel().locale();
    let mut bar = TabBar::new(" │ ");
    for (i, locale) in LOCALES.iter().enumerate() {
        let style = if locale == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        bar = bar.tab(locale.label, style, LOCALE_BASE + i as u16);
    }
    bar.block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", message("languageLabel", lang(app)))),
    )
    .render(f, area, cs);
}

/// Display width of `name` cut to the name column.
fn name_cell(name: &str, column: usize) -> String {
    let mut out = String::new();
    let mut width = 0;
    for c in name.chars() {
        let w = Span::raw(c.to_string()).width();
        if width + w > column {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str(&" ".repeat(column - width));
    out
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn marker(selected: bool) -> &'static str {
    if selected {
        "▶ "
    } else {
        "  "
    }
}

/// The text being typed, if `field` is open in the editor.
fn edit_buffer<'a>(mode: &'a Mode, field: &Field) -> Option<&'a str> {
    match mode {
        Mode::Editing { field: open, buffer } if open == field => Some(buffer.as_str()),
        _ => None,
    }
}

fn value_span(buffer: Option<&str>, shown: String) -> Span<'static> {
    match buffer {
        Some(text) => Span::styled(
            format!("{text}{EDIT_CARET}"),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        None => Span::styled(shown, Style::default().fg(Color::Green)),
    }
}

fn render_ingredients(app: &CalculatorApp, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let lang = lang(app);
    let locale = app.panel().locale();
    let items = app.panel().items();
    let selected_row = app.selected_row();
    let column = items
        .iter()
        .map(|item| Span::raw(item.name.as_str()).width())
        .max()
        .unwrap_or(0)
        .min(NAME_COLUMN_MAX);

    let mut cl = ClickableList::new();
    if items.is_empty() {
        cl.push(Line::from(Span::styled(
            message("noIngredients", lang),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, item) in items.iter().enumerate() {
        let selected = selected_row == Row::Ingredient(i);
        let buffer = edit_buffer(app.mode(), &Field::Price(item.name_id.clone()));
        let shown = item
            .price
            .map(|price| format_grouped(price, locale))
            .unwrap_or_else(|| "—".to_string());
        cl.push_clickable(
            Line::from(vec![
                Span::styled(marker(selected), row_style(selected)),
                Span::styled(name_cell(&item.name, column), row_style(selected)),
                Span::raw("  "),
                value_span(buffer, shown),
            ]),
            INGREDIENT_BASE + i as u16,
        );
    }

    cl.push(Line::from(""));
    let settings = [
        (
            Row::LaborCost,
            Field::LaborCost,
            "calorieCostLabel",
            format_grouped(app.panel().labor_cost(), locale),
            EDIT_LABOR_COST,
        ),
        (
            Row::ProfitPercent,
            Field::ProfitPercent,
            "profitPercentLabel",
            format!("{}%", format_grouped(app.panel().profit_percent(), locale)),
            EDIT_PROFIT_PERCENT,
        ),
    ];
    for (row, field, label_id, shown, action) in settings {
        let selected = selected_row == row;
        cl.push_clickable(
            Line::from(vec![
                Span::styled(marker(selected), row_style(selected)),
                Span::styled(format!("{}: ", message(label_id, lang)), row_style(selected)),
                value_span(edit_buffer(app.mode(), &field), shown),
            ]),
            action,
        );
    }

    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            format!("  [A] {}", message("addIngredientAction", lang)),
            Style::default().fg(Color::Yellow),
        )),
        OPEN_PICKER,
    );
    if let Row::Ingredient(i) = selected_row {
        cl.push_clickable(
            Line::from(Span::styled(
                format!("  [D] {} {}", message("removeIngredientAction", lang), items[i].name),
                Style::default().fg(Color::Red),
            )),
            REMOVE_SELECTED,
        );
    }

    let selected_action = match selected_row {
        Row::Ingredient(i) => INGREDIENT_BASE + i as u16,
        Row::LaborCost => EDIT_LABOR_COST,
        Row::ProfitPercent => EDIT_PROFIT_PERCENT,
    };
    let visible = area.height.saturating_sub(2);
    let scroll = cl
        .line_of(selected_action)
        .map(|line| ClickableList::scroll_to_show(line, visible))
        .unwrap_or(0);
    cl.register_targets(area, cs, 1, 1, scroll);

    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} ", message("ingredientsHeader", lang))),
        )
        .scroll((scroll, 0));
    f.render_widget(widget, area);
}

/// Where the item's icon comes from; shown under the highlighted picker row.
fn sprite_line(item: &Item, image_base_url: &str) -> Line<'static> {
    let mut text = format!(
        "      {} {} / {}",
        display::image_url(item, image_base_url),
        display::sprite_position(item),
        display::background_size(item),
    );
    let filter = display::filter(item);
    if !filter.is_empty() {
        text.push(' ');
        text.push_str(filter);
    }
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn render_picker(app: &CalculatorApp, cursor: usize, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let lang = lang(app);
    let available = app.available_items();

    let mut cl = ClickableList::new();
    if available.is_empty() {
        cl.push(Line::from(Span::styled("  —", Style::default().fg(Color::DarkGray))));
    }
    for (i, item) in available.iter().enumerate() {
        let selected = i == cursor;
        cl.push_clickable(
            Line::from(vec![
                Span::styled(marker(selected), row_style(selected)),
                Span::styled(item.name.clone(), row_style(selected)),
            ]),
            PICK_BASE + i as u16,
        );
        if selected {
            cl.push(sprite_line(item, &app.config().image_base_url));
        }
    }

    let visible = area.height.saturating_sub(2);
    let scroll = cl
        .line_of(PICK_BASE + cursor as u16)
        .map(|line| ClickableList::scroll_to_show(line + 1, visible))
        .unwrap_or(0);
    cl.register_targets(area, cs, 1, 1, scroll);

    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(format!(" {} ", message("addIngredientAction", lang))),
        )
        .scroll((scroll, 0));
    f.render_widget(widget, area);
}

fn outputs_paragraph(app: &CalculatorApp) -> Paragraph<'_> {
    let lang = lang(app);
    let locale = app.panel().locale();

    let mut lines: Vec<Line> = Vec::new();
    if app.quotes().is_empty() {
        lines.push(Line::from(Span::styled("—", Style::default().fg(Color::DarkGray))));
    }
    for quote in app.quotes() {
        lines.push(Line::from(vec![
            Span::styled(
                app.item_name(&quote.output).to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}: ", message("unitPriceLabel", lang)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format_grouped(quote.unit_price, locale),
                Style::default().fg(Color::Green),
            ),
        ]));
        if !quote.is_complete() {
            let names: Vec<&str> = quote.missing.iter().map(|id| app.item_name(id)).collect();
            lines.push(Line::from(Span::styled(
                format!("  {}: {}", message("missingPricesLabel", lang), names.join(", ")),
                Style::default().fg(Color::Red),
            )));
        }
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(format!(" {} ", message("outputsHeader", lang))),
        )
        .wrap(Wrap { trim: false })
}

fn render_help(app: &CalculatorApp, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let lang = lang(app);
    let (help_id, closes) = match app.mode() {
        Mode::Browse => ("helpBrowse", false),
        Mode::Editing { .. } => ("helpEdit", true),
        Mode::Picking { .. } => ("helpPicker", true),
    };
    let help = Paragraph::new(Line::from(Span::styled(
        message(help_id, lang),
        Style::default().fg(Color::DarkGray),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(help, area);

    // tapping the help bar backs out of the editor/picker
    if closes {
        cs.add_click_target(area, CLOSE);
    }
}
