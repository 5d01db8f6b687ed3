//! The calculator screen: the ingredients panel wired to storage, pricing
//! and keyboard/click input.

pub mod actions;
pub mod render;
pub mod state;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;
use tracing::{debug, info};

use crate::catalog::{CatalogError, EmbeddedCatalog, Item, ItemCatalog};
use crate::config::AppConfig;
use crate::ingredients::IngredientPanel;
use crate::input::{ClickState, InputEvent};
use crate::locale::{compare_names, Locale, LOCALES};
use crate::migrate::migrate;
use crate::number::format_decimal;
use crate::persist::{persist_all, persist_events, save_locale, stored_locale};
use crate::pricing::{quote_selected, Quote};
use crate::storage::{CookieJar, KeyValueStore};

use state::{is_number_char, Field, Mode, Row, MAX_INPUT_LEN};

pub struct CalculatorApp {
    panel: IngredientPanel,
    catalog: EmbeddedCatalog,
    store: Box<dyn KeyValueStore>,
    config: AppConfig,
    mode: Mode,
    /// Browse cursor, see [`Row`].
    cursor: usize,
    quotes: Vec<Quote>,
}

impl CalculatorApp {
    /// Pick the locale, load the catalog and restore the panel, migrating
    /// any legacy cookies into `store` on the way.
    pub fn new(
        config: AppConfig,
        mut store: Box<dyn KeyValueStore>,
        cookies: &mut dyn CookieJar,
        browser_language: Option<&str>,
    ) -> Result<Self, CatalogError> {
        let locale = config.initial_locale(stored_locale(&*store), browser_language);
        let catalog = EmbeddedCatalog::embedded(locale.lang_code())?;
        let restored = migrate(&mut *store, cookies, &catalog, &locale);
        let panel = IngredientPanel::from_restored(restored, locale);
        info!(
            locale = locale.code,
            ingredients = panel.items().len(),
            "calculator ready"
        );

        let mut app = Self {
            panel,
            catalog,
            store,
            config,
            mode: Mode::Browse,
            cursor: 0,
            quotes: Vec::new(),
        };
        app.refresh_quotes();
        Ok(app)
    }

    pub fn panel(&self) -> &IngredientPanel {
        &self.panel
    }

    pub fn catalog(&self) -> &EmbeddedCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn selected_row(&self) -> Row {
        Row::from_cursor(self.cursor, self.panel.items().len())
    }

    /// Catalog items not yet selected, by display name.
    pub fn available_items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .catalog
            .items()
            .iter()
            .filter(|item| !self.panel.exists(&item.name_id))
            .collect();
        let locale = self.panel.locale();
        items.sort_by(|a, b| compare_names(&a.name, &b.name, locale));
        items
    }

    /// Display name of a catalog item, falling back to its id.
    pub fn item_name<'a>(&'a self, name_id: &'a str) -> &'a str {
        self.catalog
            .find(name_id)
            .map(|item| item.name.as_str())
            .unwrap_or(name_id)
    }

    /// Handle one input event. Returns true if it did something.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = if let Some(locale) = clicked_locale(event) {
            self.mode = Mode::Browse;
            self.set_locale(locale);
            true
        } else {
            match self.mode {
                Mode::Browse => self.browse_input(event),
                Mode::Editing { .. } => self.edit_input(event),
                Mode::Picking { .. } => self.pick_input(event),
            }
        };
        self.flush();
        consumed
    }

    pub fn render(&self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        render::render(self, f, area, cs);
    }

    fn browse_input(&mut self, event: &InputEvent) -> bool {
        let last_row = Row::row_count(self.panel.items().len()) - 1;
        match event {
            InputEvent::Up | InputEvent::Key('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            InputEvent::Down | InputEvent::Key('j') => {
                self.cursor = (self.cursor + 1).min(last_row);
                true
            }
            InputEvent::Enter | InputEvent::Key('e') => {
                self.start_edit(None);
                true
            }
            InputEvent::Key('a') | InputEvent::Click(actions::OPEN_PICKER) => {
                self.mode = Mode::Picking { cursor: 0 };
                true
            }
            InputEvent::Key('d') | InputEvent::Click(actions::REMOVE_SELECTED) => self.remove_selected(),
            InputEvent::Key('l') => {
                self.set_locale(self.panel.locale().next());
                true
            }
            // typing straight onto a row starts a fresh edit
            InputEvent::Key(c) if is_number_char(*c) && *c != ' ' => {
                self.start_edit(Some(*c));
                true
            }
            InputEvent::Click(id) => self.browse_click(*id),
            _ => false,
        }
    }

    fn browse_click(&mut self, id: u16) -> bool {
        let count = self.panel.items().len();
        if let Some(row) = actions::offset(id, actions::INGREDIENT_BASE, count) {
            self.cursor = row;
        } else if id == actions::EDIT_LABOR_COST {
            self.cursor = count;
        } else if id == actions::EDIT_PROFIT_PERCENT {
            self.cursor = count + 1;
        } else {
            return false;
        }
        self.start_edit(None);
        true
    }

    fn edit_input(&mut self, event: &InputEvent) -> bool {
        let Mode::Editing { buffer, .. } = &mut self.mode else {
            return false;
        };
        match event {
            InputEvent::Key(c) if is_number_char(*c) => {
                if buffer.chars().count() < MAX_INPUT_LEN {
                    buffer.push(*c);
                }
                true
            }
            InputEvent::Backspace => {
                buffer.pop();
                true
            }
            InputEvent::Enter => {
                self.commit_edit();
                true
            }
            InputEvent::Escape | InputEvent::Click(actions::CLOSE) => {
                self.mode = Mode::Browse;
                true
            }
            // clicking elsewhere saves, then acts on the click
            InputEvent::Click(_) => {
                self.commit_edit();
                self.browse_input(event);
                true
            }
            _ => false,
        }
    }

    fn pick_input(&mut self, event: &InputEvent) -> bool {
        let Mode::Picking { cursor } = self.mode else {
            return false;
        };
        let available = self.available_items().len();
        match event {
            InputEvent::Up | InputEvent::Key('k') => {
                self.mode = Mode::Picking {
                    cursor: cursor.saturating_sub(1),
                };
                true
            }
            InputEvent::Down | InputEvent::Key('j') => {
                self.mode = Mode::Picking {
                    cursor: (cursor + 1).min(available.saturating_sub(1)),
                };
                true
            }
            InputEvent::Enter => self.pick(cursor),
            InputEvent::Escape | InputEvent::Key('a') | InputEvent::Click(actions::CLOSE) => {
                self.mode = Mode::Browse;
                true
            }
            InputEvent::Click(id) => match actions::offset(*id, actions::PICK_BASE, available) {
                Some(index) => self.pick(index),
                None => false,
            },
            _ => false,
        }
    }

    fn start_edit(&mut self, first: Option<char>) {
        let field = match self.selected_row() {
            Row::Ingredient(i) => Field::Price(self.panel.items()[i].name_id.clone()),
            Row::LaborCost => Field::LaborCost,
            Row::ProfitPercent => Field::ProfitPercent,
        };
        let buffer = match first {
            Some(c) => c.to_string(),
            None => self.current_text(&field),
        };
        self.mode = Mode::Editing { field, buffer };
    }

    /// The field's value in the canonical notation of the current locale.
    fn current_text(&self, field: &Field) -> String {
        let locale = self.panel.locale();
        match field {
            Field::Price(id) => self
                .panel
                .item(id)
                .and_then(|item| item.price)
                .map(|price| format_decimal(price, locale))
                .unwrap_or_default(),
            Field::LaborCost => format_decimal(self.panel.labor_cost(), locale),
            Field::ProfitPercent => format_decimal(self.panel.profit_percent(), locale),
        }
    }

    fn commit_edit(&mut self) {
        let Mode::Editing { field, buffer } = std::mem::replace(&mut self.mode, Mode::Browse) else {
            return;
        };
        let changed = match &field {
            Field::Price(id) => self.panel.set_price(id, &buffer),
            Field::LaborCost => self.panel.set_labor_cost(&buffer),
            Field::ProfitPercent => self.panel.set_profit_percent(&buffer),
        };
        if !changed {
            debug!(?field, input = %buffer, "edit left the value unchanged");
        }
    }

    fn pick(&mut self, index: usize) -> bool {
        let Some(item) = self.available_items().get(index).map(|item| (*item).clone()) else {
            return false;
        };
        let name_id = item.name_id.clone();
        self.panel.add(item);
        self.mode = Mode::Browse;
        self.cursor = self.row_of(&name_id).unwrap_or(self.cursor);
        true
    }

    fn remove_selected(&mut self) -> bool {
        let Row::Ingredient(i) = self.selected_row() else {
            return false;
        };
        let name_id = self.panel.items()[i].name_id.clone();
        self.panel.remove(&name_id).is_some()
    }

    fn set_locale(&mut self, locale: Locale) {
        if locale == *self.panel.locale() {
            return;
        }
        let selected = match self.selected_row() {
            Row::Ingredient(i) => Some(self.panel.items()[i].name_id.clone()),
            _ => None,
        };

        self.catalog.set_language(locale.lang_code());
        self.panel.relocalize(locale, &self.catalog);
        save_locale(&mut *self.store, &locale);
        // scalars are stored in the locale's notation
        persist_all(&mut *self.store, &self.panel);

        if let Some(row) = selected.as_deref().and_then(|id| self.row_of(id)) {
            self.cursor = row;
        }
        info!(locale = locale.code, "switched language");
    }

    fn row_of(&self, name_id: &str) -> Option<usize> {
        self.panel
            .items()
            .iter()
            .position(|item| item.name_id == name_id)
    }

    /// Persist and re-price after whatever the last input changed.
    fn flush(&mut self) {
        let last_row = Row::row_count(self.panel.items().len()) - 1;
        self.cursor = self.cursor.min(last_row);

        let events = self.panel.drain_events();
        if events.is_empty() {
            return;
        }
        persist_events(&mut *self.store, &self.panel, &events);
        self.refresh_quotes();
    }

    fn refresh_quotes(&mut self) {
        self.quotes = quote_selected(self.catalog.recipes(), &self.panel);
    }
}

fn clicked_locale(event: &InputEvent) -> Option<Locale> {
    let InputEvent::Click(id) = event else {
        return None;
    };
    actions::offset(*id, actions::LOCALE_BASE, LOCALES.len()).map(|i| LOCALES[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::{INGREDIENTS_KEY, LABOR_COST_KEY, PROFIT_PERCENT_KEY};
    use crate::persist::LOCALE_KEY;
    use crate::storage::{MemoryCookieJar, MemoryStore};
    use base64::Engine;

    fn app_with(store: MemoryStore, cookies: &mut MemoryCookieJar, lang: Option<&str>) -> CalculatorApp {
        CalculatorApp::new(AppConfig::default(), Box::new(store), cookies, lang).unwrap()
    }

    fn app() -> CalculatorApp {
        app_with(MemoryStore::new(), &mut MemoryCookieJar::default(), None)
    }

    fn keys(app: &mut CalculatorApp, text: &str) {
        for c in text.chars() {
            app.handle_input(&InputEvent::Key(c));
        }
    }

    fn names(app: &CalculatorApp) -> Vec<&str> {
        app.panel().items().iter().map(|i| i.name.as_str()).collect()
    }

    /// Add the first available item whose display name is `name`.
    fn add(app: &mut CalculatorApp, name: &str) {
        app.handle_input(&InputEvent::Key('a'));
        let index = app
            .available_items()
            .iter()
            .position(|i| i.name == name)
            .unwrap();
        app.handle_input(&InputEvent::Click(actions::PICK_BASE + index as u16));
    }

    #[test]
    fn starts_empty_in_browser_language() {
        let app = app_with(MemoryStore::new(), &mut MemoryCookieJar::default(), Some("de-AT"));
        assert_eq!(app.panel().locale().code, "de-DE");
        assert!(app.panel().items().is_empty());
        assert_eq!(app.selected_row(), Row::LaborCost);
        assert!(app.quotes().is_empty());
        assert_eq!(app.catalog().find("WoodItem").unwrap().name, "Holz");
    }

    #[test]
    fn legacy_cookie_is_restored_and_moved() {
        let mut cookies = MemoryCookieJar::default();
        let payload = r#"[{"id":"LogItem","pr":4}]"#;
        cookies.insert(
            INGREDIENTS_KEY,
            &base64::engine::general_purpose::STANDARD.encode(payload),
        );
        let app = app_with(MemoryStore::new(), &mut cookies, None);

        assert_eq!(names(&app), vec!["Log"]);
        assert!(!cookies.check(INGREDIENTS_KEY));
        assert!(app.store().get(INGREDIENTS_KEY).is_some());
        // Board is made from logs
        assert_eq!(app.quotes().len(), 1);
        assert_eq!(app.quotes()[0].output, "BoardItem");
    }

    #[test]
    fn picking_adds_sorted_and_persists() {
        let mut app = app();
        add(&mut app, "Wood");
        add(&mut app, "Board");

        assert_eq!(names(&app), vec!["Board", "Wood"]);
        assert_eq!(app.mode(), &Mode::Browse);
        // cursor follows the new item
        assert_eq!(app.selected_row(), Row::Ingredient(0));
        assert_eq!(
            app.store().get(INGREDIENTS_KEY).as_deref(),
            Some(r#"[{"id":"BoardItem"},{"id":"WoodItem"}]"#)
        );
        assert!(app.available_items().iter().all(|i| i.name_id != "WoodItem"));
    }

    #[test]
    fn picker_keyboard_navigation() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('a'));
        app.handle_input(&InputEvent::Up);
        assert_eq!(app.mode(), &Mode::Picking { cursor: 0 });
        app.handle_input(&InputEvent::Down);
        app.handle_input(&InputEvent::Down);
        assert_eq!(app.mode(), &Mode::Picking { cursor: 2 });

        let expected = app.available_items()[2].name_id.clone();
        app.handle_input(&InputEvent::Enter);
        assert!(app.panel().exists(&expected));

        app.handle_input(&InputEvent::Key('a'));
        app.handle_input(&InputEvent::Escape);
        assert_eq!(app.mode(), &Mode::Browse);
        assert_eq!(app.panel().items().len(), 1);
    }

    #[test]
    fn editing_a_price() {
        let mut app = app();
        add(&mut app, "Wood");
        app.handle_input(&InputEvent::Enter);
        assert!(matches!(app.mode(), Mode::Editing { field: Field::Price(id), buffer } if id == "WoodItem" && buffer.is_empty()));

        keys(&mut app, "1.234,56");
        app.handle_input(&InputEvent::Enter);
        assert_eq!(app.mode(), &Mode::Browse);
        assert_eq!(app.panel().item("WoodItem").unwrap().price, Some(1234.56));
        assert_eq!(
            app.store().get(INGREDIENTS_KEY).as_deref(),
            Some(r#"[{"id":"WoodItem","pr":1234.56}]"#)
        );
    }

    #[test]
    fn editing_starts_from_current_value() {
        let mut app = app();
        add(&mut app, "Wood");
        keys(&mut app, "12,5");
        app.handle_input(&InputEvent::Enter);

        app.handle_input(&InputEvent::Key('e'));
        assert!(matches!(app.mode(), Mode::Editing { buffer, .. } if buffer == "12.5"));
        app.handle_input(&InputEvent::Backspace);
        keys(&mut app, "75");
        app.handle_input(&InputEvent::Enter);
        assert_eq!(app.panel().item("WoodItem").unwrap().price, Some(12.75));
    }

    #[test]
    fn escape_discards_and_garbage_is_ignored() {
        let mut app = app();
        add(&mut app, "Wood");
        keys(&mut app, "5");
        app.handle_input(&InputEvent::Escape);
        assert_eq!(app.panel().item("WoodItem").unwrap().price, None);

        keys(&mut app, "-");
        app.handle_input(&InputEvent::Enter);
        assert_eq!(app.panel().item("WoodItem").unwrap().price, None);
        assert_eq!(app.store().get(INGREDIENTS_KEY).as_deref(), Some(r#"[{"id":"WoodItem"}]"#));
    }

    #[test]
    fn editor_ignores_letters_and_caps_length() {
        let mut app = app();
        app.handle_input(&InputEvent::Enter);
        app.handle_input(&InputEvent::Backspace);
        keys(&mut app, "x");
        keys(&mut app, &"9".repeat(40));
        let Mode::Editing { buffer, .. } = app.mode() else {
            panic!("expected the editor to be open");
        };
        assert_eq!(buffer.len(), MAX_INPUT_LEN);
        assert!(buffer.chars().all(|c| c == '9'));
    }

    #[test]
    fn labor_and_profit_feed_quotes() {
        let mut app = app();
        add(&mut app, "Log");
        keys(&mut app, "2");
        app.handle_input(&InputEvent::Enter);

        app.handle_input(&InputEvent::Click(actions::EDIT_LABOR_COST));
        app.handle_input(&InputEvent::Backspace);
        keys(&mut app, "100");
        app.handle_input(&InputEvent::Click(actions::EDIT_PROFIT_PERCENT));
        app.handle_input(&InputEvent::Backspace);
        keys(&mut app, "50");
        app.handle_input(&InputEvent::Enter);

        assert_eq!(app.panel().labor_cost(), 100.0);
        assert_eq!(app.panel().profit_percent(), 50.0);
        // (2 + 100 * 30 / 1000) * 1.5
        let board = &app.quotes()[0];
        assert!((board.unit_price - 7.5).abs() < 1e-9);
        assert_eq!(app.store().get(LABOR_COST_KEY).as_deref(), Some("\"100\""));
        assert_eq!(app.store().get(PROFIT_PERCENT_KEY).as_deref(), Some("\"50\""));
    }

    #[test]
    fn remove_selected_row() {
        let mut app = app();
        add(&mut app, "Wood");
        add(&mut app, "Stone");
        app.handle_input(&InputEvent::Up);
        assert_eq!(app.selected_row(), Row::Ingredient(0));
        app.handle_input(&InputEvent::Key('d'));
        assert_eq!(names(&app), vec!["Wood"]);

        // nothing to remove on a settings row
        app.handle_input(&InputEvent::Down);
        assert_eq!(app.selected_row(), Row::LaborCost);
        assert!(!app.handle_input(&InputEvent::Key('d')));
        assert_eq!(names(&app), vec!["Wood"]);
    }

    #[test]
    fn cursor_is_clamped_after_removal() {
        let mut app = app();
        add(&mut app, "Wood");
        app.handle_input(&InputEvent::Click(actions::INGREDIENT_BASE));
        app.handle_input(&InputEvent::Escape);
        for _ in 0..5 {
            app.handle_input(&InputEvent::Down);
        }
        assert_eq!(app.selected_row(), Row::ProfitPercent);
        app.handle_input(&InputEvent::Up);
        app.handle_input(&InputEvent::Up);
        app.handle_input(&InputEvent::Key('d'));
        assert_eq!(app.selected_row(), Row::LaborCost);
    }

    #[test]
    fn switching_language_renames_and_resaves() {
        let mut app = app();
        add(&mut app, "Wood");
        add(&mut app, "Egg");
        app.handle_input(&InputEvent::Click(actions::EDIT_LABOR_COST));
        app.handle_input(&InputEvent::Backspace);
        keys(&mut app, "7.5");
        app.handle_input(&InputEvent::Enter);
        // select Wood
        app.handle_input(&InputEvent::Click(actions::INGREDIENT_BASE + 1));
        app.handle_input(&InputEvent::Escape);

        let de = Locale::find("de").unwrap();
        app.handle_input(&InputEvent::Click(actions::LOCALE_BASE + de.index() as u16));

        assert_eq!(app.panel().locale().code, "de-DE");
        assert_eq!(names(&app), vec!["Ei", "Holz"]);
        assert_eq!(app.selected_row(), Row::Ingredient(1));
        assert_eq!(app.store().get(LABOR_COST_KEY).as_deref(), Some("\"7,5\""));
        assert_eq!(app.store().get(LOCALE_KEY).as_deref(), Some("\"de-DE\""));
        assert_eq!(app.item_name("GlassItem"), "Glas");
    }

    #[test]
    fn stored_language_wins_on_next_load() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('l'));
        assert_eq!(app.panel().locale().code, LOCALES[1].code);

        let saved = app.store().get(LOCALE_KEY).unwrap();
        let mut store = MemoryStore::new();
        store.set(LOCALE_KEY, &saved).unwrap();
        let reloaded = app_with(store, &mut MemoryCookieJar::default(), Some("ja"));
        assert_eq!(reloaded.panel().locale().code, LOCALES[1].code);
    }

    #[test]
    fn language_click_closes_editor() {
        let mut app = app();
        app.handle_input(&InputEvent::Enter);
        keys(&mut app, "3");
        app.handle_input(&InputEvent::Click(actions::LOCALE_BASE + 2));
        assert_eq!(app.mode(), &Mode::Browse);
        assert_eq!(app.panel().labor_cost(), 0.0);
    }

    #[test]
    fn unknown_clicks_are_not_consumed() {
        let mut app = app();
        assert!(!app.handle_input(&InputEvent::Click(actions::INGREDIENT_BASE + 7)));
        assert!(!app.handle_input(&InputEvent::Click(999)));
        assert!(!app.handle_input(&InputEvent::Key('z')));
    }
}
