//! The ingredients panel: which items are selected, what they cost, and the
//! labor / profit settings the output prices are derived from.
//!
//! All mutation goes through [`IngredientPanel`]. Every successful change
//! queues exactly one [`PanelEvent`]; the host drains the queue after each
//! input and hands the events to persistence and pricing. Rejected input
//! (unparseable numbers, unchanged prices, unknown ids) changes nothing and
//! queues nothing.

use crate::catalog::{Item, ItemLocalizer};
use crate::locale::{compare_names, Locale};
use crate::migrate::RestoredState;
use crate::number::parse_decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    IngredientAdded(Item),
    IngredientRemoved(String),
    PriceChanged(Item),
    LaborCostChanged(f64),
    ProfitPercentChanged(f64),
}

impl PanelEvent {
    /// Whether the event changes the selected-ingredient list or its prices.
    pub fn touches_ingredients(&self) -> bool {
        matches!(
            self,
            PanelEvent::IngredientAdded(_)
                | PanelEvent::IngredientRemoved(_)
                | PanelEvent::PriceChanged(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct IngredientPanel {
    items: Vec<Item>,
    labor_cost: f64,
    profit_percent: f64,
    locale: Locale,
    events: Vec<PanelEvent>,
}

impl IngredientPanel {
    pub fn new(locale: Locale) -> Self {
        Self {
            items: Vec::new(),
            labor_cost: 0.0,
            profit_percent: 0.0,
            locale,
            events: Vec::new(),
        }
    }

    /// Seed the panel from state restored at page load. Restoring is not a
    /// change, so no events are queued.
    pub fn from_restored(restored: RestoredState, locale: Locale) -> Self {
        let mut panel = Self::new(locale);
        for item in restored.ingredients {
            if !panel.exists(&item.name_id) {
                panel.items.push(item);
            }
        }
        panel.labor_cost = restored.labor_cost;
        panel.profit_percent = restored.profit_percent;
        panel.sort();
        panel
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, name_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name_id == name_id)
    }

    pub fn labor_cost(&self) -> f64 {
        self.labor_cost
    }

    pub fn profit_percent(&self) -> f64 {
        self.profit_percent
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn exists(&self, name_id: &str) -> bool {
        self.items.iter().any(|item| item.name_id == name_id)
    }

    /// Select `item`. Returns `false` when it is already selected.
    pub fn add(&mut self, item: Item) -> bool {
        if self.exists(&item.name_id) {
            return false;
        }
        self.events.push(PanelEvent::IngredientAdded(item.clone()));
        self.items.push(item);
        self.sort();
        true
    }

    pub fn remove(&mut self, name_id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.name_id == name_id)?;
        let item = self.items.remove(index);
        self.events
            .push(PanelEvent::IngredientRemoved(item.name_id.clone()));
        Some(item)
    }

    /// Set an ingredient's price from user text. Returns `true` if the price
    /// changed.
    pub fn set_price(&mut self, name_id: &str, raw: &str) -> bool {
        let Ok(price) = parse_decimal(raw) else {
            return false;
        };
        let Some(item) = self.items.iter_mut().find(|item| item.name_id == name_id) else {
            return false;
        };
        if item.price == Some(price) {
            return false;
        }
        item.price = Some(price);
        self.events.push(PanelEvent::PriceChanged(item.clone()));
        true
    }

    pub fn set_labor_cost(&mut self, raw: &str) -> bool {
        match parse_decimal(raw) {
            Ok(value) => {
                self.labor_cost = value;
                self.events.push(PanelEvent::LaborCostChanged(value));
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_profit_percent(&mut self, raw: &str) -> bool {
        match parse_decimal(raw) {
            Ok(value) => {
                self.profit_percent = value;
                self.events.push(PanelEvent::ProfitPercentChanged(value));
                true
            }
            Err(_) => false,
        }
    }

    /// Stable reorder by display name, collated for the panel's locale.
    pub fn sort(&mut self) {
        let locale = self.locale;
        self.items.sort_by(|a, b| compare_names(&a.name, &b.name, &locale));
    }

    /// Switch to `locale`: rename every held item and re-sort. Prices, ids and
    /// sprite metadata are left alone.
    pub fn relocalize(&mut self, locale: Locale, localizer: &dyn ItemLocalizer) {
        self.locale = locale;
        let lang = locale.lang_code();
        for item in &mut self.items {
            item.name = localizer.localize_item_name(&item.name_id, lang);
        }
        self.sort();
    }

    /// Take the queued change events, oldest first.
    pub fn drain_events(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }
}
