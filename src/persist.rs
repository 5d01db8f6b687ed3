//! Writes panel changes back to durable storage in the v1 format
//! (see [`crate::migrate`]).

use tracing::{debug, warn};

use crate::ingredients::{IngredientPanel, PanelEvent};
use crate::locale::Locale;
use crate::migrate::{
    encode_stored_ingredients_v1, encode_stored_scalar_v1, IngredientRecord, INGREDIENTS_KEY,
    LABOR_COST_KEY, PROFIT_PERCENT_KEY,
};
use crate::storage::KeyValueStore;

/// Selected UI locale; app-level, the panel never reads it.
pub const LOCALE_KEY: &str = "locale";

/// Persist the slots touched by `events`, each at most once.
pub fn persist_events(store: &mut dyn KeyValueStore, panel: &IngredientPanel, events: &[PanelEvent]) {
    if events.iter().any(PanelEvent::touches_ingredients) {
        save_ingredients(store, panel);
    }
    if events.iter().any(|e| matches!(e, PanelEvent::LaborCostChanged(_))) {
        save_scalar(store, LABOR_COST_KEY, panel.labor_cost(), panel.locale());
    }
    if events.iter().any(|e| matches!(e, PanelEvent::ProfitPercentChanged(_))) {
        save_scalar(store, PROFIT_PERCENT_KEY, panel.profit_percent(), panel.locale());
    }
}

/// Persist every slot, e.g. after a locale switch changed the scalar notation.
pub fn persist_all(store: &mut dyn KeyValueStore, panel: &IngredientPanel) {
    save_ingredients(store, panel);
    save_scalar(store, LABOR_COST_KEY, panel.labor_cost(), panel.locale());
    save_scalar(store, PROFIT_PERCENT_KEY, panel.profit_percent(), panel.locale());
}

fn save_ingredients(store: &mut dyn KeyValueStore, panel: &IngredientPanel) {
    let records: Vec<IngredientRecord> = panel.items().iter().map(IngredientRecord::from).collect();
    let json = match encode_stored_ingredients_v1(&records) {
        Ok(json) => json,
        Err(e) => {
            warn!("failed to serialize ingredients: {e}");
            return;
        }
    };
    match store.set(INGREDIENTS_KEY, &json) {
        Ok(()) => debug!(count = records.len(), "saved ingredients"),
        Err(e) => warn!("{e}"),
    }
}

fn save_scalar(store: &mut dyn KeyValueStore, key: &str, value: f64, locale: &Locale) {
    match store.set(key, &encode_stored_scalar_v1(value, locale)) {
        Ok(()) => debug!(key, value, "saved setting"),
        Err(e) => warn!("{e}"),
    }
}

pub fn save_locale(store: &mut dyn KeyValueStore, locale: &Locale) {
    let json = serde_json::Value::String(locale.code.to_string()).to_string();
    if let Err(e) = store.set(LOCALE_KEY, &json) {
        warn!("{e}");
    }
}

pub fn stored_locale(store: &dyn KeyValueStore) -> Option<Locale> {
    let raw = store.get(LOCALE_KEY)?;
    let code: String = serde_json::from_str(&raw).unwrap_or(raw);
    Locale::find(&code)
}
