//! Restores the panel state at page load, moving legacy cookies into
//! `localStorage` on the way.
//!
//! ## Wire formats
//!
//! - **v0 (legacy cookies)**: `ingredients` holds base64-encoded JSON
//!   `[{"id": nameID, "pr": price}]`; `laborCost` / `profitPercent` hold
//!   locale-formatted decimal text. Read once, then deleted.
//! - **v1 (localStorage)**: `ingredients` holds the same record array as plain
//!   JSON; `laborCost` / `profitPercent` hold a JSON string with the decimal
//!   formatted in the locale active when it was written.
//!
//! Each of the three slots is restored independently:
//!
//! 1. a v1 value in storage wins and the cookie is never looked at;
//! 2. otherwise a v0 cookie is decoded, written to storage as v1, and deleted;
//! 3. otherwise the slot keeps its default (no ingredients, `0`).
//!
//! Once step 2 has run the cookie is gone, so later loads always take step 1.
//! Unreadable values are logged and dropped rather than aborting the load.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Item, ItemCatalog};
use crate::locale::Locale;
use crate::number::{format_decimal, parse_decimal, ParseError};
use crate::storage::{CookieJar, KeyValueStore};

pub const INGREDIENTS_KEY: &str = "ingredients";
pub const LABOR_COST_KEY: &str = "laborCost";
pub const PROFIT_PERCENT_KEY: &str = "profitPercent";

/// Browsers' `atob` accepts input with or without `=` padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// One persisted ingredient selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<f64>,
}

impl From<&Item> for IngredientRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.name_id.clone(),
            pr: item.price,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Number(#[from] ParseError),
}

pub fn decode_cookie_ingredients_v0(raw: &str) -> Result<Vec<IngredientRecord>, DecodeError> {
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT_BASE64.decode(compact)?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn decode_cookie_scalar_v0(raw: &str) -> Result<f64, DecodeError> {
    Ok(parse_decimal(raw)?)
}

pub fn decode_stored_ingredients_v1(raw: &str) -> Result<Vec<IngredientRecord>, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn encode_stored_ingredients_v1(records: &[IngredientRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScalar {
    Text(String),
    Number(f64),
}

/// Accepts the v1 JSON string, a bare JSON number, or unquoted decimal text.
pub fn decode_stored_scalar_v1(raw: &str) -> Result<f64, DecodeError> {
    match serde_json::from_str::<StoredScalar>(raw) {
        Ok(StoredScalar::Number(n)) => Ok(n),
        Ok(StoredScalar::Text(text)) => Ok(parse_decimal(&text)?),
        Err(_) => Ok(parse_decimal(raw)?),
    }
}

pub fn encode_stored_scalar_v1(value: f64, locale: &Locale) -> String {
    serde_json::Value::String(format_decimal(value, locale)).to_string()
}

/// Panel state recovered at page load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestoredState {
    pub ingredients: Vec<Item>,
    pub labor_cost: f64,
    pub profit_percent: f64,
}

/// Restore all three slots, migrating legacy cookies into `store`.
///
/// Persisted ids are resolved against `catalog`; ids it does not know are
/// skipped with a warning, and repeated ids keep their first occurrence.
pub fn migrate(
    store: &mut dyn KeyValueStore,
    cookies: &mut dyn CookieJar,
    catalog: &dyn ItemCatalog,
    locale: &Locale,
) -> RestoredState {
    let records = restore_ingredients(store, cookies);
    RestoredState {
        ingredients: resolve(records, catalog),
        labor_cost: restore_scalar(store, cookies, LABOR_COST_KEY, locale),
        profit_percent: restore_scalar(store, cookies, PROFIT_PERCENT_KEY, locale),
    }
}

fn restore_ingredients(store: &mut dyn KeyValueStore, cookies: &mut dyn CookieJar) -> Vec<IngredientRecord> {
    if let Some(raw) = store.get(INGREDIENTS_KEY) {
        match decode_stored_ingredients_v1(&raw) {
            Ok(records) => return records,
            Err(e) => {
                warn!(key = INGREDIENTS_KEY, "discarding unreadable stored value: {e}");
                store.remove(INGREDIENTS_KEY);
            }
        }
    }

    let Some(raw) = cookies.get(INGREDIENTS_KEY) else {
        return Vec::new();
    };
    let records = match decode_cookie_ingredients_v0(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(key = INGREDIENTS_KEY, "discarding unreadable legacy cookie: {e}");
            cookies.delete(INGREDIENTS_KEY);
            return Vec::new();
        }
    };

    let written = encode_stored_ingredients_v1(&records)
        .map_err(|e| e.to_string())
        .and_then(|json| store.set(INGREDIENTS_KEY, &json).map_err(|e| e.to_string()));
    match written {
        Ok(()) => {
            cookies.delete(INGREDIENTS_KEY);
            debug!(count = records.len(), "migrated legacy ingredients cookie");
        }
        // Keep the cookie so the next load retries the move.
        Err(e) => warn!(key = INGREDIENTS_KEY, "legacy cookie kept, storage write failed: {e}"),
    }
    records
}

fn restore_scalar(
    store: &mut dyn KeyValueStore,
    cookies: &mut dyn CookieJar,
    key: &str,
    locale: &Locale,
) -> f64 {
    if let Some(raw) = store.get(key) {
        match decode_stored_scalar_v1(&raw) {
            Ok(value) => return value,
            Err(e) => {
                warn!(key, "discarding unreadable stored value: {e}");
                store.remove(key);
            }
        }
    }

    let Some(raw) = cookies.get(key) else {
        return 0.0;
    };
    let value = match decode_cookie_scalar_v0(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, "discarding unreadable legacy cookie: {e}");
            cookies.delete(key);
            return 0.0;
        }
    };

    match store.set(key, &encode_stored_scalar_v1(value, locale)) {
        Ok(()) => {
            cookies.delete(key);
            debug!(key, value, "migrated legacy cookie");
        }
        Err(e) => warn!(key, "legacy cookie kept, storage write failed: {e}"),
    }
    value
}

fn resolve(records: Vec<IngredientRecord>, catalog: &dyn ItemCatalog) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::with_capacity(records.len());
    for record in records {
        if items.iter().any(|item| item.name_id == record.id) {
            warn!(id = %record.id, "duplicate persisted ingredient, keeping the first");
            continue;
        }
        match catalog.find(&record.id) {
            Ok(item) => {
                let mut item = item.clone();
                item.price = record.pr;
                items.push(item);
            }
            Err(e) => warn!("skipping persisted ingredient: {e}"),
        }
    }
    items
}
