//! Static localized UI text.
//!
//! The table ships inside the binary (`data/messages.json`) and is parsed once
//! on first use. Lookups never fail: a missing language falls back to English,
//! a missing id to the id itself.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

const FALLBACK_LANG: &str = "en";

#[derive(Deserialize)]
struct MessageEntry {
    id: String,
    text: HashMap<String, String>,
}

/// `message id → (lang → text)`.
type MessageTable = HashMap<String, HashMap<String, String>>;

static MESSAGES: OnceLock<MessageTable> = OnceLock::new();

fn table() -> &'static MessageTable {
    MESSAGES.get_or_init(|| {
        match serde_json::from_str::<Vec<MessageEntry>>(include_str!("../data/messages.json")) {
            Ok(entries) => entries.into_iter().map(|e| (e.id, e.text)).collect(),
            Err(e) => {
                tracing::error!("message table is unreadable: {e}");
                HashMap::new()
            }
        }
    })
}

/// Localized text for `id` in `lang`.
pub fn message<'a>(id: &'a str, lang: &str) -> &'a str {
    let Some(texts) = table().get(id) else {
        return id;
    };
    texts
        .get(lang)
        .or_else(|| texts.get(FALLBACK_LANG))
        .map(String::as_str)
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_by_language() {
        assert_eq!(message("ingredientsHeader", "en"), "Inputs");
        assert_eq!(message("ingredientsHeader", "de"), "Eingänge");
        assert_eq!(message("profitPercentLabel", "ja"), "利益率");
    }

    #[test]
    fn missing_language_falls_back_to_english() {
        assert_eq!(message("navTitleVisualizer", "de"), "Recipe Visualizer");
        assert_eq!(message("calorieCostLabel", "xx"), "Price Per 1000 Calories");
    }

    #[test]
    fn missing_id_falls_back_to_id() {
        assert_eq!(message("noSuchMessage", "en"), "noSuchMessage");
        assert!(!table().contains_key("noSuchMessage"));
    }

    #[test]
    fn every_entry_has_english() {
        for (id, texts) in table() {
            assert!(texts.contains_key(FALLBACK_LANG), "{id} has no English text");
        }
    }
}
