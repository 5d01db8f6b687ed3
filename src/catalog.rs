//! Craftable items, recipes, and localized item names.
//!
//! The panel only needs two narrow views of the catalog: resolving a
//! persisted id to an [`Item`] ([`ItemCatalog`]) and naming an item in a
//! language ([`ItemLocalizer`]). [`EmbeddedCatalog`] serves both from the
//! JSON bundled with the binary.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// A craftable resource as the ingredients panel holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Locale-independent unique key, e.g. `WoodItem`.
    pub name_id: String,
    /// Display name in the active language.
    pub name: String,
    /// User-supplied price; `None` until one is entered.
    pub price: Option<f64>,
    pub image_file: String,
    pub x_pos: u32,
    pub y_pos: u32,
    /// CSS filter applied to the sprite, if any.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("no item with id {0:?} in the catalog")]
    UnknownItem(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Source of the full item records persisted ids refer to.
pub trait ItemCatalog {
    fn items(&self) -> &[Item];

    fn find(&self, name_id: &str) -> Result<&Item, LookupError> {
        self.items()
            .iter()
            .find(|item| item.name_id == name_id)
            .ok_or_else(|| LookupError::UnknownItem(name_id.to_string()))
    }
}

/// Source of item display names per language.
pub trait ItemLocalizer {
    fn localize_item_name(&self, name_id: &str, lang_code: &str) -> String;
}

/// One input line of a recipe.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeIngredient {
    pub id: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    /// `name_id` of the crafted item.
    pub output: String,
    pub output_quantity: f64,
    /// Labor the craft costs, in calories.
    pub calories: f64,
    pub ingredients: Vec<RecipeIngredient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDef {
    #[serde(rename = "nameID")]
    name_id: String,
    image_file: String,
    x_pos: u32,
    y_pos: u32,
    #[serde(default)]
    filter: Option<String>,
    names: HashMap<String, String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    items: Vec<ItemDef>,
    #[serde(default)]
    recipes: Vec<Recipe>,
}

const FALLBACK_LANG: &str = "en";

/// Catalog backed by `data/items.json`.
pub struct EmbeddedCatalog {
    items: Vec<Item>,
    names: HashMap<String, HashMap<String, String>>,
    recipes: Vec<Recipe>,
}

impl EmbeddedCatalog {
    /// The catalog compiled into the binary, with names in `lang_code`.
    pub fn embedded(lang_code: &str) -> Result<Self, CatalogError> {
        Self::from_json(include_str!("../data/items.json"), lang_code)
    }

    pub fn from_json(json: &str, lang_code: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = EmbeddedCatalog {
            items: Vec::with_capacity(file.items.len()),
            names: HashMap::with_capacity(file.items.len()),
            recipes: file.recipes,
        };
        for def in file.items {
            catalog.names.insert(def.name_id.clone(), def.names);
            catalog.items.push(Item {
                name: String::new(),
                name_id: def.name_id,
                price: None,
                image_file: def.image_file,
                x_pos: def.x_pos,
                y_pos: def.y_pos,
                filter: def.filter,
            });
        }
        catalog.set_language(lang_code);
        Ok(catalog)
    }

    /// Rename every catalog item into `lang_code`.
    pub fn set_language(&mut self, lang_code: &str) {
        for i in 0..self.items.len() {
            let name = self.localize_item_name(&self.items[i].name_id, lang_code);
            self.items[i].name = name;
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl ItemCatalog for EmbeddedCatalog {
    fn items(&self) -> &[Item] {
        &self.items
    }
}

impl ItemLocalizer for EmbeddedCatalog {
    fn localize_item_name(&self, name_id: &str, lang_code: &str) -> String {
        self.names
            .get(name_id)
            .and_then(|names| names.get(lang_code).or_else(|| names.get(FALLBACK_LANG)))
            .cloned()
            .unwrap_or_else(|| name_id.to_string())
    }
}
