//! Output prices: what a crafted item should sell for given the selected
//! ingredient prices, the labor cost and the profit margin.

use crate::catalog::Recipe;
use crate::ingredients::IngredientPanel;

/// Price breakdown for one recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub recipe_id: String,
    /// `name_id` of the crafted item.
    pub output: String,
    pub ingredient_cost: f64,
    pub labor_cost: f64,
    /// Ingredient plus labor cost for one craft.
    pub total_cost: f64,
    /// Sale price per crafted unit, margin included.
    pub unit_price: f64,
    /// Ingredients that are unselected or have no price yet; they count as 0.
    pub missing: Vec<String>,
}

impl Quote {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn quote(recipe: &Recipe, panel: &IngredientPanel) -> Quote {
    let mut ingredient_cost = 0.0;
    let mut missing = Vec::new();
    for input in &recipe.ingredients {
        match panel.item(&input.id).and_then(|item| item.price) {
            Some(price) => ingredient_cost += price * input.quantity,
            None => missing.push(input.id.clone()),
        }
    }

    // labor cost is quoted per 1000 calories
    let labor_cost = panel.labor_cost() * recipe.calories / 1000.0;
    let total_cost = ingredient_cost + labor_cost;
    let with_margin = total_cost * (1.0 + panel.profit_percent() / 100.0);
    let unit_price = if recipe.output_quantity > 0.0 {
        with_margin / recipe.output_quantity
    } else {
        with_margin
    };

    Quote {
        recipe_id: recipe.id.clone(),
        output: recipe.output.clone(),
        ingredient_cost,
        labor_cost,
        total_cost,
        unit_price,
        missing,
    }
}

/// Quotes for every recipe that uses at least one selected ingredient.
pub fn quote_selected(recipes: &[Recipe], panel: &IngredientPanel) -> Vec<Quote> {
    recipes
        .iter()
        .filter(|r| r.ingredients.iter().any(|i| panel.exists(&i.id)))
        .map(|r| quote(r, panel))
        .collect()
}
