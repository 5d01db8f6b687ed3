//! View state of the calculator screen: what is selected and what is being
//! edited. Domain state lives in [`IngredientPanel`](crate::ingredients::IngredientPanel).

/// A value the user can type into.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Price of the selected ingredient with this `name_id`.
    Price(String),
    LaborCost,
    ProfitPercent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Moving the cursor over the rows.
    Browse,
    /// Typing a number; committed on Enter.
    Editing { field: Field, buffer: String },
    /// Choosing an unselected catalog item to add.
    Picking { cursor: usize },
}

/// Longest number the editor accepts.
pub const MAX_INPUT_LEN: usize = 24;

/// Row the browse cursor sits on.
///
/// Rows are the selected ingredients in display order followed by the labor
/// cost and profit settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Row {
    Ingredient(usize),
    LaborCost,
    ProfitPercent,
}

impl Row {
    pub fn from_cursor(cursor: usize, ingredient_count: usize) -> Row {
        if cursor < ingredient_count {
            Row::Ingredient(cursor)
        } else if cursor == ingredient_count {
            Row::LaborCost
        } else {
            Row::ProfitPercent
        }
    }

    pub fn row_count(ingredient_count: usize) -> usize {
        ingredient_count + 2
    }
}

/// Characters the number editor accepts.
pub fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | ' ')
}
