//! Action IDs for calculator click targets.
//!
//! Registered during render and dispatched back through `InputEvent::Click`.

// ── Panel actions ───────────────────────────────────────────────
pub const OPEN_PICKER: u16 = 1;
pub const REMOVE_SELECTED: u16 = 2;
pub const EDIT_LABOR_COST: u16 = 3;
pub const EDIT_PROFIT_PERCENT: u16 = 4;
/// Leave the editor or picker without changes.
pub const CLOSE: u16 = 5;

// ── Language tabs (base + index into LOCALES) ───────────────────
pub const LOCALE_BASE: u16 = 100;

// ── Selected ingredient rows (base + row) ───────────────────────
pub const INGREDIENT_BASE: u16 = 200;

// ── Picker rows (base + index into the available items) ─────────
pub const PICK_BASE: u16 = 1000;

/// Offset of `id` inside the block starting at `base`, if it belongs to it.
pub fn offset(id: u16, base: u16, len: usize) -> Option<usize> {
    let index = id.checked_sub(base)? as usize;
    (index < len).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_stay_inside_their_block() {
        assert_eq!(offset(INGREDIENT_BASE + 3, INGREDIENT_BASE, 5), Some(3));
        assert_eq!(offset(INGREDIENT_BASE + 5, INGREDIENT_BASE, 5), None);
        assert_eq!(offset(OPEN_PICKER, INGREDIENT_BASE, 5), None);
        assert_eq!(offset(LOCALE_BASE, LOCALE_BASE, 0), None);
    }
}
