//! Sprite metadata derived from an item: where its icon lives and how to cut
//! it out of the sprite sheet.

use crate::catalog::Item;

/// Edge length of one icon in the sprite sheets, in pixels.
pub const ITEM_SPRITE_SIZE: u32 = 32;

/// Has its own standalone icon instead of a sheet cell.
const LIGHT_BULB_ID: &str = "LightBulbItem";
const BAKED_ICON_SHEET: &str = "UI_Icons_Baked_0.png";

fn is_light_bulb(item: &Item) -> bool {
    item.name_id == LIGHT_BULB_ID
}

pub fn image_url(item: &Item, image_base_url: &str) -> String {
    if is_light_bulb(item) {
        format!("{image_base_url}lightbulb.png")
    } else {
        format!("{image_base_url}{}", item.image_file)
    }
}

/// CSS `background-position` of the item's cell.
pub fn sprite_position(item: &Item) -> String {
    if is_light_bulb(item) {
        return "0px 0px".to_string();
    }
    format!(
        "-{}px -{}px",
        item.x_pos * ITEM_SPRITE_SIZE,
        item.y_pos * ITEM_SPRITE_SIZE
    )
}

/// CSS `background-size` of the sheet the item lives on.
pub fn background_size(item: &Item) -> &'static str {
    if is_light_bulb(item) {
        "32px"
    } else if item.image_file == BAKED_ICON_SHEET {
        "2048px"
    } else {
        "512px"
    }
}

pub fn filter(item: &Item) -> &str {
    item.filter.as_deref().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name_id: &str, image_file: &str, x: u32, y: u32) -> Item {
        Item {
            name_id: name_id.to_string(),
            name: name_id.to_string(),
            price: None,
            image_file: image_file.to_string(),
            x_pos: x,
            y_pos: y,
            filter: None,
        }
    }

    #[test]
    fn light_bulb_uses_fixed_icon() {
        let bulb = item("LightBulbItem", "items.png", 7, 3);
        assert_eq!(image_url(&bulb, "img/"), "img/lightbulb.png");
        assert_eq!(sprite_position(&bulb), "0px 0px");
        assert_eq!(background_size(&bulb), "32px");
    }

    #[test]
    fn sheet_items_are_cut_by_position() {
        let wood = item("WoodItem", "UI_Icons_Baked_0.png", 12, 40);
        assert_eq!(image_url(&wood, "img/"), "img/UI_Icons_Baked_0.png");
        assert_eq!(sprite_position(&wood), "-384px -1280px");
        assert_eq!(background_size(&wood), "2048px");

        let glass = item("GlassItem", "items.png", 0, 1);
        assert_eq!(sprite_position(&glass), "-0px -32px");
        assert_eq!(background_size(&glass), "512px");
    }

    #[test]
    fn filter_defaults_to_empty() {
        let mut wire = item("CopperWiringItem", "items.png", 5, 3);
        assert_eq!(filter(&wire), "");
        wire.filter = Some("hue-rotate(20deg)".to_string());
        assert_eq!(filter(&wire), "hue-rotate(20deg)");
    }
}
