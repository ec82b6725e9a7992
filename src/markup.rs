//! Identifiers, classes and attributes stamped onto the page.
//!
//! Existing stylesheets select on these strings; they must not change.

use crate::events::Direction;

pub const CONTAINER_CLASS: &str = "wpg-slideshow__container";
pub const ITEM_CLASS: &str = "wpg-slideshow__item";
pub const IMAGE_CLASS: &str = "wpg-slideshow__img";
pub const BUTTON_CLASS: &str = "wpg-slideshow__button";

pub const DATA_SSID: &str = "data-ssid";
/// Always "false"; nothing reads it back.
pub const DATA_LOADED: &str = "data-loaded";

pub const BUTTON_TAG: &str = "a";

const ROOT_ID_PREFIX: &str = "wpg-slideshow-";
const SLIDE_ID_PREFIX: &str = "wpg-slide-";

/// `wpg-slideshow-<id>`
pub fn root_id(gallery: usize) -> String {
    format!("{ROOT_ID_PREFIX}{gallery}")
}

/// `wpg-slide-<item>`; only unique within one gallery.
pub fn slide_id(item: usize) -> String {
    format!("{SLIDE_ID_PREFIX}{item}")
}

/// `wpg-slideshow-<id>-prev` / `wpg-slideshow-<id>-next`
pub fn button_id(gallery: usize, direction: Direction) -> String {
    format!("{ROOT_ID_PREFIX}{gallery}-{direction}")
}

/// `wpg-slideshow__button--prev` / `wpg-slideshow__button--next`
pub fn button_modifier_class(direction: Direction) -> String {
    format!("{BUTTON_CLASS}--{direction}")
}

/// Value of the inline `display` property for a slide.
pub const fn display_value(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

/// Recover the gallery id carried by a control's `data-ssid`.
pub fn parse_ssid(raw: &str) -> Option<usize> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_the_legacy_scheme() {
        assert_eq!(root_id(0), "wpg-slideshow-0");
        assert_eq!(slide_id(3), "wpg-slide-3");
        assert_eq!(button_id(2, Direction::Prev), "wpg-slideshow-2-prev");
        assert_eq!(button_id(2, Direction::Next), "wpg-slideshow-2-next");
        assert_eq!(
            button_modifier_class(Direction::Next),
            "wpg-slideshow__button--next"
        );
    }

    #[test]
    fn ssid_parsing_tolerates_whitespace_only() {
        assert_eq!(parse_ssid(" 4 "), Some(4));
        assert_eq!(parse_ssid("-1"), None);
        assert_eq!(parse_ssid(""), None);
    }
}
