use std::path::Path;

use anyhow::{Result, ensure};
use serde::Deserialize;

/// Describes the gallery markup the controller looks for, plus the few
/// presentation strings it injects. Defaults match the WordPress gallery block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MarkupConfig {
    /// Class marking a slideshow root.
    pub root_class: String,
    /// Class of the gallery grid nested inside a root.
    pub container_class: String,
    /// Class of one slide inside the grid.
    pub item_class: String,
    /// Tag of the images nested in each slide.
    pub image_tag: String,
    /// Inline style applied to every slide before its display toggle.
    pub item_margin_override: String,
    pub prev_glyph: String,
    pub next_glyph: String,
}

impl MarkupConfig {
    pub const DEFAULT_ROOT_CLASS: &'static str = "wpg-slideshow";
    pub const DEFAULT_CONTAINER_CLASS: &'static str = "blocks-gallery-grid";
    pub const DEFAULT_ITEM_CLASS: &'static str = "blocks-gallery-item";
    pub const DEFAULT_IMAGE_TAG: &'static str = "img";
    pub const DEFAULT_ITEM_MARGIN_OVERRIDE: &'static str = "margin-bottom: 0!important";
    /// `&#10094`
    pub const DEFAULT_PREV_GLYPH: &'static str = "\u{276E}";
    /// `&#10095`
    pub const DEFAULT_NEXT_GLYPH: &'static str = "\u{276F}";

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&s)
    }

    /// Validate invariants that serde defaults alone cannot express.
    pub fn validated(self) -> Result<Self> {
        for (field, value) in [
            ("root-class", &self.root_class),
            ("container-class", &self.container_class),
            ("item-class", &self.item_class),
            ("image-tag", &self.image_tag),
        ] {
            ensure!(!value.trim().is_empty(), "{field} must not be blank");
            ensure!(
                !value.chars().any(char::is_whitespace),
                "{field} must be a single token, got '{value}'"
            );
        }
        ensure!(
            !self.prev_glyph.trim().is_empty(),
            "prev-glyph must not be blank"
        );
        ensure!(
            !self.next_glyph.trim().is_empty(),
            "next-glyph must not be blank"
        );
        Ok(self)
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            root_class: Self::DEFAULT_ROOT_CLASS.into(),
            container_class: Self::DEFAULT_CONTAINER_CLASS.into(),
            item_class: Self::DEFAULT_ITEM_CLASS.into(),
            image_tag: Self::DEFAULT_IMAGE_TAG.into(),
            item_margin_override: Self::DEFAULT_ITEM_MARGIN_OVERRIDE.into(),
            prev_glyph: Self::DEFAULT_PREV_GLYPH.into(),
            next_glyph: Self::DEFAULT_NEXT_GLYPH.into(),
        }
    }
}
