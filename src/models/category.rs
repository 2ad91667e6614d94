//! Key categories used to color rendered keys.

use crate::models::RgbColor;
use serde::{Deserialize, Serialize};

/// Semantic category of a binding, used for key coloring and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyCategory {
    /// Shift keys and shifted hold-taps
    Shift,
    /// Ctrl, Alt and GUI modifiers
    Modifier,
    /// Momentary, layer-tap and toggle layer changes
    LayerChange,
    /// Tap dances
    TapDance,
    /// Combo-related bindings
    Combo,
    /// Everything else
    Regular,
}

impl KeyCategory {
    /// All categories in legend order.
    pub const ALL: [KeyCategory; 6] = [
        KeyCategory::Shift,
        KeyCategory::Modifier,
        KeyCategory::LayerChange,
        KeyCategory::TapDance,
        KeyCategory::Combo,
        KeyCategory::Regular,
    ];

    /// Default fill color.
    #[must_use]
    pub const fn default_color(self) -> RgbColor {
        match self {
            Self::Shift => RgbColor::new(0xff, 0xcc, 0xcc),
            Self::Modifier => RgbColor::new(0xcc, 0xe5, 0xff),
            Self::LayerChange => RgbColor::new(0xe6, 0xff, 0xcc),
            Self::TapDance => RgbColor::new(0xff, 0xe6, 0xcc),
            Self::Combo => RgbColor::new(0xe6, 0xcc, 0xff),
            Self::Regular => RgbColor::new(0xf2, 0xf2, 0xf2),
        }
    }

    /// Legend label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Shift => "Shift",
            Self::Modifier => "Modifiers",
            Self::LayerChange => "Layer Change",
            Self::TapDance => "Tap Dance",
            Self::Combo => "Combos",
            Self::Regular => "Regular Keys",
        }
    }

    /// CSS class name suffix (e.g. `key-layer-change`).
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Modifier => "modifier",
            Self::LayerChange => "layer-change",
            Self::TapDance => "tap-dance",
            Self::Combo => "combo",
            Self::Regular => "regular",
        }
    }
}

/// Category → fill color mapping, defaults overridable from config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CategoryPalette {
    /// Override for shift keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<RgbColor>,
    /// Override for modifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<RgbColor>,
    /// Override for layer changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_change: Option<RgbColor>,
    /// Override for tap dances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap_dance: Option<RgbColor>,
    /// Override for combos
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo: Option<RgbColor>,
    /// Override for regular keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular: Option<RgbColor>,
}

impl CategoryPalette {
    /// Resolves the fill color for a category.
    #[must_use]
    pub fn color(&self, category: KeyCategory) -> RgbColor {
        let overridden = match category {
            KeyCategory::Shift => self.shift,
            KeyCategory::Modifier => self.modifier,
            KeyCategory::LayerChange => self.layer_change,
            KeyCategory::TapDance => self.tap_dance,
            KeyCategory::Combo => self.combo,
            KeyCategory::Regular => self.regular,
        };
        overridden.unwrap_or_else(|| category.default_color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_colors() {
        assert_eq!(KeyCategory::Shift.default_color().to_hex(), "#ffcccc");
        assert_eq!(KeyCategory::Regular.default_color().to_hex(), "#f2f2f2");
    }

    #[test]
    fn test_palette_override() {
        let palette = CategoryPalette {
            combo: Some(RgbColor::new(1, 2, 3)),
            ..CategoryPalette::default()
        };

        assert_eq!(palette.color(KeyCategory::Combo), RgbColor::new(1, 2, 3));
        assert_eq!(
            palette.color(KeyCategory::TapDance),
            KeyCategory::TapDance.default_color()
        );
    }

    #[test]
    fn test_palette_from_toml() {
        let palette: CategoryPalette =
            toml::from_str("layer-change = \"#00ff00\"\nshift = \"#ff0000\"").unwrap();

        assert_eq!(
            palette.color(KeyCategory::LayerChange),
            RgbColor::new(0, 255, 0)
        );
        assert_eq!(palette.color(KeyCategory::Shift), RgbColor::new(255, 0, 0));
    }
}
