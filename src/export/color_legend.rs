//! Color legend and category style rules.
//!
//! Both renderers color keys through one CSS class per [`KeyCategory`]
//! (`key-shift`, `key-layer-change`, ...). This module produces those rules
//! and the legend listing every category with its color.

use std::fmt::Write as _;

use crate::export::escape;
use crate::models::{CategoryPalette, KeyCategory, RgbColor};

/// Percentage applied to a fill color to get its outline color.
const OUTLINE_DIM: u8 = 60;

/// CSS class of a key in a category.
#[must_use]
pub fn category_class(category: KeyCategory) -> String {
    format!("key-{}", category.css_name())
}

/// Every category with its resolved fill color, in legend order.
#[must_use]
pub fn legend_entries(palette: &CategoryPalette) -> Vec<(KeyCategory, RgbColor)> {
    KeyCategory::ALL
        .iter()
        .map(|&category| (category, palette.color(category)))
        .collect()
}

/// SVG style rules: one `fill`/`stroke` pair per category.
#[must_use]
pub fn svg_category_rules(palette: &CategoryPalette) -> String {
    let mut out = String::new();
    for (category, color) in legend_entries(palette) {
        let _ = writeln!(
            out,
            "    .{} {{ fill: {}; stroke: {}; }}",
            category_class(category),
            color.to_hex(),
            color.dim(OUTLINE_DIM).to_hex()
        );
    }
    out
}

/// CSS rules: one `background` per category.
#[must_use]
pub fn html_category_rules(palette: &CategoryPalette) -> String {
    let mut out = String::new();
    for (category, color) in legend_entries(palette) {
        let _ = writeln!(
            out,
            "    .{} {{ background: {}; }}",
            category_class(category),
            color.to_hex()
        );
    }
    out
}

/// HTML legend block listing each category's color.
#[must_use]
pub fn generate_color_legend(palette: &CategoryPalette) -> String {
    let mut out = String::from("<div class=\"legend\">\n");
    for (category, color) in legend_entries(palette) {
        let _ = writeln!(
            out,
            "  <div class=\"legend-item\"><span class=\"color-box\" style=\"background: {};\"></span>{}</div>",
            color.to_hex(),
            escape(category.display_name())
        );
    }
    out.push_str("</div>\n");
    out
}
