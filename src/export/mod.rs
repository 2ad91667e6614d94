//! Visual export of parsed keymap layers.
//!
//! This module turns the layer model into a static SVG document and an
//! interactive HTML page. Both renderers place keys on the same
//! [`KeyGrid`](keyboard_grid::KeyGrid) and leave empty cells blank.

pub mod color_legend;
pub mod html;
pub mod keyboard_grid;
pub mod svg;

use serde::{Deserialize, Serialize};

use crate::models::CategoryPalette;

pub use html::render_html;
pub use keyboard_grid::KeyGrid;
pub use svg::render_svg;

/// File name of the rendered SVG.
pub const SVG_FILE: &str = "keymap_layout.svg";

/// File name of the rendered HTML page.
pub const HTML_FILE: &str = "keymap_layout.html";

/// Rendering parameters shared by the SVG and HTML renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Edge length of a key in pixels
    pub key_size: u32,
    /// Gap between keys in pixels
    pub gap: u32,
    /// Height reserved above each layer for its caption
    pub header: u32,
    /// Page title
    pub title: String,
    /// Per-category color overrides
    pub palette: CategoryPalette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            key_size: 60,
            gap: 5,
            header: 40,
            title: "ZMK Keymap Visualization".to_string(),
            palette: CategoryPalette::default(),
        }
    }
}

impl RenderOptions {
    /// Distance between the origins of two adjacent keys.
    #[must_use]
    pub const fn pitch(&self) -> u32 {
        self.key_size + self.gap
    }
}

/// Escapes text for XML and HTML content and attribute values.
///
/// # Examples
///
/// ```
/// use keymapviz::export::escape;
///
/// assert_eq!(escape("<&\"'>"), "&lt;&amp;&quot;&#39;&gt;");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Generation stamp embedded as a comment in rendered documents.
pub(crate) fn generated_stamp() -> String {
    format!(
        "Generated by {} on {}",
        crate::constants::APP_NAME,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}
