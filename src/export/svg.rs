//! Static SVG rendering of all layers.
//!
//! Layers are stacked vertically, each in its own translated group with a
//! caption above the keys:
//!
//! ```text
//! <svg>
//!   <style>...</style>
//!   <g transform="translate(0, 0)">    Base Layer, keys
//!   <g transform="translate(0, 365)">  Nav Layer, keys
//! </svg>
//! ```

use std::fmt::Write as _;

use crate::export::color_legend::{category_class, svg_category_rules};
use crate::export::{escape, generated_stamp, KeyGrid, RenderOptions};
use crate::models::{GridPos, Key, Layer, LayoutProfile};

/// Vertical spacing of stacked labels on a key.
const LABEL_LINE: u32 = 15;

const BASE_STYLE: &str = "    .key { stroke-width: 1; }
    .key-label { font-family: monospace; font-size: 8px; }
    .key-sublabel { font-family: monospace; font-size: 6px; fill: #666666; }
    .layer-name { font-family: sans-serif; font-size: 20px; font-weight: bold; }
";

#[allow(clippy::cast_possible_truncation)]
fn to_u32(n: usize) -> u32 {
    n as u32
}

/// Height of one layer band, caption included.
fn layer_height(profile: &LayoutProfile, options: &RenderOptions) -> u32 {
    to_u32(profile.grid_rows()) * options.pitch() + options.header
}

/// Renders every layer into one SVG document.
///
/// # Arguments
///
/// * `layers` - Layers in display order
/// * `profile` - Physical layout used to size the grid
/// * `options` - Key size, spacing and palette
///
/// # Returns
///
/// The SVG document text. An empty layer list yields a valid, empty-sized
/// document.
#[must_use]
pub fn render_svg(layers: &[Layer], profile: &LayoutProfile, options: &RenderOptions) -> String {
    let band = layer_height(profile, options);
    let width = to_u32(profile.grid_columns()) * options.pitch();
    let height = band * to_u32(layers.len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    let _ = writeln!(out, "<!-- {} -->", generated_stamp());
    out.push_str("<style>\n");
    out.push_str(BASE_STYLE);
    out.push_str(&svg_category_rules(&options.palette));
    out.push_str("</style>\n");

    for (idx, layer) in layers.iter().enumerate() {
        let offset = to_u32(idx) * band;
        let _ = writeln!(out, "<g transform=\"translate(0, {offset})\">");
        let _ = writeln!(
            out,
            "  <text x=\"10\" y=\"25\" class=\"layer-name\">{} Layer</text>",
            escape(&layer.display_name)
        );

        let grid = KeyGrid::new(layer, profile);
        for (pos, key) in grid.keys() {
            render_key(&mut out, pos, key, options);
        }

        out.push_str("</g>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn render_key(out: &mut String, pos: GridPos, key: &Key, options: &RenderOptions) {
    let size = options.key_size;
    let x = to_u32(pos.col) * options.pitch();
    let y = to_u32(pos.row) * options.pitch() + options.header;
    let center = x + size / 2;

    let _ = writeln!(
        out,
        "  <rect x=\"{x}\" y=\"{y}\" width=\"{size}\" height=\"{size}\" rx=\"5\" class=\"key {}\"><title>{}</title></rect>",
        category_class(key.category),
        escape(&key.code)
    );

    match key.labels.as_slice() {
        [label] => {
            let _ = writeln!(
                out,
                "  <text x=\"{center}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" class=\"key-label\">{}</text>",
                y + size / 2,
                escape(label)
            );
        }
        labels => {
            for (i, label) in labels.iter().enumerate() {
                let class = if i == 0 { "key-label" } else { "key-sublabel" };
                let line_y = y + LABEL_LINE + to_u32(i) * LABEL_LINE;
                let _ = write!(
                    out,
                    "  <text x=\"{center}\" y=\"{line_y}\" text-anchor=\"middle\" class=\"{class}\">"
                );
                // multi-line annotations become tspans
                for (j, line) in label.lines().enumerate() {
                    if j == 0 {
                        out.push_str(&escape(line));
                    } else {
                        let _ = write!(
                            out,
                            "<tspan x=\"{center}\" dy=\"1.1em\">{}</tspan>",
                            escape(line)
                        );
                    }
                }
                out.push_str("</text>\n");
            }
        }
    }
}
