//! Layer and key model construction from resolved keymap text.

use crate::diagnostics::Diagnostics;
use crate::models::{Key, Layer, LayoutProfile};
use crate::parser::devicetree::{self, Node};
use crate::services::labels::BEHAVIOR_MARKER;

const COMPONENT: &str = "keymap";

/// Suffix removed from layer node names.
pub const LAYER_SUFFIX: &str = "_layer";

/// Bindings that occupy a position without drawing a key.
pub const PLACEHOLDER_BINDINGS: &[&str] = &["&none", "&trans"];

/// Groups binding cells into one string per behavior.
///
/// A new binding starts at every cell carrying the behavior marker; the
/// following cells are its parameters.
///
/// # Examples
///
/// ```
/// use keymapviz::parser::keymap::split_bindings;
///
/// let bindings = split_bindings(&["&kp", "Q", "&mt", "LCTRL", "ESC", "&trans"]);
/// assert_eq!(bindings, vec!["&kp Q", "&mt LCTRL ESC", "&trans"]);
/// ```
#[must_use]
pub fn split_bindings(cells: &[&str]) -> Vec<String> {
    let mut bindings: Vec<String> = Vec::new();

    for cell in cells {
        match bindings.last_mut() {
            Some(current) if !cell.starts_with(BEHAVIOR_MARKER) => {
                current.push(' ');
                current.push_str(cell);
            }
            _ => bindings.push((*cell).to_string()),
        }
    }

    bindings
}

/// Returns true for bindings that produce no visible key.
#[must_use]
pub fn is_placeholder(binding: &str) -> bool {
    PLACEHOLDER_BINDINGS.contains(&binding.trim())
}

/// Layer name for a node: the node name without a trailing `_layer`.
#[must_use]
pub fn layer_name(node_name: &str) -> &str {
    node_name.strip_suffix(LAYER_SUFFIX).unwrap_or(node_name)
}

fn build_layer(
    node: &Node,
    display_name: &str,
    cells: &[&str],
    profile: &LayoutProfile,
    diag: &mut Diagnostics,
) -> Layer {
    let name = layer_name(&node.name);
    let mut layer = Layer::new(name, display_name);
    let bindings = split_bindings(cells);

    if bindings.len() > profile.key_count {
        diag.warn(
            COMPONENT,
            format!(
                "Layer '{name}' has {} bindings, only the first {} are drawn",
                bindings.len(),
                profile.key_count
            ),
        );
    }

    for (index, binding) in bindings.iter().enumerate().take(profile.key_count) {
        if is_placeholder(binding) {
            continue;
        }
        if let Some(pos) = profile.position(index) {
            layer.add_key(Key::new(binding.as_str(), pos));
        }
    }

    diag.debug(
        COMPONENT,
        format!("Layer '{name}' ({display_name}): {} keys", layer.keys.len()),
    );
    layer
}

/// Parses every layer block of a keymap into the render model.
///
/// A layer block is any node carrying both a `display-name` string and a
/// `bindings` list. Placeholder bindings keep their position but produce no
/// key; bindings beyond the profile's key count are ignored.
pub fn parse_layers(text: &str, profile: &LayoutProfile, diag: &mut Diagnostics) -> Vec<Layer> {
    let doc = devicetree::parse(text, diag);
    let mut layers = Vec::new();

    for node in doc.descendants() {
        let display_name = node.string("display-name");
        let cells = node.cells("bindings");

        match (display_name, cells) {
            (Some(display_name), Some(cells)) => {
                layers.push(build_layer(node, display_name, &cells, profile, diag));
            }
            (None, None) => {}
            _ if node.name.ends_with(LAYER_SUFFIX) => {
                diag.warn(
                    COMPONENT,
                    format!(
                        "Layer block '{}' needs both display-name and bindings, skipped",
                        node.name
                    ),
                );
            }
            _ => {}
        }
    }

    diag.info(COMPONENT, format!("Parsed {} layers", layers.len()));
    layers
}
