//! Combo extraction from combo definition sources.
//!
//! Two forms are recognized, in source order:
//!
//! ```text
//! combos {
//!     compatible = "zmk,combos";
//!     combo_esc {
//!         key-positions = <LT1 LT2>;
//!         bindings = <&kp ESC>;
//!         layers = <BASE>;
//!     };
//! };
//!
//! ZMK_COMBO(tab, &kp TAB, LM1 LM2, BASE NAV)
//! ```
//!
//! A combo is only recorded when at least one position resolves and a
//! binding is present; otherwise the whole block is dropped with a warning.

use crate::diagnostics::Diagnostics;
use crate::models::{ComboRecord, KeyPositionTable, LayerRegistry};
use crate::parser::devicetree::{self, MacroCall, Node};

const COMPONENT: &str = "combos";

/// Macro names that declare a combo.
const COMBO_MACROS: &[&str] = &["ZMK_COMBO"];

/// Reduces a combo binding to the form drawn on the layout.
///
/// `&kp X` becomes `X`; every other binding is kept as written, with
/// whitespace collapsed.
#[must_use]
pub fn simplify_binding(binding: &str) -> String {
    let parts: Vec<&str> = binding.split_whitespace().collect();
    match parts.as_slice() {
        ["&kp", key] => (*key).to_string(),
        _ => parts.join(" "),
    }
}

/// A combo block before resolution.
struct RawCombo<'a> {
    name: &'a str,
    offset: usize,
    positions: Vec<&'a str>,
    binding: Option<String>,
    layers: Vec<&'a str>,
}

impl<'a> RawCombo<'a> {
    fn from_node(node: &'a Node) -> Option<Self> {
        let positions = node.cells("key-positions")?;
        let binding = node
            .cells("bindings")
            .map(|cells| cells.join(" "))
            .filter(|b| !b.trim().is_empty());

        Some(Self {
            name: &node.name,
            offset: node.offset,
            positions,
            binding,
            layers: node.cells("layers").unwrap_or_default(),
        })
    }

    fn from_macro(call: &'a MacroCall) -> Option<Self> {
        if !COMBO_MACROS.contains(&call.name.as_str()) {
            return None;
        }

        let arg = move |idx: usize| call.args.get(idx).map(String::as_str).unwrap_or_default();
        Some(Self {
            name: arg(0),
            offset: call.offset,
            positions: arg(2).split_whitespace().collect(),
            binding: Some(arg(1).to_string()).filter(|b| !b.trim().is_empty()),
            layers: arg(3).split_whitespace().collect(),
        })
    }
}

/// Extracts combo records from combo definition text.
///
/// Position tokens resolve through `positions` (numeric tokens pass
/// through); tokens that resolve to nothing are dropped with a warning.
/// Layer tokens resolve through `layers` when a registry is given, otherwise
/// only numeric layer tokens are kept.
///
/// # Examples
///
/// ```
/// use keymapviz::diagnostics::Diagnostics;
/// use keymapviz::models::{KeyPositionTable, LayoutProfile};
/// use keymapviz::parser::combos::extract_combos;
///
/// let positions = KeyPositionTable::fallback(&LayoutProfile::sofle());
/// let mut diag = Diagnostics::new();
/// let combos = extract_combos(
///     "/ { combos { esc { key-positions = <LT1 LT2>; bindings = <&kp ESC>; }; }; };",
///     &positions,
///     None,
///     &mut diag,
/// );
/// assert_eq!(combos[0].positions, vec![16, 15]);
/// assert_eq!(combos[0].binding, "ESC");
/// ```
pub fn extract_combos(
    text: &str,
    positions: &KeyPositionTable,
    layers: Option<&LayerRegistry>,
    diag: &mut Diagnostics,
) -> Vec<ComboRecord> {
    let doc = devicetree::parse(text, diag);

    let mut raw: Vec<RawCombo<'_>> = doc
        .descendants()
        .into_iter()
        .filter_map(RawCombo::from_node)
        .chain(doc.all_macros().into_iter().filter_map(RawCombo::from_macro))
        .collect();
    raw.sort_by_key(|c| c.offset);

    let combos: Vec<ComboRecord> = raw
        .into_iter()
        .filter_map(|combo| resolve_combo(combo, positions, layers, diag))
        .collect();

    diag.info(COMPONENT, format!("Extracted {} combos", combos.len()));
    combos
}

fn resolve_combo(
    combo: RawCombo<'_>,
    positions: &KeyPositionTable,
    layers: Option<&LayerRegistry>,
    diag: &mut Diagnostics,
) -> Option<ComboRecord> {
    let name = combo.name;

    let resolved: Vec<u32> = combo
        .positions
        .iter()
        .filter_map(|token| {
            let index = positions.resolve_token(token);
            if index.is_none() {
                diag.warn(
                    COMPONENT,
                    format!("Combo '{name}': unknown key position '{token}' dropped"),
                );
            }
            index
        })
        .collect();

    if resolved.is_empty() {
        diag.warn(COMPONENT, format!("Combo '{name}' has no resolvable key positions, skipped"));
        return None;
    }

    let Some(binding) = combo.binding else {
        diag.warn(COMPONENT, format!("Combo '{name}' has no binding, skipped"));
        return None;
    };

    let layer_ids: Vec<u32> = combo
        .layers
        .iter()
        .filter_map(|token| {
            let id = match layers {
                Some(registry) => registry.resolve_token(token),
                None => token.parse().ok(),
            };
            if id.is_none() {
                diag.warn(
                    COMPONENT,
                    format!("Combo '{name}': unknown layer '{token}' ignored"),
                );
            }
            id
        })
        .collect();

    Some(ComboRecord::new(name, resolved, simplify_binding(&binding)).with_layers(layer_ids))
}
