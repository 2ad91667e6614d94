//! Combo records extracted from combo definitions.

use serde::{Deserialize, Serialize};

/// A key combination resolved to numeric key positions.
///
/// Serialized in the compact form used by layout documents:
/// `{ p: [positions], k: binding, l: [layers] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboRecord {
    /// Combo name (node name or macro name), informational only
    #[serde(skip)]
    pub name: String,
    /// Resolved key indices in source order
    #[serde(rename = "p")]
    pub positions: Vec<u32>,
    /// Key emitted on activation (`&kp X` reduced to `X`, otherwise raw)
    #[serde(rename = "k")]
    pub binding: String,
    /// Layers the combo is restricted to (empty = all layers)
    #[serde(rename = "l", default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<u32>,
}

impl ComboRecord {
    /// Creates a combo active on all layers.
    pub fn new(name: impl Into<String>, positions: Vec<u32>, binding: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positions,
            binding: binding.into(),
            layers: Vec::new(),
        }
    }

    /// Restricts the combo to the given layers.
    #[must_use]
    pub fn with_layers(mut self, layers: Vec<u32>) -> Self {
        self.layers = layers;
        self
    }
}
