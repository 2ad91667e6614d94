//! Layer and key data structures consumed by the renderers.

use crate::models::category::KeyCategory;
use crate::models::profile::GridPos;
use crate::services::labels;
use serde::Serialize;

/// A single rendered key.
///
/// Labels and category are derived from `code` once, at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Key {
    /// Raw binding (e.g., "&kp ESC", "&hm_LGUI_A")
    pub code: String,
    /// One or two display labels; the first is the primary label
    pub labels: Vec<String>,
    /// Grid column
    pub x: usize,
    /// Grid row
    pub y: usize,
    /// Semantic category used for coloring
    pub category: KeyCategory,
}

impl Key {
    /// Creates a key from a raw binding placed at a grid cell.
    pub fn new(code: impl Into<String>, pos: GridPos) -> Self {
        let code = code.into();
        let code = code.trim().to_string();
        let (labels, category) = labels::decompose(&code);

        Self {
            code,
            labels,
            x: pos.col,
            y: pos.row,
            category,
        }
    }

    /// Grid position of this key.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    /// Primary label.
    #[must_use]
    pub fn primary_label(&self) -> &str {
        self.labels.first().map_or("", String::as_str)
    }

    /// Secondary annotation, if any.
    #[must_use]
    pub fn secondary_label(&self) -> Option<&str> {
        self.labels.get(1).map(String::as_str)
    }
}

/// A named layer with its keys in position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    /// Identifier (node name without the `_layer` suffix)
    pub name: String,
    /// Human-readable name from `display-name`
    pub display_name: String,
    /// Keys ordered by position index
    pub keys: Vec<Key>,
}

impl Layer {
    /// Creates an empty layer.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            keys: Vec::new(),
        }
    }

    /// Appends a key.
    pub fn add_key(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Finds the key placed at a grid cell.
    #[must_use]
    pub fn key_at(&self, pos: GridPos) -> Option<&Key> {
        self.keys.iter().find(|k| k.position() == pos)
    }
}
