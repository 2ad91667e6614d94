//! Symbol tables built from `#define` statements.
//!
//! Three views over the same definitions:
//! - [`SymbolTable`]: every `#define NAME value`, last definition wins
//! - [`KeyPositionTable`]: physical key position names mapped to indices
//! - [`LayerRegistry`]: all-caps layer names mapped to numeric layer ids

use crate::models::profile::LayoutProfile;
use std::collections::BTreeMap;

/// Flat name → raw value mapping from `#define` statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: BTreeMap<String, String>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, replacing any earlier value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Looks up the raw value of a definition.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Where the entries of a [`KeyPositionTable`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    /// Extracted from `#define` statements in the keymap sources
    Extracted,
    /// Substituted from the physical layout profile
    Fallback,
}

/// Physical key position name → linear key index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPositionTable {
    positions: BTreeMap<String, u32>,
    source: PositionSource,
}

impl KeyPositionTable {
    /// Creates a table from extracted definitions.
    #[must_use]
    pub fn extracted(positions: BTreeMap<String, u32>) -> Self {
        Self {
            positions,
            source: PositionSource::Extracted,
        }
    }

    /// Creates a table from a profile's fallback positions.
    #[must_use]
    pub fn fallback(profile: &LayoutProfile) -> Self {
        Self {
            positions: profile.fallback_positions.iter().cloned().collect(),
            source: PositionSource::Fallback,
        }
    }

    /// Resolves a position name to its index.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u32> {
        self.positions.get(name).copied()
    }

    /// Resolves a single position-list token.
    ///
    /// Known names map to their index, plain non-negative integers pass
    /// through, anything else yields `None`.
    #[must_use]
    pub fn resolve_token(&self, token: &str) -> Option<u32> {
        self.get(token).or_else(|| token.parse::<u32>().ok())
    }

    /// Where the entries came from.
    #[must_use]
    pub const fn source(&self) -> PositionSource {
        self.source
    }

    /// Returns true if the profile fallback was substituted.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == PositionSource::Fallback
    }

    /// Number of known positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates over `(name, index)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.positions.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// All-caps layer name → numeric layer id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerRegistry {
    by_name: BTreeMap<String, u32>,
}

impl LayerRegistry {
    /// Builds the registry from a symbol table.
    ///
    /// Only names made of uppercase letters and underscores whose value
    /// parses as an integer are treated as layer names.
    #[must_use]
    pub fn from_symbols(symbols: &SymbolTable) -> Self {
        let by_name = symbols
            .iter()
            .filter(|(name, _)| is_layer_name(name))
            .filter_map(|(name, value)| value.trim().parse::<u32>().ok().map(|id| (name.to_string(), id)))
            .collect();

        Self { by_name }
    }

    /// Looks up a layer id by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Resolves a layer token: a known name or a plain integer.
    #[must_use]
    pub fn resolve_token(&self, token: &str) -> Option<u32> {
        self.get(token).or_else(|| token.parse::<u32>().ok())
    }

    /// Number of registered layer names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if no layer names are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Layer mapping ordered by id, then name.
    ///
    /// Several names may share one id; each appears on its own entry.
    #[must_use]
    pub fn report(&self) -> Vec<(u32, String)> {
        let mut entries: Vec<(u32, String)> = self
            .by_name
            .iter()
            .map(|(name, id)| (*id, name.clone()))
            .collect();
        entries.sort();
        entries
    }
}

/// Returns true for identifiers following the `^[A-Z_]+$` layer naming
/// convention.
#[must_use]
pub fn is_layer_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}
