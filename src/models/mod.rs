//! Data models for keymap symbols, layers, combos and physical layouts.
//!
//! This module contains all the core data structures used throughout the application.
//! Models are designed to be independent of parsing and rendering.

pub mod category;
pub mod combo;
pub mod layer;
pub mod profile;
pub mod rgb;
pub mod symbols;

// Re-export all model types
pub use category::{CategoryPalette, KeyCategory};
pub use combo::ComboRecord;
pub use layer::{Key, Layer};
pub use profile::{GridPos, LayoutProfile, DEFAULT_PROFILE};
pub use rgb::RgbColor;
pub use symbols::{KeyPositionTable, LayerRegistry, PositionSource, SymbolTable};
