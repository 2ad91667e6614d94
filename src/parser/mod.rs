//! Parsing and rewriting of ZMK keymap sources.
//!
//! This module reads `.keymap` files and their includes, builds symbol tables
//! from `#define` statements, resolves symbolic references into numeric ones,
//! and turns the resolved text into combos and layers.

pub mod combos;
pub mod defines;
pub mod devicetree;
pub mod includes;
pub mod keymap;
pub mod lexer;
pub mod normalize;
pub mod resolve;

// Re-export commonly used functions
pub use combos::extract_combos;
pub use defines::{build_key_position_table, extract_defines, extract_key_positions};
pub use includes::{resolve_includes, SourceCorpus, SourceFile};
pub use keymap::parse_layers;
pub use normalize::normalize_keymap;
pub use resolve::{resolve_references, ResolvedKeymap};
