//! keymapviz library
//!
//! This library resolves symbolic ZMK keymaps (include expansion, `#define`
//! extraction, key-position and layer-name resolution, combo extraction)
//! and renders the resulting layers as SVG and HTML.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod export;
pub mod models;
pub mod parser;
pub mod services;
