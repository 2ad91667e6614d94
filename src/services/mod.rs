//! Service layer for business logic.
//!
//! This module contains services that encapsulate the processing stages and
//! coordinate between the parser, the models and the external drawer.

pub mod drawer;
pub mod labels;
pub mod pipeline;

// Re-export commonly used types and functions
pub use drawer::{KeymapDrawerCommand, LayoutDrawer};
pub use pipeline::{process_keymap, ProcessedKeymap};
