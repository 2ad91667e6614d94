//! CLI command handlers for keymapviz.
//!
//! Each subcommand is an `Args` struct with an `execute` method taking the
//! loaded configuration. Handlers print their results to stdout and return
//! a [`CliError`] whose kind selects the process exit code.

pub mod combos;
pub mod common;
pub mod draw;
pub mod render;
pub mod resolve;

// Re-export types used by main.rs and tests
pub use combos::CombosArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use draw::DrawArgs;
pub use render::RenderArgs;
pub use resolve::ResolveArgs;
