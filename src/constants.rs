//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the name of its config directory.

/// The display name of the application (used in generated file stamps).
pub const APP_NAME: &str = "keymapviz";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "keymapviz";

/// Name of the directory holding the config file inside the platform config dir.
pub const CONFIG_DIR_NAME: &str = "keymapviz";
