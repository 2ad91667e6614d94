//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_DIR_NAME;
use crate::export::RenderOptions;
use crate::models::{LayoutProfile, DEFAULT_PROFILE};
use crate::services::drawer::{DEFAULT_DRAWER_COMMAND, DEFAULT_LAYOUT_ID};

/// Default input and output locations.
///
/// Command-line arguments take precedence over every entry here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Root keymap file (e.g., "config/sofle.keymap")
    pub keymap: Option<PathBuf>,
    /// Combo definition file
    pub combos: Option<PathBuf>,
    /// Extra layer definitions (`.keymap` or `.h`)
    pub layers: Option<PathBuf>,
    /// Style override YAML for the external drawer
    pub style: Option<PathBuf>,
    /// Directory receiving every output file
    pub output_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Output directory, defaulting to the working directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Physical layout selection.
///
/// Names a built-in profile; any override present replaces that profile's
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Built-in profile name
    pub name: String,
    /// Override for the total key count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_count: Option<usize>,
    /// Override for the keys per main row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_width: Option<usize>,
    /// Override for the number of main rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_rows: Option<usize>,
    /// Override for the gap between halves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_gap: Option<usize>,
    /// Override for the left thumb cluster size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_split: Option<usize>,
    /// Override for the right thumb cluster start column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_thumb_start: Option<usize>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE.to_string(),
            key_count: None,
            row_width: None,
            main_rows: None,
            half_gap: None,
            thumb_split: None,
            right_thumb_start: None,
        }
    }
}

impl ProfileConfig {
    /// Builds the effective layout profile.
    ///
    /// Fails for an unknown profile name or when the overrides produce an
    /// inconsistent geometry.
    pub fn resolve(&self) -> Result<LayoutProfile> {
        let mut profile = LayoutProfile::builtin(&self.name).with_context(|| {
            format!(
                "Unknown layout profile '{}' (available: {})",
                self.name,
                LayoutProfile::builtin_names().join(", ")
            )
        })?;

        if let Some(v) = self.key_count {
            profile.key_count = v;
        }
        if let Some(v) = self.row_width {
            profile.row_width = v;
        }
        if let Some(v) = self.main_rows {
            profile.main_rows = v;
        }
        if let Some(v) = self.half_gap {
            profile.half_gap = v;
        }
        if let Some(v) = self.thumb_split {
            profile.thumb_split = v;
        }
        if let Some(v) = self.right_thumb_start {
            profile.right_thumb_start = v;
        }

        // a geometry override invalidates the built-in position table
        if self.key_count.is_some() {
            let key_count = profile.key_count;
            profile
                .fallback_positions
                .retain(|(_, idx)| (*idx as usize) < key_count);
        }

        profile.validate()?;
        Ok(profile)
    }
}

/// External drawer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawerConfig {
    /// Program invoked for the parse and draw steps
    pub command: String,
    /// Value forced into `layout.zmk_keyboard`
    pub layout_id: String,
    /// Whether `draw` invokes the external drawer at all
    pub enabled: bool,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_DRAWER_COMMAND.to_string(),
            layout_id: DEFAULT_LAYOUT_ID.to_string(),
            enabled: true,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/keymapviz/config.toml`
/// - macOS: `~/Library/Application Support/keymapviz/config.toml`
/// - Windows: `%APPDATA%\keymapviz\config.toml`
///
/// Every section is optional; a missing file means defaults throughout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default file locations
    pub paths: PathConfig,
    /// Physical layout
    pub profile: ProfileConfig,
    /// External drawer
    pub drawer: DrawerConfig,
    /// Local SVG/HTML rendering
    pub render: RenderOptions,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to a path using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - the profile resolves to a consistent geometry
    /// - key size is non-zero
    /// - the drawer command and layout id are set when drawing is enabled
    pub fn validate(&self) -> Result<()> {
        self.profile.resolve()?;

        if self.render.key_size == 0 {
            anyhow::bail!("render.key_size must be greater than zero");
        }

        if self.drawer.enabled {
            if self.drawer.command.trim().is_empty() {
                anyhow::bail!("drawer.command must not be empty when the drawer is enabled");
            }
            if self.drawer.layout_id.trim().is_empty() {
                anyhow::bail!("drawer.layout_id must not be empty when the drawer is enabled");
            }
        }

        Ok(())
    }
}
