//! Combos command: list the combos of a combo definition file.

use crate::cli::common::{required_path, resolve_profile, CliError, CliResult};
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::models::{ComboRecord, KeyPositionTable};
use crate::services::pipeline;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Extract combos with resolved key positions
#[derive(Debug, Clone, Args)]
pub struct CombosArgs {
    /// Path to the combo definition file
    #[arg(short, long, value_name = "FILE")]
    pub combos: Option<PathBuf>,

    /// Keymap providing position and layer definitions
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Extra layer definitions (.keymap or .h)
    #[arg(long, value_name = "FILE")]
    pub layers: Option<PathBuf>,

    /// Physical layout profile
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Combo as printed by `--json`
#[derive(Debug, Serialize)]
pub struct ComboEntry {
    /// Combo name
    pub name: String,
    /// Key indices
    pub positions: Vec<u32>,
    /// Emitted binding
    pub binding: String,
    /// Layer restriction (empty = all layers)
    pub layers: Vec<u32>,
}

impl From<&ComboRecord> for ComboEntry {
    fn from(combo: &ComboRecord) -> Self {
        Self {
            name: combo.name.clone(),
            positions: combo.positions.clone(),
            binding: combo.binding.clone(),
            layers: combo.layers.clone(),
        }
    }
}

impl CombosArgs {
    /// Execute the combos command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let combos_path =
            required_path(self.combos.as_ref(), config.paths.combos.as_ref(), "combos")?;
        let profile = resolve_profile(config, self.profile.as_deref())?;
        let layers_file = self.layers.as_ref().or(config.paths.layers.as_ref());

        let mut diag = Diagnostics::new();
        let combos = match self.keymap.as_ref().or(config.paths.keymap.as_ref()) {
            Some(keymap) => {
                let processed =
                    pipeline::process_keymap(keymap, layers_file.map(PathBuf::as_path), &profile)
                        .map_err(|e| CliError::io(format!("{e:#}")))?;
                processed.diagnostics.emit();
                pipeline::load_combos(
                    &combos_path,
                    &processed.positions,
                    Some(&processed.layers),
                    &mut diag,
                )
            }
            None => {
                let positions = KeyPositionTable::fallback(&profile);
                pipeline::load_combos(&combos_path, &positions, None, &mut diag)
            }
        };
        diag.emit();

        if self.json {
            let entries: Vec<ComboEntry> = combos.iter().map(ComboEntry::from).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&entries)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else if combos.is_empty() {
            println!("No combos found");
        } else {
            println!("Combos ({}):", combos.len());
            for combo in &combos {
                let positions: Vec<String> = combo.positions.iter().map(u32::to_string).collect();
                print!("  {}: [{}] -> {}", combo.name, positions.join(", "), combo.binding);
                if !combo.layers.is_empty() {
                    let layers: Vec<String> = combo.layers.iter().map(u32::to_string).collect();
                    print!(" (layers {})", layers.join(", "));
                }
                println!();
            }
        }

        Ok(())
    }
}
