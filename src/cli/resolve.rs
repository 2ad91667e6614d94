//! Resolve command: write the numerically resolved keymap.

use crate::cli::common::{required_path, resolve_profile, CliError, CliResult};
use crate::config::Config;
use crate::models::PositionSource;
use crate::services::pipeline::{self, RESOLVED_KEYMAP_FILE};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Resolve symbolic key positions and layer names in a keymap
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Path to the root keymap file
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Extra layer definitions (.keymap or .h)
    #[arg(long, value_name = "FILE")]
    pub layers: Option<PathBuf>,

    /// Where to write the resolved keymap
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Physical layout profile
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Layer mapping entry
#[derive(Debug, Serialize)]
pub struct LayerEntry {
    /// Layer id
    pub id: u32,
    /// Layer name
    pub name: String,
}

/// JSON response of the resolve command
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    /// Resolved keymap path
    pub output: PathBuf,
    /// Layer mapping ordered by id
    pub layers: Vec<LayerEntry>,
    /// Number of position lists rewritten
    pub position_lists: usize,
    /// Number of position tokens replaced by indices
    pub positions_rewritten: usize,
    /// Number of layer name tokens replaced by ids
    pub layer_replacements: usize,
    /// Whether position symbols came from the sources or the profile fallback
    pub position_source: String,
    /// Warnings recorded while resolving
    pub warnings: Vec<String>,
}

impl ResolveArgs {
    /// Execute the resolve command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let keymap = required_path(self.keymap.as_ref(), config.paths.keymap.as_ref(), "keymap")?;
        let profile = resolve_profile(config, self.profile.as_deref())?;
        let layers_file = self.layers.as_ref().or(config.paths.layers.as_ref());

        let processed = pipeline::process_keymap(&keymap, layers_file.map(PathBuf::as_path), &profile)
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        processed.diagnostics.emit();

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| config.paths.output_dir().join(RESOLVED_KEYMAP_FILE));
        pipeline::write_output(&output, processed.text())
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        tracing::info!("Resolved keymap written to {}", output.display());

        let resolved = &processed.resolved;
        if self.json {
            let response = ResolveResponse {
                output,
                layers: processed
                    .layer_report()
                    .into_iter()
                    .map(|(id, name)| LayerEntry { id, name })
                    .collect(),
                position_lists: resolved.position_lists,
                positions_rewritten: resolved.positions_rewritten,
                layer_replacements: resolved.layer_replacements,
                position_source: match processed.positions.source() {
                    PositionSource::Extracted => "extracted".to_string(),
                    PositionSource::Fallback => "fallback".to_string(),
                },
                warnings: processed
                    .diagnostics
                    .warnings()
                    .map(|e| e.message.clone())
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!("Resolved keymap: {}", output.display());
            println!(
                "Rewrote {} position lists ({} positions), {} layer references",
                resolved.position_lists, resolved.positions_rewritten, resolved.layer_replacements
            );
            if processed.positions.is_fallback() {
                println!("Key positions: built-in {} table", profile.name);
            }

            let report = processed.layer_report();
            if report.is_empty() {
                println!("\nNo layer definitions found");
            } else {
                println!("\nLayer mapping:");
                for (id, name) in report {
                    println!("  Layer {id}: {name}");
                }
            }
        }

        Ok(())
    }
}
