//! Draw command: the full run from symbolic keymap to drawn layout.
//!
//! Stages, each writing into the output directory:
//! 1. resolve the keymap (`processed_keymap.keymap`)
//! 2. render the local SVG and HTML
//! 3. run the external drawer: parse into `keymap.yaml`, merge combos,
//!    layout id and style, then draw `keymap.svg`
//!
//! A failure in stage 3 is reported as an error; the files of stages 1 and 2
//! stay on disk.

use crate::cli::common::{ensure_dir, output_dir, required_path, resolve_profile, CliError, CliResult};
use crate::cli::render::write_renderings;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::services::drawer::{self, DrawRequest, KeymapDrawerCommand};
use crate::services::pipeline::{self, RESOLVED_KEYMAP_FILE};
use clap::Args;
use std::path::PathBuf;

/// Resolve, render and draw a keymap in one run
#[derive(Debug, Clone, Args)]
pub struct DrawArgs {
    /// Path to the root keymap file
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Path to the combo definition file
    #[arg(short, long, value_name = "FILE")]
    pub combos: Option<PathBuf>,

    /// Extra layer definitions (.keymap or .h)
    #[arg(long, value_name = "FILE")]
    pub layers: Option<PathBuf>,

    /// Style overrides (YAML) merged into the drawer's draw_config
    #[arg(short, long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Directory for every output file
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Physical layout profile
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Skip the external drawer; only resolve and render locally
    #[arg(long)]
    pub skip_drawer: bool,
}

impl DrawArgs {
    /// Execute the draw command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let keymap = required_path(self.keymap.as_ref(), config.paths.keymap.as_ref(), "keymap")?;
        let profile = resolve_profile(config, self.profile.as_deref())?;
        let out_dir = output_dir(self.output_dir.as_ref(), config);
        ensure_dir(&out_dir)?;

        // Stage 1: resolution
        let layers_file = self.layers.as_ref().or(config.paths.layers.as_ref());
        let processed =
            pipeline::process_keymap(&keymap, layers_file.map(PathBuf::as_path), &profile)
                .map_err(|e| CliError::io(format!("{e:#}")))?;
        processed.diagnostics.emit();

        let resolved_path = out_dir.join(RESOLVED_KEYMAP_FILE);
        pipeline::write_output(&resolved_path, processed.text())
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        println!("✓ Resolved keymap: {}", resolved_path.display());
        for (id, name) in processed.layer_report() {
            println!("  Layer {id}: {name}");
        }

        let mut diag = Diagnostics::new();
        let combos = match self.combos.as_ref().or(config.paths.combos.as_ref()) {
            Some(path) => pipeline::load_combos(
                path,
                &processed.positions,
                Some(&processed.layers),
                &mut diag,
            ),
            None => {
                diag.info("draw", "No combo file configured");
                Vec::new()
            }
        };

        // Stage 2: local rendering
        let layers = pipeline::build_layers(processed.text(), &profile, &mut diag);
        diag.emit();
        let (svg, html) = write_renderings(&layers, &profile, &config.render, &out_dir)?;
        println!("✓ Rendered {} layers: {}, {}", layers.len(), svg.display(), html.display());

        // Stage 3: external drawer
        if self.skip_drawer || !config.drawer.enabled {
            tracing::info!("External drawer disabled, skipping the drawing stage");
            return Ok(());
        }

        let style = match self.style.as_ref().or(config.paths.style.as_ref()) {
            Some(path) => Some(
                drawer::load_style(path)
                    .map_err(|e| CliError::validation(format!("Drawing stage aborted: {e:#}")))?,
            ),
            None => None,
        };

        let command = KeymapDrawerCommand::new(config.drawer.command.as_str());
        tracing::info!("Running layout drawer '{}'", command.program());
        let request = DrawRequest {
            resolved_keymap: &resolved_path,
            output_dir: &out_dir,
            layout_id: &config.drawer.layout_id,
            combos: &combos,
            style: style.as_ref(),
        };
        let outputs = drawer::run_drawing_stage(&command, &request)
            .map_err(|e| CliError::io(format!("Drawing stage failed: {e:#}")))?;

        println!(
            "✓ Drawn layout: {} ({} combos merged into {})",
            outputs.svg.display(),
            combos.len(),
            outputs.document.display()
        );
        Ok(())
    }
}
