//! Render command: draw every layer as SVG and HTML.

use crate::cli::common::{ensure_dir, output_dir, required_path, resolve_profile, CliError, CliResult};
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::export::{self, RenderOptions, HTML_FILE, SVG_FILE};
use crate::models::{Layer, LayoutProfile};
use crate::services::pipeline;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Render the keymap layers as SVG and HTML
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Path to the keymap file
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Extra layer definitions (.keymap or .h)
    #[arg(long, value_name = "FILE")]
    pub layers: Option<PathBuf>,

    /// Directory for the rendered files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Physical layout profile
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// The keymap is already resolved; skip include and symbol resolution
    #[arg(long)]
    pub resolved: bool,
}

impl RenderArgs {
    /// Execute the render command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let keymap = required_path(self.keymap.as_ref(), config.paths.keymap.as_ref(), "keymap")?;
        let profile = resolve_profile(config, self.profile.as_deref())?;
        let out_dir = output_dir(self.output_dir.as_ref(), config);

        let text = if self.resolved {
            fs::read_to_string(&keymap).map_err(|e| {
                CliError::io(format!("Failed to read keymap {}: {e}", keymap.display()))
            })?
        } else {
            let layers_file = self.layers.as_ref().or(config.paths.layers.as_ref());
            let processed =
                pipeline::process_keymap(&keymap, layers_file.map(PathBuf::as_path), &profile)
                    .map_err(|e| CliError::io(format!("{e:#}")))?;
            processed.diagnostics.emit();
            processed.resolved.text
        };

        let mut diag = Diagnostics::new();
        let layers = pipeline::build_layers(&text, &profile, &mut diag);
        diag.emit();

        let (svg, html) = write_renderings(&layers, &profile, &config.render, &out_dir)?;
        println!("✓ Rendered {} layers", layers.len());
        println!("  {}", svg.display());
        println!("  {}", html.display());

        Ok(())
    }
}

/// Writes the SVG and HTML renderings of `layers` into `out_dir`.
///
/// Returns the paths of the SVG and the HTML file.
pub fn write_renderings(
    layers: &[Layer],
    profile: &LayoutProfile,
    options: &RenderOptions,
    out_dir: &Path,
) -> CliResult<(PathBuf, PathBuf)> {
    if layers.is_empty() {
        tracing::warn!("No layers found, rendering an empty keymap");
    }
    ensure_dir(out_dir)?;

    let svg_path = out_dir.join(SVG_FILE);
    pipeline::write_output(&svg_path, &export::render_svg(layers, profile, options))
        .map_err(|e| CliError::io(format!("{e:#}")))?;

    let html_path = out_dir.join(HTML_FILE);
    pipeline::write_output(&html_path, &export::render_html(layers, profile, options))
        .map_err(|e| CliError::io(format!("{e:#}")))?;

    tracing::info!(
        "Rendered {} layers to {} and {}",
        layers.len(),
        svg_path.display(),
        html_path.display()
    );
    Ok((svg_path, html_path))
}
