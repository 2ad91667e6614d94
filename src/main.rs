//! keymapviz - ZMK keymap resolver and visualizer
//!
//! Resolves symbolic key positions and layer names in a ZMK keymap, extracts
//! combos, renders every layer as SVG/HTML and drives keymap-drawer.

use clap::{Parser, Subcommand};
use keymapviz::cli::{CliError, CombosArgs, DrawArgs, ExitCode, RenderArgs, ResolveArgs};
use keymapviz::config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// keymapviz - ZMK keymap resolver and visualizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve symbolic key positions and layer names
    Resolve(ResolveArgs),
    /// Extract combos with resolved key positions
    Combos(CombosArgs),
    /// Render the keymap layers as SVG and HTML
    Render(RenderArgs),
    /// Resolve, render and draw the keymap with keymap-drawer
    Draw(DrawArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, CliError> {
    let result = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    result.map_err(|e| CliError::validation(format!("{e:#}")))
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_ref())?;
    tracing::debug!("Configuration: {config:?}");

    match &cli.command {
        Commands::Resolve(args) => args.execute(&config),
        Commands::Combos(args) => args.execute(&config),
        Commands::Render(args) => args.execute(&config),
        Commands::Draw(args) => args.execute(&config),
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for --json output
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code.code());
}
