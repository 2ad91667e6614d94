//! Keymap processing pipeline.
//!
//! Ties the parser stages together: include resolution, symbol extraction,
//! normalization and reference resolution. The file-based entry points read
//! their inputs from disk; [`process_sources`] runs the same steps on text
//! already in memory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::models::{ComboRecord, KeyPositionTable, Layer, LayerRegistry, LayoutProfile, SymbolTable};
use crate::parser::{self, includes::parent_dir, ResolvedKeymap, SourceFile};

const COMPONENT: &str = "pipeline";

/// Default file name for the resolved keymap.
pub const RESOLVED_KEYMAP_FILE: &str = "processed_keymap.keymap";

/// Result of running the resolution pipeline on a keymap.
#[derive(Debug, Clone)]
pub struct ProcessedKeymap {
    /// Resolved keymap text and rewrite counts
    pub resolved: ResolvedKeymap,
    /// Every `#define` from the root, its includes and extra sources
    pub symbols: SymbolTable,
    /// Position name table (extracted or profile fallback)
    pub positions: KeyPositionTable,
    /// Layer name registry
    pub layers: LayerRegistry,
    /// Files that contributed symbols, root first
    pub sources: Vec<PathBuf>,
    /// Events recorded while processing
    pub diagnostics: Diagnostics,
}

impl ProcessedKeymap {
    /// Resolved keymap text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.resolved.text
    }

    /// Layer mapping ordered by id.
    #[must_use]
    pub fn layer_report(&self) -> Vec<(u32, String)> {
        self.layers.report()
    }
}

/// Runs the pipeline on sources already in memory.
///
/// `root` is the keymap being resolved; `extra` are additional symbol
/// sources (position metadata, layer definitions) whose text is never part
/// of the output. Includes of all of them are followed.
pub fn process_sources(
    root: SourceFile,
    extra: Vec<SourceFile>,
    project_root: &Path,
    profile: &LayoutProfile,
) -> ProcessedKeymap {
    let mut diag = Diagnostics::new();
    let root_text = root.content.clone();

    let mut roots = vec![root];
    roots.extend(extra);
    let corpus = parser::resolve_includes(roots, project_root, &mut diag);
    let combined = corpus.combined();

    let symbols = parser::extract_defines(&combined);
    let positions = parser::build_key_position_table(&combined, profile, &mut diag);
    let layers = LayerRegistry::from_symbols(&symbols);
    diag.debug(
        COMPONENT,
        format!("{} definitions, {} layer names", symbols.len(), layers.len()),
    );

    let normalized = parser::normalize_keymap(&root_text);
    let resolved = parser::resolve_references(&normalized, &positions, &layers, &mut diag);

    ProcessedKeymap {
        resolved,
        symbols,
        positions,
        layers,
        sources: corpus.files().iter().map(|f| f.path.clone()).collect(),
        diagnostics: diag,
    }
}

/// Resolves a keymap file.
///
/// The keymap's directory is the base for includes and its parent is the
/// project root. A sibling `<profile>.keymap` is read as position metadata
/// when present, and `layers_file` contributes extra definitions. Only a
/// missing root keymap is an error; other missing inputs become warnings.
pub fn process_keymap(
    keymap_path: &Path,
    layers_file: Option<&Path>,
    profile: &LayoutProfile,
) -> Result<ProcessedKeymap> {
    let root = SourceFile::read(keymap_path)
        .with_context(|| format!("Failed to load keymap from {}", keymap_path.display()))?;

    let base_dir = parent_dir(keymap_path);
    let project_root = parent_dir(&base_dir);
    let mut pre = Diagnostics::new();
    pre.debug(
        COMPONENT,
        format!(
            "Base directory: {}, project root: {}",
            base_dir.display(),
            project_root.display()
        ),
    );

    let mut extra = Vec::new();

    let metadata_path = base_dir.join(format!("{}.keymap", profile.name));
    if metadata_path.is_file() && !same_file(&metadata_path, keymap_path) {
        match SourceFile::read(&metadata_path) {
            Ok(file) => {
                pre.info(
                    COMPONENT,
                    format!("Using position metadata from {}", metadata_path.display()),
                );
                extra.push(file);
            }
            Err(e) => pre.warn(COMPONENT, format!("{e:#}")),
        }
    }

    if let Some(path) = layers_file {
        match SourceFile::read(path) {
            Ok(file) => extra.push(file),
            Err(e) => pre.warn(COMPONENT, format!("Layer definitions skipped: {e:#}")),
        }
    }

    let mut processed = process_sources(root, extra, &project_root, profile);
    pre.extend(std::mem::take(&mut processed.diagnostics));
    processed.diagnostics = pre;
    Ok(processed)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Extracts combos from a combo definition file.
///
/// A missing or unreadable file yields no combos and a warning.
pub fn load_combos(
    combos_path: &Path,
    positions: &KeyPositionTable,
    layers: Option<&LayerRegistry>,
    diag: &mut Diagnostics,
) -> Vec<ComboRecord> {
    match fs::read_to_string(combos_path) {
        Ok(text) => parser::extract_combos(&text, positions, layers, diag),
        Err(e) => {
            diag.warn(
                COMPONENT,
                format!("Could not read combo file {}: {e}", combos_path.display()),
            );
            Vec::new()
        }
    }
}

/// Builds the layer model from a processed keymap.
pub fn build_layers(text: &str, profile: &LayoutProfile, diag: &mut Diagnostics) -> Vec<Layer> {
    parser::parse_layers(text, profile, diag)
}

/// Writes text to a file, creating parent directories as needed.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}
