//! External layout drawer integration.
//!
//! The drawing stage hands the resolved keymap to an external tool
//! (`keymap-drawer` by default) that parses it into a YAML layout document
//! and renders that document as SVG. Between the two steps the document is
//! adjusted: the keyboard identifier is forced, combos are merged in and
//! style overrides are applied.

use anyhow::{bail, Context, Result};
use serde_yml::{Mapping, Value};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::models::ComboRecord;

/// Default drawer executable.
pub const DEFAULT_DRAWER_COMMAND: &str = "keymap";

/// Default value forced into `layout.zmk_keyboard`.
pub const DEFAULT_LAYOUT_ID: &str = "sofle";

/// Layout document written by the parse step.
pub const LAYOUT_DOCUMENT_FILE: &str = "keymap.yaml";

/// SVG written by the draw step.
pub const DRAWN_SVG_FILE: &str = "keymap.svg";

/// An external tool that turns a resolved keymap into a drawing.
pub trait LayoutDrawer {
    /// Parses a resolved keymap into a YAML layout document.
    fn parse(&self, keymap: &Path, document_out: &Path) -> Result<()>;

    /// Draws a YAML layout document as SVG.
    fn draw(&self, document: &Path, svg_out: &Path) -> Result<()>;
}

/// [`LayoutDrawer`] backed by the `keymap` command of keymap-drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapDrawerCommand {
    program: String,
}

impl Default for KeymapDrawerCommand {
    fn default() -> Self {
        Self::new(DEFAULT_DRAWER_COMMAND)
    }
}

impl KeymapDrawerCommand {
    /// Creates a drawer invoking the given executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable this drawer runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn run<I, S>(&self, step: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(&self.program)
            .arg(step)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to execute {} {step}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} {step} failed ({}): {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }

        Ok(())
    }
}

impl LayoutDrawer for KeymapDrawerCommand {
    fn parse(&self, keymap: &Path, document_out: &Path) -> Result<()> {
        self.run(
            "parse",
            [
                OsStr::new("-z"),
                keymap.as_os_str(),
                OsStr::new("-o"),
                document_out.as_os_str(),
            ],
        )
    }

    fn draw(&self, document: &Path, svg_out: &Path) -> Result<()> {
        self.run(
            "draw",
            [document.as_os_str(), OsStr::new("-o"), svg_out.as_os_str()],
        )
    }
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

/// Recursively merges `overlay` into `base`. Mappings merge key by key;
/// any other overlay value replaces the base value.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (k, v) in overlay_map {
                match base_map.get_mut(k) {
                    Some(existing) => deep_merge(existing, v),
                    None => {
                        base_map.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Adjusts a parsed layout document before drawing.
///
/// - `layout.zmk_keyboard` is set to `layout_id`
/// - `combos` entries are appended; an existing entry with the same key
///   positions is replaced, all others are kept. Layer ids in `l` are
///   written as the name of the document layer at that position; ids with
///   no such layer are dropped, and `l` is omitted when none remain
/// - `style` is deep-merged: documents with a top-level `draw_config` merge
///   at the top level, anything else merges into `draw_config`
pub fn merge_layout_document(
    document: &mut Value,
    layout_id: &str,
    combos: &[ComboRecord],
    style: Option<&Value>,
) -> Result<()> {
    if !matches!(document, Value::Mapping(_)) {
        *document = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(root) = document else {
        bail!("Layout document is not a mapping");
    };

    if !matches!(root.get("layout"), Some(Value::Mapping(_))) {
        root.insert(key("layout"), Value::Mapping(Mapping::new()));
    }
    if let Some(Value::Mapping(layout)) = root.get_mut("layout") {
        layout.insert(key("zmk_keyboard"), key(layout_id));
    }

    if !combos.is_empty() {
        let mut entries = match root.get("combos") {
            Some(Value::Sequence(existing)) => existing.clone(),
            _ => Vec::new(),
        };

        let layer_names: Vec<Value> = match root.get("layers") {
            Some(Value::Mapping(layers)) => layers.iter().map(|(name, _)| name.clone()).collect(),
            _ => Vec::new(),
        };

        for combo in combos {
            let mut value = serde_yml::to_value(combo).context("Failed to serialize combo")?;
            if let Value::Mapping(entry) = &mut value {
                let names: Vec<Value> = combo
                    .layers
                    .iter()
                    .filter_map(|id| layer_names.get(*id as usize).cloned())
                    .collect();
                if names.is_empty() {
                    entry.remove("l");
                } else {
                    entry.insert(key("l"), Value::Sequence(names));
                }
            }
            let positions = value.get("p").cloned();
            entries.retain(|entry| entry.get("p").cloned() != positions);
            entries.push(value);
        }

        root.insert(key("combos"), Value::Sequence(entries));
    }

    if let Some(style) = style {
        let targets_root = matches!(style, Value::Mapping(m) if m.contains_key("draw_config"));
        if targets_root {
            deep_merge(document, style);
        } else {
            let mut draw_config = root
                .get("draw_config")
                .cloned()
                .unwrap_or_else(|| Value::Mapping(Mapping::new()));
            deep_merge(&mut draw_config, style);
            root.insert(key("draw_config"), draw_config);
        }
    }

    Ok(())
}

/// Loads a YAML style override document.
pub fn load_style(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read style file: {}", path.display()))?;
    serde_yml::from_str(&content)
        .with_context(|| format!("Failed to parse style file: {}", path.display()))
}

/// Files produced by a successful drawing stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutputs {
    /// Merged YAML layout document
    pub document: PathBuf,
    /// Drawn SVG
    pub svg: PathBuf,
}

/// Options for [`run_drawing_stage`].
#[derive(Debug, Clone, Copy)]
pub struct DrawRequest<'a> {
    /// Resolved keymap written by the resolution stage
    pub resolved_keymap: &'a Path,
    /// Directory receiving the document and the SVG
    pub output_dir: &'a Path,
    /// Value forced into `layout.zmk_keyboard`
    pub layout_id: &'a str,
    /// Combos to merge into the document
    pub combos: &'a [ComboRecord],
    /// Optional style overrides
    pub style: Option<&'a Value>,
}

/// Runs parse, merge and draw. The first failure aborts the stage; files
/// written before it stay on disk.
pub fn run_drawing_stage(
    drawer: &dyn LayoutDrawer,
    request: &DrawRequest<'_>,
) -> Result<DrawOutputs> {
    let document_path = request.output_dir.join(LAYOUT_DOCUMENT_FILE);
    let svg_path = request.output_dir.join(DRAWN_SVG_FILE);

    drawer
        .parse(request.resolved_keymap, &document_path)
        .context("Layout drawer failed to parse the resolved keymap")?;

    let content = fs::read_to_string(&document_path)
        .with_context(|| format!("Failed to read layout document: {}", document_path.display()))?;
    let mut document: Value = serde_yml::from_str(&content)
        .with_context(|| format!("Failed to parse layout document: {}", document_path.display()))?;

    merge_layout_document(&mut document, request.layout_id, request.combos, request.style)?;

    let merged = serde_yml::to_string(&document).context("Failed to serialize layout document")?;
    fs::write(&document_path, merged)
        .with_context(|| format!("Failed to write layout document: {}", document_path.display()))?;

    drawer
        .draw(&document_path, &svg_path)
        .context("Layout drawer failed to draw the layout document")?;

    Ok(DrawOutputs {
        document: document_path,
        svg: svg_path,
    })
}
