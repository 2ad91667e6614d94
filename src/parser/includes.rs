//! Include discovery and transitive resolution.
//!
//! Included files are only symbol sources: their `#define`s feed the symbol
//! and key-position tables, their text is never emitted. Resolution is a
//! breadth-first work list with a seen set keyed by canonical path, so every
//! file is read at most once even for diamond or cyclic include graphs.

use crate::diagnostics::Diagnostics;
use crate::parser::normalize::code_lines;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const COMPONENT: &str = "includes";

/// Include prefixes provided by the firmware itself, never resolved locally.
pub const SKIPPED_PREFIXES: &[&str] = &["dt-bindings/", "behaviors", "input/"];

/// Prefix of includes that live in a shared helpers checkout next to the
/// project rather than inside it.
const HELPERS_PREFIX: &str = "zmk-helpers/";

/// Location of the key-label header inside a helpers checkout.
const KEY_LABELS_HEADER: &str = "zmk-helpers/include/zmk-helpers/key-labels/sofle.h";

fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*#include\s+[<"]([^>"]+)[>"]"#).expect("include pattern is valid")
    })
}

/// A source file read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the file was read from
    pub path: PathBuf,
    /// Full text
    pub content: String,
}

impl SourceFile {
    /// Creates a source file from already loaded text.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Reads a source file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self::new(path, content))
    }
}

/// Ordered set of source texts: the root first, then everything it pulls in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCorpus {
    files: Vec<SourceFile>,
}

impl SourceCorpus {
    /// Creates an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a file.
    pub fn push(&mut self, file: SourceFile) {
        self.files.push(file);
    }

    /// Files in read order.
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the corpus holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All texts joined by newlines, in read order.
    #[must_use]
    pub fn combined(&self) -> String {
        self.files
            .iter()
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Returns the targets of every active `#include` directive, in order.
///
/// Commented-out directives are ignored.
#[must_use]
pub fn include_directives(content: &str) -> Vec<String> {
    code_lines(content)
        .filter_map(|line| include_regex().captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Returns true for includes that belong to the firmware rather than the
/// project.
#[must_use]
pub fn is_system_include(include: &str) -> bool {
    SKIPPED_PREFIXES.iter().any(|prefix| include.starts_with(prefix))
}

/// Candidate locations for an include, in probing order.
#[must_use]
pub fn candidate_paths(include: &str, base_dir: &Path, project_root: &Path) -> Vec<PathBuf> {
    if include.starts_with(HELPERS_PREFIX) {
        vec![
            project_root.join(include),
            project_root.join("..").join(include),
            project_root.join("..").join("..").join(include),
        ]
    } else {
        vec![
            base_dir.join(include),
            base_dir.join("includes").join(include),
            project_root.join(include),
            project_root.join("includes").join(include),
        ]
    }
}

/// Candidate locations of the key-label header when a label include could
/// not be found at its declared path.
fn key_label_candidates(include: &str, project_root: &Path) -> Vec<PathBuf> {
    if !(include.ends_with("sofle.h") || include.contains("key-labels")) {
        return Vec::new();
    }
    vec![
        project_root.join(KEY_LABELS_HEADER),
        project_root.join("..").join(KEY_LABELS_HEADER),
        project_root.join("..").join("..").join(KEY_LABELS_HEADER),
    ]
}

/// Finds the file an include refers to, if any candidate exists.
#[must_use]
pub fn locate_include(include: &str, base_dir: &Path, project_root: &Path) -> Option<PathBuf> {
    candidate_paths(include, base_dir, project_root)
        .into_iter()
        .chain(key_label_candidates(include, project_root))
        .find(|candidate| candidate.is_file())
}

/// Resolves the includes of one file's text to existing paths.
///
/// System includes are skipped, unresolved ones produce a warning.
pub fn find_includes(
    content: &str,
    base_dir: &Path,
    project_root: &Path,
    diag: &mut Diagnostics,
) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for include in include_directives(content) {
        if is_system_include(&include) {
            diag.debug(COMPONENT, format!("Skipping system include: {include}"));
            continue;
        }

        match locate_include(&include, base_dir, project_root) {
            Some(path) => {
                diag.debug(COMPONENT, format!("Found include {include} at {}", path.display()));
                found.push(path);
            }
            None => diag.warn(COMPONENT, format!("Could not find include file: {include}")),
        }
    }

    found
}

fn seen_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Builds the full source corpus for a set of already loaded root files.
///
/// Roots are kept in the given order and are never read again, even when an
/// include points back at one of them. Every reachable include follows in
/// breadth-first order, each at most once. Nested includes resolve relative
/// to the directory of the file that declares them.
pub fn resolve_includes(
    roots: Vec<SourceFile>,
    project_root: &Path,
    diag: &mut Diagnostics,
) -> SourceCorpus {
    let mut corpus = SourceCorpus::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut queue: VecDeque<PathBuf> = VecDeque::new();

    for root in roots {
        seen.insert(seen_key(&root.path));
        let base_dir = parent_dir(&root.path);
        queue.extend(find_includes(&root.content, &base_dir, project_root, diag));
        corpus.push(root);
    }

    while let Some(path) = queue.pop_front() {
        if !seen.insert(seen_key(&path)) {
            continue;
        }

        match SourceFile::read(&path) {
            Ok(file) => {
                let base_dir = parent_dir(&file.path);
                queue.extend(find_includes(&file.content, &base_dir, project_root, diag));
                corpus.push(file);
            }
            Err(e) => diag.warn(COMPONENT, format!("{e:#}")),
        }
    }

    diag.info(
        COMPONENT,
        format!("Processed {} includes", corpus.len().saturating_sub(1)),
    );
    corpus
}

/// Directory containing a file, `.` for bare file names.
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
