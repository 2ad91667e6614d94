//! `#define` extraction into symbol and key-position tables.

use crate::diagnostics::Diagnostics;
use crate::models::{KeyPositionTable, LayoutProfile, SymbolTable};
use crate::parser::normalize::{code_lines, strip_line_comment};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const COMPONENT: &str = "defines";

fn define_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*#define\s+(\w+)\s+(.+)$").expect("define pattern is valid"))
}

fn position_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[LR][NTMB][0-5]|[LR]H[0-4]|[LR]EC)$").expect("position pattern is valid")
    })
}

/// Returns true for names following the physical position grammar
/// (`LN0`..`RB5`, `LH0`..`RH4`, `LEC`, `REC`).
#[must_use]
pub fn is_position_name(name: &str) -> bool {
    position_name_regex().is_match(name)
}

/// Iterates over `(name, value)` pairs of active one-line `#define`s.
///
/// Values have any trailing `//` comment removed and are trimmed; defines
/// with an empty value after stripping are skipped.
fn defines(content: &str) -> impl Iterator<Item = (&str, &str)> {
    code_lines(content).filter_map(|line| {
        let caps = define_regex().captures(line)?;
        let name = caps.get(1)?.as_str();
        let value = strip_line_comment(caps.get(2)?.as_str()).trim();
        (!value.is_empty()).then_some((name, value))
    })
}

/// Collects every `#define NAME value` in the text. Later definitions win.
///
/// # Examples
///
/// ```
/// use keymapviz::parser::defines::extract_defines;
///
/// let table = extract_defines("#define BASE 0\n#define NAV 1 // navigation\n");
/// assert_eq!(table.get("BASE"), Some("0"));
/// assert_eq!(table.get("NAV"), Some("1"));
/// ```
#[must_use]
pub fn extract_defines(content: &str) -> SymbolTable {
    let mut table = SymbolTable::new();
    for (name, value) in defines(content) {
        table.insert(name, value);
    }
    table
}

/// Collects position definitions: names in the position grammar whose value
/// is a plain non-negative integer.
#[must_use]
pub fn extract_key_positions(content: &str) -> BTreeMap<String, u32> {
    defines(content)
        .filter(|(name, _)| is_position_name(name))
        .filter_map(|(name, value)| value.parse::<u32>().ok().map(|idx| (name.to_string(), idx)))
        .collect()
}

/// Builds the key-position table, substituting the profile's fallback table
/// when the text defines no positions.
pub fn build_key_position_table(
    content: &str,
    profile: &LayoutProfile,
    diag: &mut Diagnostics,
) -> KeyPositionTable {
    let positions = extract_key_positions(content);

    if positions.is_empty() {
        let table = KeyPositionTable::fallback(profile);
        diag.info(
            COMPONENT,
            format!(
                "No key positions found, using built-in {} layout ({} positions)",
                profile.name,
                table.len()
            ),
        );
        return table;
    }

    diag.info(COMPONENT, format!("Extracted {} key positions", positions.len()));
    KeyPositionTable::extracted(positions)
}
