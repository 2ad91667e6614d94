//! Binding label decomposition and key categorization.
//!
//! Turns a raw binding such as `&hm_LGUI_A` or `&mo 2` into the one or two
//! labels drawn on a key, and classifies it for coloring. Both steps are
//! table driven: adding a behavior means adding a row, not a branch.

use crate::models::KeyCategory;

/// Marker that starts every behavior reference.
pub const BEHAVIOR_MARKER: char = '&';

/// How a recognized behavior prefix turns into labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelRule {
    /// `TD` followed by the remaining segments, one per line
    TapDance,
    /// Last segment as primary label, `TAG\n<first segment>` as annotation
    HoldTap(&'static str),
    /// `TAG` followed by the parameter
    LayerSwitch(&'static str),
    /// Parameter only
    KeyPress,
}

/// Behavior prefixes (after the marker) and their label rules.
///
/// The last character of each prefix is the parameter separator.
const LABEL_RULES: &[(&str, LabelRule)] = &[
    ("td_", LabelRule::TapDance),
    ("hm_", LabelRule::HoldTap("HM")),
    ("lt_", LabelRule::HoldTap("LT")),
    ("mo_", LabelRule::LayerSwitch("MO")),
    ("tog_", LabelRule::LayerSwitch("TOG")),
    ("kp_", LabelRule::KeyPress),
    ("kp ", LabelRule::KeyPress),
    ("mt ", LabelRule::HoldTap("MT")),
    ("lt ", LabelRule::HoldTap("LT")),
    ("mo ", LabelRule::LayerSwitch("MO")),
    ("tog ", LabelRule::LayerSwitch("TOG")),
];

/// Keywords per category, checked in order against the lower-cased code.
/// The first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(KeyCategory, &[&str])] = &[
    (KeyCategory::Shift, &["shift", "shft"]),
    (KeyCategory::Modifier, &["ctrl", "alt", "gui"]),
    (
        KeyCategory::LayerChange,
        &["mo_", "lt_", "tog_", "&mo ", "&lt ", "&tog ", "&to "],
    ),
    (KeyCategory::TapDance, &["td_"]),
    (KeyCategory::Combo, &["combo"]),
];

/// Decomposes a binding into display labels and a category.
///
/// # Examples
///
/// ```
/// use keymapviz::models::KeyCategory;
/// use keymapviz::services::labels::decompose;
///
/// let (labels, category) = decompose("&mo_1");
/// assert_eq!(labels, vec!["MO", "1"]);
/// assert_eq!(category, KeyCategory::LayerChange);
///
/// let (labels, _) = decompose("&hm_LGUI_A");
/// assert_eq!(labels, vec!["A", "HM\nLGUI"]);
/// ```
#[must_use]
pub fn decompose(code: &str) -> (Vec<String>, KeyCategory) {
    (labels(code), categorize(code))
}

/// Display labels for a binding (one or two entries).
#[must_use]
pub fn labels(code: &str) -> Vec<String> {
    let code = code.trim();
    let Some(body) = code.strip_prefix(BEHAVIOR_MARKER) else {
        return vec![code.to_string()];
    };

    for (prefix, rule) in LABEL_RULES {
        let Some(rest) = body.strip_prefix(prefix) else {
            continue;
        };
        let rest = rest.trim();
        if rest.is_empty() {
            continue;
        }
        let separator = prefix.chars().last().unwrap_or('_');
        return apply_rule(*rule, rest, separator);
    }

    // Unknown behavior: drop the behavior tag, keep the remainder
    let remainder = body
        .split_once(['_', ' '])
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
        .unwrap_or(body);
    vec![remainder.to_string()]
}

fn apply_rule(rule: LabelRule, rest: &str, separator: char) -> Vec<String> {
    let segments: Vec<&str> = if separator == ' ' {
        rest.split_whitespace().collect()
    } else {
        rest.split(separator).collect()
    };

    match rule {
        LabelRule::TapDance => vec!["TD".to_string(), segments.join("\n")],
        LabelRule::HoldTap(tag) => {
            let primary = segments.last().copied().unwrap_or(rest);
            let param = segments.first().copied().unwrap_or(rest);
            vec![primary.to_string(), format!("{tag}\n{param}")]
        }
        LabelRule::LayerSwitch(tag) => vec![tag.to_string(), rest.to_string()],
        LabelRule::KeyPress => vec![rest.to_string()],
    }
}

/// Semantic category of a binding.
#[must_use]
pub fn categorize(code: &str) -> KeyCategory {
    let lower = code.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map_or(KeyCategory::Regular, |(category, _)| *category)
}
