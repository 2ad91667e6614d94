//! Symbolic reference resolution over the token stream.
//!
//! Two rewrites turn a normalized keymap into one that downstream tools can
//! read without a preprocessor:
//!
//! 1. every `key-positions = <...>;` list, prefixed variants such as
//!    `hold-trigger-key-positions` included, has its position names replaced
//!    by numeric indices and is re-serialized as `<name> = <a b c>;`
//! 2. every word that exactly equals a registered layer name is replaced by
//!    the layer id
//!
//! Both rewrites visit each token once and match whole tokens by equality,
//! so the result does not depend on the order of the layer definitions and
//! never touches longer identifiers, quoted strings, comments or the name
//! being declared by a `#define`.

use crate::diagnostics::Diagnostics;
use crate::models::{KeyPositionTable, LayerRegistry};
use crate::parser::lexer::{tokenize, Token, TokenKind};

const COMPONENT: &str = "resolve";

/// Output of [`resolve_references`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedKeymap {
    /// Fully resolved keymap text
    pub text: String,
    /// Number of `key-positions` lists re-serialized
    pub position_lists: usize,
    /// Number of position names replaced by an index
    pub positions_rewritten: usize,
    /// Number of layer-name occurrences replaced by an id
    pub layer_replacements: usize,
}

/// Runs both rewrites on normalized keymap text.
///
/// # Examples
///
/// ```
/// use keymapviz::diagnostics::Diagnostics;
/// use keymapviz::models::{KeyPositionTable, LayerRegistry, LayoutProfile};
/// use keymapviz::parser::defines::extract_defines;
/// use keymapviz::parser::resolve::resolve_references;
///
/// let positions = KeyPositionTable::fallback(&LayoutProfile::sofle());
/// let layers = LayerRegistry::from_symbols(&extract_defines("#define NAV 1\n"));
/// let mut diag = Diagnostics::new();
///
/// let out = resolve_references(
///     "c { key-positions = <LT1  LT2>; layers = <NAV>; };",
///     &positions,
///     &layers,
///     &mut diag,
/// );
/// assert_eq!(out.text, "c { key-positions = <16 15>; layers = <1>; };");
/// ```
pub fn resolve_references(
    text: &str,
    positions: &KeyPositionTable,
    layers: &LayerRegistry,
    diag: &mut Diagnostics,
) -> ResolvedKeymap {
    let (text, position_lists, positions_rewritten) = rewrite_position_lists(text, positions, diag);
    let (text, layer_replacements) = rewrite_layer_tokens(&text, layers);

    diag.info(
        COMPONENT,
        format!(
            "Rewrote {position_lists} key-position lists ({positions_rewritten} names), \
             made {layer_replacements} layer name replacements"
        ),
    );

    ResolvedKeymap {
        text,
        position_lists,
        positions_rewritten,
        layer_replacements,
    }
}

/// A matched `key-positions = <...>;` attribute.
struct PositionList<'a> {
    /// Index one past the last token of the attribute name
    name_end: usize,
    /// Index one past the closing `;`
    end: usize,
    /// Word tokens inside the angle brackets
    items: Vec<&'a str>,
}

fn next_significant(tokens: &[Token<'_>], mut idx: usize) -> usize {
    while idx < tokens.len() && tokens[idx].is_trivia() {
        idx += 1;
    }
    idx
}

fn match_position_list<'a>(tokens: &[Token<'a>], start: usize) -> Option<PositionList<'a>> {
    if start > 0 {
        let prev = tokens[start - 1];
        if prev.kind == TokenKind::Word || prev.is_punct('-') {
            return None;
        }
    }

    // hyphen-joined words ending in `key-positions`
    let mut words = Vec::new();
    let mut name_end = start;
    loop {
        let tok = tokens.get(name_end)?;
        if tok.kind != TokenKind::Word {
            return None;
        }
        words.push(tok.text);
        name_end += 1;

        let joined = tokens.get(name_end).is_some_and(|t| t.is_punct('-'))
            && tokens
                .get(name_end + 1)
                .is_some_and(|t| t.kind == TokenKind::Word);
        if !joined {
            break;
        }
        name_end += 1;
    }
    if !words.ends_with(&["key", "positions"]) {
        return None;
    }

    let mut idx = next_significant(tokens, name_end);
    if !tokens.get(idx)?.is_punct('=') {
        return None;
    }
    idx = next_significant(tokens, idx + 1);
    if !tokens.get(idx)?.is_punct('<') {
        return None;
    }
    idx += 1;

    let mut items = Vec::new();
    loop {
        let tok = tokens.get(idx)?;
        if tok.is_punct('>') {
            break;
        }
        if tok.is_punct(';') || tok.is_punct('{') || tok.is_punct('}') {
            return None;
        }
        if tok.kind == TokenKind::Word {
            items.push(tok.text);
        }
        idx += 1;
    }
    if items.is_empty() {
        return None;
    }

    idx = next_significant(tokens, idx + 1);
    if !tokens.get(idx)?.is_punct(';') {
        return None;
    }

    Some(PositionList {
        name_end,
        end: idx + 1,
        items,
    })
}

/// Replaces position names inside every `key-positions` list.
///
/// Known names become their index, numeric tokens pass through, unknown
/// names are kept literally with a warning. Returns the rewritten text, the
/// number of lists and the number of names replaced.
pub fn rewrite_position_lists(
    text: &str,
    positions: &KeyPositionTable,
    diag: &mut Diagnostics,
) -> (String, usize, usize) {
    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len());
    let mut lists = 0;
    let mut rewritten = 0;
    let mut idx = 0;

    while idx < tokens.len() {
        let Some(list) = match_position_list(&tokens, idx) else {
            out.push_str(tokens[idx].text);
            idx += 1;
            continue;
        };

        let resolved: Vec<String> = list
            .items
            .iter()
            .map(|item| {
                if let Some(index) = positions.get(item) {
                    rewritten += 1;
                    index.to_string()
                } else {
                    if item.parse::<u32>().is_err() {
                        diag.warn(COMPONENT, format!("Unknown key position '{item}', left as is"));
                    }
                    (*item).to_string()
                }
            })
            .collect();

        for tok in &tokens[idx..list.name_end] {
            out.push_str(tok.text);
        }
        out.push_str(" = <");
        out.push_str(&resolved.join(" "));
        out.push_str(">;");
        lists += 1;
        idx = list.end;
    }

    (out, lists, rewritten)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    /// Ordinary code
    None,
    /// Just saw `#` at the start of a line
    Hash,
    /// Inside `#define`, before the defined name
    DefineName,
    /// Rest of a `#define` line after the name
    DefineBody,
    /// Inside `#include`, left untouched
    Include,
}

/// Replaces every word equal to a registered layer name with its id.
///
/// Returns the rewritten text and the number of replacements.
pub fn rewrite_layer_tokens(text: &str, layers: &LayerRegistry) -> (String, usize) {
    if layers.is_empty() {
        return (text.to_string(), 0);
    }

    let mut out = String::with_capacity(text.len());
    let mut replacements = 0;
    let mut state = Directive::None;
    let mut at_line_start = true;

    for tok in tokenize(text) {
        match tok.kind {
            TokenKind::Space if tok.text.contains('\n') => {
                state = Directive::None;
                at_line_start = true;
            }
            TokenKind::Space | TokenKind::LineComment | TokenKind::BlockComment => {}
            TokenKind::Punct if at_line_start && tok.is_punct('#') => {
                state = Directive::Hash;
                at_line_start = false;
            }
            TokenKind::Word => {
                at_line_start = false;
                match state {
                    Directive::Hash if tok.text == "define" => state = Directive::DefineName,
                    Directive::Hash if tok.text == "include" => state = Directive::Include,
                    Directive::Hash => state = Directive::None,
                    Directive::DefineName => {
                        state = Directive::DefineBody;
                        out.push_str(tok.text);
                        continue;
                    }
                    Directive::Include => {
                        out.push_str(tok.text);
                        continue;
                    }
                    Directive::None | Directive::DefineBody => {
                        if let Some(id) = layers.get(tok.text) {
                            out.push_str(&id.to_string());
                            replacements += 1;
                            continue;
                        }
                    }
                }
            }
            TokenKind::Str | TokenKind::Punct => at_line_start = false,
        }
        out.push_str(tok.text);
    }

    (out, replacements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LayoutProfile, SymbolTable};
    use std::collections::BTreeMap;

    fn registry(pairs: &[(&str, &str)]) -> LayerRegistry {
        let mut symbols = SymbolTable::new();
        for (name, value) in pairs {
            symbols.insert(*name, *value);
        }
        LayerRegistry::from_symbols(&symbols)
    }

    fn sofle() -> KeyPositionTable {
        KeyPositionTable::fallback(&LayoutProfile::sofle())
    }

    #[test]
    fn test_position_list_all_known() {
        let mut diag = Diagnostics::new();
        let (text, lists, rewritten) =
            rewrite_position_lists("key-positions = <LT3 LT2 RH0>;", &sofle(), &mut diag);

        assert_eq!(text, "key-positions = <14 15 55>;");
        assert_eq!(lists, 1);
        assert_eq!(rewritten, 3);
        assert!(!diag.has_warnings());
    }

    #[test]
    fn test_position_list_preserves_length_and_order() {
        let table = sofle();
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        let input = format!("key-positions = <{}>;", names.join(" "));

        let mut diag = Diagnostics::new();
        let (text, _, rewritten) = rewrite_position_lists(&input, &table, &mut diag);

        let inner = text
            .strip_prefix("key-positions = <")
            .and_then(|s| s.strip_suffix(">;"))
            .unwrap();
        let resolved: Vec<u32> = inner.split(' ').map(|n| n.parse().unwrap()).collect();
        let expected: Vec<u32> = names.iter().map(|n| table.get(n).unwrap()).collect();
        assert_eq!(resolved, expected);
        assert_eq!(rewritten, names.len());
    }

    #[test]
    fn test_position_list_passthrough_and_warning() {
        let mut diag = Diagnostics::new();
        let (text, _, rewritten) =
            rewrite_position_lists("key-positions = < 7 LT1\n  XX9 >  ;", &sofle(), &mut diag);

        assert_eq!(text, "key-positions = <7 16 XX9>;");
        assert_eq!(rewritten, 1);
        assert_eq!(diag.warnings().count(), 1);
        assert!(diag.warnings().next().unwrap().message.contains("XX9"));
    }

    #[test]
    fn test_position_list_only_touches_position_attributes() {
        let mut diag = Diagnostics::new();
        let input = "other = <LT1>; positions = <LT1>; s = \"key-positions = <LT1>;\";";
        let (text, lists, _) = rewrite_position_lists(input, &sofle(), &mut diag);

        assert_eq!(text, input);
        assert_eq!(lists, 0);
    }

    #[test]
    fn test_prefixed_position_list_is_resolved() {
        let mut diag = Diagnostics::new();
        let input = "hml: hml { hold-trigger-key-positions = <RT0 RT1 RH0>; };\nc { key-positions = <LT1>; };";
        let (text, lists, rewritten) = rewrite_position_lists(input, &sofle(), &mut diag);

        assert_eq!(
            text,
            "hml: hml { hold-trigger-key-positions = <18 19 55>; };\nc { key-positions = <16>; };"
        );
        assert_eq!(lists, 2);
        assert_eq!(rewritten, 4);
        assert!(!diag.has_warnings());
    }

    #[test]
    fn test_position_list_with_extracted_table() {
        let mut positions = BTreeMap::new();
        positions.insert("LT1".to_string(), 100);
        let table = KeyPositionTable::extracted(positions);

        let mut diag = Diagnostics::new();
        let (text, _, _) = rewrite_position_lists("key-positions = <LT1>;", &table, &mut diag);
        assert_eq!(text, "key-positions = <100>;");
    }

    #[test]
    fn test_layer_tokens_whole_word_only() {
        let layers = registry(&[("NAV", "1"), ("NAV_EXT", "2")]);
        let (text, count) = rewrite_layer_tokens("&mo NAV &lt NAV_EXT SPACE &kp NAVX", &layers);

        assert_eq!(text, "&mo 1 &lt 2 SPACE &kp NAVX");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_layer_tokens_order_independent() {
        // a prefix collision that a sequential search-and-replace would get wrong
        let forward = registry(&[("SYM", "3"), ("SYM_NUM", "4")]);
        let (text, _) = rewrite_layer_tokens("&mo SYM &mo SYM_NUM", &forward);
        assert_eq!(text, "&mo 3 &mo 4");
    }

    #[test]
    fn test_layer_tokens_skip_strings_comments_and_define_names() {
        let layers = registry(&[("NAV", "1")]);
        let input = "#define NAV 1\n#define GO_NAV NAV\ndisplay-name = \"NAV\"; /* NAV */ x = <NAV>;";
        let (text, count) = rewrite_layer_tokens(input, &layers);

        assert_eq!(
            text,
            "#define NAV 1\n#define GO_NAV 1\ndisplay-name = \"NAV\"; /* NAV */ x = <1>;"
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn test_layer_tokens_skip_include_paths() {
        let layers = registry(&[("NAV", "1")]);
        let input = "#include <NAV/keys.h>\n&mo NAV";
        let (text, _) = rewrite_layer_tokens(input, &layers);
        assert_eq!(text, "#include <NAV/keys.h>\n&mo 1");
    }

    #[test]
    fn test_resolve_counts() {
        let layers = registry(&[("BASE", "0"), ("NAV", "1")]);
        let mut diag = Diagnostics::new();
        let out = resolve_references(
            "a { key-positions = <LT1 LT2>; layers = <BASE NAV>; };\nb { key-positions = <0 1>; };",
            &sofle(),
            &layers,
            &mut diag,
        );

        assert_eq!(
            out.text,
            "a { key-positions = <16 15>; layers = <0 1>; };\nb { key-positions = <0 1>; };"
        );
        assert_eq!(out.position_lists, 2);
        assert_eq!(out.positions_rewritten, 2);
        assert_eq!(out.layer_replacements, 2);
    }
}
