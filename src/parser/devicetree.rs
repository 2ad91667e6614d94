//! Tolerant devicetree parser for keymap sources.
//!
//! Builds a node tree from the token stream of a `.keymap` file. Only the
//! subset of devicetree syntax found in keymaps is understood: nodes with
//! optional labels, properties with string, cell-list, byte-string and
//! reference values, and top-level macro invocations such as
//! `ZMK_COMBO(...)`. Preprocessor directives are skipped. Anything the parser
//! does not understand is skipped up to the next `;` and reported as a debug
//! event, so one malformed statement never hides the rest of the file.

use crate::diagnostics::Diagnostics;
use crate::parser::lexer::{tokenize, Token, TokenKind};

const COMPONENT: &str = "devicetree";

/// Preprocessor directives removed before parsing.
const DIRECTIVES: &[&str] = &[
    "define", "undef", "include", "if", "ifdef", "ifndef", "elif", "else", "endif", "pragma",
    "error", "warning", "line",
];

/// Punctuation allowed inside node, label and property names.
const NAME_PUNCT: &[char] = &['-', ',', '.', '#', '&', '@', '+', '?'];

/// A property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Quoted string, quotes removed
    Str(String),
    /// `<...>` cell list; adjacent tokens and parenthesized groups form one cell
    Cells(Vec<String>),
    /// `[...]` byte string, raw contents
    Bytes(String),
    /// `&label` reference, without the marker
    Ref(String),
    /// Anything else, raw text
    Raw(String),
}

/// A `name = value, value;` or boolean `name;` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (e.g., "key-positions")
    pub name: String,
    /// Values in order; empty for boolean properties
    pub values: Vec<Value>,
}

impl Property {
    /// First string value.
    #[must_use]
    pub fn string(&self) -> Option<&str> {
        self.values.iter().find_map(|v| match v {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// All cells of all cell-list values, flattened.
    #[must_use]
    pub fn cells(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter_map(|v| match v {
                Value::Cells(cells) => Some(cells.iter().map(String::as_str)),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

/// A macro invocation such as `ZMK_COMBO(esc, &kp ESC, LT1 LT2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroCall {
    /// Macro name
    pub name: String,
    /// Comma-separated arguments, trimmed
    pub args: Vec<String>,
    /// Byte offset of the invocation in the source
    pub offset: usize,
}

/// A devicetree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node name ("/" for a root node, "" for the document)
    pub name: String,
    /// Label from `label: name { ... }`
    pub label: Option<String>,
    /// Properties in source order
    pub properties: Vec<Property>,
    /// Child nodes in source order
    pub children: Vec<Node>,
    /// Macro invocations directly inside this node
    pub macros: Vec<MacroCall>,
    /// Byte offset of the node in the source
    pub offset: usize,
}

impl Node {
    fn new(name: impl Into<String>, label: Option<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            label,
            properties: Vec::new(),
            children: Vec::new(),
            macros: Vec::new(),
            offset,
        }
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// First string value of a property.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Property::string)
    }

    /// Flattened cells of a property, `None` if the property is absent.
    #[must_use]
    pub fn cells(&self, name: &str) -> Option<Vec<&str>> {
        self.property(name).map(Property::cells)
    }

    /// Returns the first direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All nodes below this one, depth-first in source order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }

    /// All macro invocations in this node and below, ordered by offset.
    #[must_use]
    pub fn all_macros(&self) -> Vec<&MacroCall> {
        let mut out: Vec<&MacroCall> = self.macros.iter().collect();
        for child in &self.children {
            out.extend(child.all_macros());
        }
        out.sort_by_key(|m| m.offset);
        out
    }
}

/// Parses keymap source into a document node whose children are the
/// top-level nodes.
///
/// # Examples
///
/// ```
/// use keymapviz::diagnostics::Diagnostics;
/// use keymapviz::parser::devicetree::parse;
///
/// let mut diag = Diagnostics::new();
/// let doc = parse("/ { combos { esc { key-positions = <1 2>; bindings = <&kp ESC>; }; }; };", &mut diag);
/// let nodes = doc.descendants();
/// let esc = nodes[2];
/// assert_eq!(esc.name, "esc");
/// assert_eq!(esc.cells("bindings"), Some(vec!["&kp", "ESC"]));
/// ```
pub fn parse(source: &str, diag: &mut Diagnostics) -> Node {
    let mut parser = Parser {
        source,
        tokens: significant_tokens(source),
        pos: 0,
        diag,
    };
    let mut doc = Node::new("", None, 0);

    loop {
        parser.parse_body(&mut doc);
        match parser.peek() {
            Some(tok) if tok.is_punct('}') => {
                parser.diag.debug(
                    COMPONENT,
                    format!("Ignoring unmatched '}}' at offset {}", tok.offset),
                );
                parser.pos += 1;
            }
            _ => break,
        }
    }

    doc
}

/// Tokens with whitespace, comments and preprocessor directive lines removed.
fn significant_tokens(source: &str) -> Vec<Token<'_>> {
    let all = tokenize(source);
    let mut out = Vec::with_capacity(all.len());
    let mut at_line_start = true;
    let mut in_directive = false;
    let mut idx = 0;

    while idx < all.len() {
        let tok = all[idx];

        if tok.kind == TokenKind::Space && tok.text.contains('\n') {
            let continued = idx > 0 && all[idx - 1].is_punct('\\');
            if !continued {
                in_directive = false;
            }
            at_line_start = true;
            idx += 1;
            continue;
        }

        if tok.is_trivia() {
            idx += 1;
            continue;
        }

        if at_line_start && tok.is_punct('#') {
            let next = all.get(idx + 1);
            if next.is_some_and(|n| n.kind == TokenKind::Word && DIRECTIVES.contains(&n.text)) {
                in_directive = true;
            }
        }
        at_line_start = false;

        if !in_directive {
            out.push(tok);
        }
        idx += 1;
    }

    out
}

struct Parser<'s, 'd> {
    source: &'s str,
    tokens: Vec<Token<'s>>,
    pos: usize,
    diag: &'d mut Diagnostics,
}

impl<'s> Parser<'s, '_> {
    fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<Token<'s>> {
        self.tokens.get(self.pos + ahead).copied()
    }

    fn peek_is(&self, c: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(c))
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek_is(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Source text spanning tokens `start..end` (token indices).
    fn slice(&self, start: usize, end: usize) -> &'s str {
        if start >= end {
            return "";
        }
        let from = self.tokens[start].offset;
        let last = self.tokens[end - 1];
        &self.source[from..last.offset + last.text.len()]
    }

    fn contiguous(&self, idx: usize) -> bool {
        idx > 0 && {
            let prev = self.tokens[idx - 1];
            prev.offset + prev.text.len() == self.tokens[idx].offset
        }
    }

    /// Parses node contents until a closing `}` (left unconsumed) or EOF.
    fn parse_body(&mut self, node: &mut Node) {
        while let Some(tok) = self.peek() {
            if tok.is_punct('}') {
                return;
            }
            if tok.is_punct(';') {
                self.pos += 1;
                continue;
            }
            self.parse_item(node);
        }
    }

    fn parse_item(&mut self, node: &mut Node) {
        let Some(tok) = self.peek() else {
            return;
        };

        if tok.is_punct('/') {
            if self.peek_at(1).is_some_and(|t| t.is_punct('{')) {
                self.pos += 1;
                let child = self.parse_node("/".to_string(), None, tok.offset);
                node.children.push(child);
            } else {
                // `/delete-node/`, `/dts-v1/` and similar
                self.skip_statement();
            }
            return;
        }

        let Some(name) = self.read_name() else {
            self.skip_statement();
            return;
        };

        match self.peek() {
            Some(t) if t.is_punct(':') => {
                self.pos += 1;
                let offset = self.peek().map_or(tok.offset, |t| t.offset);
                let target = if self.peek_is('/') {
                    self.pos += 1;
                    Some("/".to_string())
                } else {
                    self.read_name()
                };
                match target {
                    Some(target) if self.peek_is('{') => {
                        let child = self.parse_node(target, Some(name), offset);
                        node.children.push(child);
                    }
                    _ => self.skip_statement(),
                }
            }
            Some(t) if t.is_punct('{') => {
                let child = self.parse_node(name, None, tok.offset);
                node.children.push(child);
            }
            Some(t) if t.is_punct('=') => {
                self.pos += 1;
                let values = self.parse_values();
                node.properties.push(Property { name, values });
            }
            Some(t) if t.is_punct(';') => {
                self.pos += 1;
                node.properties.push(Property {
                    name,
                    values: Vec::new(),
                });
            }
            Some(t) if t.is_punct('(') && tok.kind == TokenKind::Word => {
                let args = self.parse_macro_args();
                self.eat(';');
                node.macros.push(MacroCall {
                    name,
                    args,
                    offset: tok.offset,
                });
            }
            _ => self.skip_statement(),
        }
    }

    /// Reads a name made of contiguous word and name-punctuation tokens.
    fn read_name(&mut self) -> Option<String> {
        let start = self.pos;
        let first = self.peek()?;
        let starts_name = first.kind == TokenKind::Word || first.is_punct('#') || first.is_punct('&');
        if !starts_name {
            return None;
        }
        self.pos += 1;

        while let Some(tok) = self.peek() {
            let name_part = tok.kind == TokenKind::Word
                || (tok.kind == TokenKind::Punct && tok.text.starts_with(NAME_PUNCT));
            if !name_part || !self.contiguous(self.pos) {
                break;
            }
            self.pos += 1;
        }

        Some(self.slice(start, self.pos).to_string())
    }

    fn parse_node(&mut self, name: String, label: Option<String>, offset: usize) -> Node {
        // at '{'
        self.pos += 1;
        let mut node = Node::new(name, label, offset);
        self.parse_body(&mut node);

        if !self.eat('}') {
            self.diag.debug(
                COMPONENT,
                format!("Node '{}' is not closed before end of input", node.name),
            );
        }
        self.eat(';');
        node
    }

    fn parse_values(&mut self) -> Vec<Value> {
        let mut values = Vec::new();

        while let Some(tok) = self.peek() {
            if tok.is_punct(';') || tok.is_punct('}') {
                break;
            }

            let value = if tok.kind == TokenKind::Str {
                self.pos += 1;
                Value::Str(tok.string_value().unwrap_or_default().to_string())
            } else if tok.is_punct('<') {
                Value::Cells(self.parse_cells())
            } else if tok.is_punct('[') {
                Value::Bytes(self.parse_bracketed('[', ']'))
            } else if tok.is_punct('&') {
                let name = self.read_name().unwrap_or_default();
                Value::Ref(name.trim_start_matches('&').to_string())
            } else {
                Value::Raw(self.parse_raw())
            };
            values.push(value);

            if !self.eat(',') {
                break;
            }
        }

        if !self.eat(';') {
            self.skip_statement();
        }
        values
    }

    /// Parses `<...>` into cells; stops early at `;` or `}` if unterminated.
    fn parse_cells(&mut self) -> Vec<String> {
        // at '<'
        self.pos += 1;
        let mut cells = Vec::new();
        let mut cell_start: Option<usize> = None;
        let mut depth = 0usize;

        while let Some(tok) = self.peek() {
            if depth == 0 && (tok.is_punct('>') || tok.is_punct(';') || tok.is_punct('}')) {
                break;
            }

            let joins = cell_start.is_some() && (depth > 0 || self.contiguous(self.pos));
            if !joins {
                if let Some(start) = cell_start {
                    cells.push(self.slice(start, self.pos).to_string());
                }
                cell_start = Some(self.pos);
            }

            if tok.is_punct('(') {
                depth += 1;
            } else if tok.is_punct(')') {
                depth = depth.saturating_sub(1);
            }
            self.pos += 1;
        }

        if let Some(start) = cell_start {
            cells.push(self.slice(start, self.pos).to_string());
        }
        self.eat('>');
        cells
    }

    fn parse_bracketed(&mut self, open: char, close: char) -> String {
        // at `open`
        self.pos += 1;
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(tok) = self.peek() {
            if tok.is_punct(open) {
                depth += 1;
            } else if tok.is_punct(close) {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if depth == 0 && (tok.is_punct(';') || tok.is_punct('}')) {
                break;
            }
            self.pos += 1;
        }

        let text = self.slice(start, self.pos).to_string();
        self.eat(close);
        text
    }

    fn parse_raw(&mut self) -> String {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(tok) = self.peek() {
            if depth == 0 && (tok.is_punct(',') || tok.is_punct(';') || tok.is_punct('}')) {
                break;
            }
            if tok.is_punct('(') {
                depth += 1;
            } else if tok.is_punct(')') {
                depth = depth.saturating_sub(1);
            }
            self.pos += 1;
        }

        self.slice(start, self.pos).to_string()
    }

    fn parse_macro_args(&mut self) -> Vec<String> {
        // at '('
        self.pos += 1;
        let mut args = Vec::new();
        let mut arg_start = self.pos;
        let mut depth = 0usize;

        while let Some(tok) = self.peek() {
            if tok.is_punct('(') {
                depth += 1;
            } else if tok.is_punct(')') {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if tok.is_punct(',') && depth == 0 {
                args.push(self.slice(arg_start, self.pos).trim().to_string());
                arg_start = self.pos + 1;
            } else if depth == 0 && (tok.is_punct(';') || tok.is_punct('}')) {
                break;
            }
            self.pos += 1;
        }

        let last = self.slice(arg_start, self.pos).trim().to_string();
        if !last.is_empty() || !args.is_empty() {
            args.push(last);
        }
        if !self.eat(')') {
            self.diag
                .debug(COMPONENT, "Macro invocation is not closed before end of statement");
        }
        args
    }

    /// Skips to the end of the current statement, including any nested
    /// braces. A `}` closing the enclosing node is left unconsumed.
    fn skip_statement(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(tok) = self.peek() {
            if tok.is_punct('{') {
                depth += 1;
            } else if tok.is_punct('}') {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if depth == 0 {
                    self.pos += 1;
                    self.eat(';');
                    break;
                }
            } else if tok.is_punct(';') && depth == 0 {
                self.pos += 1;
                break;
            }
            self.pos += 1;
        }

        if self.pos == start && self.peek().is_some_and(|t| !t.is_punct('}')) {
            self.pos += 1;
        }

        let skipped = self.slice(start, self.pos);
        if !skipped.is_empty() {
            self.diag
                .debug(COMPONENT, format!("Skipped unrecognized statement: {skipped}"));
        }
    }
}
