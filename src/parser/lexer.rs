//! Lossless tokenizer for keymap source text.
//!
//! Concatenating the text of every token reproduces the input exactly, so
//! rewrites can operate on typed tokens and re-serialize without disturbing
//! formatting. Words follow the `\w+` convention (ASCII letters, digits and
//! underscore), which makes a word token the unit of whole-word replacement.

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Run of letters, digits and underscores
    Word,
    /// Double-quoted string including its quotes
    Str,
    /// Run of whitespace, newlines included
    Space,
    /// `//` comment up to (not including) the newline
    LineComment,
    /// `/* ... */` comment
    BlockComment,
    /// Any other single character
    Punct,
}

/// A token borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Category
    pub kind: TokenKind,
    /// Exact source text
    pub text: &'a str,
    /// Byte offset of the token in the source
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// Returns true for whitespace and comments.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Space | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Returns true if this is the punctuation character `c`.
    #[must_use]
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.starts_with(c)
    }

    /// Returns true if this is the word `w`.
    #[must_use]
    pub fn is_word(&self, w: &str) -> bool {
        self.kind == TokenKind::Word && self.text == w
    }

    /// Contents of a string token without the surrounding quotes.
    #[must_use]
    pub fn string_value(&self) -> Option<&'a str> {
        if self.kind != TokenKind::Str {
            return None;
        }
        let inner = self.text.strip_prefix('"')?;
        Some(inner.strip_suffix('"').unwrap_or(inner))
    }
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Splits source text into tokens.
///
/// # Examples
///
/// ```
/// use keymapviz::parser::lexer::{tokenize, TokenKind};
///
/// let tokens = tokenize("bindings = <&kp A>;");
/// let text: String = tokens.iter().map(|t| t.text).collect();
/// assert_eq!(text, "bindings = <&kp A>;");
/// assert_eq!(tokens[0].kind, TokenKind::Word);
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let b = bytes[pos];

        let kind = if b.is_ascii_whitespace() {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            TokenKind::Space
        } else if b == b'/' && bytes.get(pos + 1) == Some(&b'/') {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            TokenKind::LineComment
        } else if b == b'/' && bytes.get(pos + 1) == Some(&b'*') {
            pos = source[pos + 2..]
                .find("*/")
                .map_or(bytes.len(), |end| pos + 2 + end + 2);
            TokenKind::BlockComment
        } else if b == b'"' {
            pos += 1;
            while pos < bytes.len() {
                match bytes[pos] {
                    b'\\' => pos += 2,
                    b'"' => {
                        pos += 1;
                        break;
                    }
                    b'\n' => break,
                    _ => pos += 1,
                }
            }
            pos = pos.min(bytes.len());
            TokenKind::Str
        } else if is_word_byte(b) {
            while pos < bytes.len() && is_word_byte(bytes[pos]) {
                pos += 1;
            }
            TokenKind::Word
        } else {
            // One full character, which may be multi-byte
            let width = source[pos..].chars().next().map_or(1, char::len_utf8);
            pos += width;
            TokenKind::Punct
        };

        tokens.push(Token {
            kind,
            text: &source[start..pos],
            offset: start,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source).iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_lossless() {
        let source = "#define NAV 2 // nav\n/ {\n  combo_esc { key-positions = <LT1 LT2>; };\n  /* block */ s = \"x\\\"y\";\n};\n";
        let rebuilt: String = tokenize(source).iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_token_kinds() {
        assert_eq!(
            kinds("key-positions = <LT1>;"),
            vec![
                (TokenKind::Word, "key"),
                (TokenKind::Punct, "-"),
                (TokenKind::Word, "positions"),
                (TokenKind::Space, " "),
                (TokenKind::Punct, "="),
                (TokenKind::Space, " "),
                (TokenKind::Punct, "<"),
                (TokenKind::Word, "LT1"),
                (TokenKind::Punct, ">"),
                (TokenKind::Punct, ";"),
            ]
        );
    }

    #[test]
    fn test_comments_and_strings() {
        assert_eq!(
            kinds("\"NAV\" // NAV\n/* NAV */"),
            vec![
                (TokenKind::Str, "\"NAV\""),
                (TokenKind::Space, " "),
                (TokenKind::LineComment, "// NAV"),
                (TokenKind::Space, "\n"),
                (TokenKind::BlockComment, "/* NAV */"),
            ]
        );
    }

    #[test]
    fn test_unterminated_constructs() {
        let source = "\"open\nx /* never closed";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].text, "\"open");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::BlockComment);
        let rebuilt: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_multibyte_punct() {
        let tokens = tokenize("a→b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "→");
    }

    #[test]
    fn test_string_value() {
        let tokens = tokenize("\"Base Layer\"");
        assert_eq!(tokens[0].string_value(), Some("Base Layer"));
    }
}
