//! Comment stripping and blank line removal.

/// Returns the part of a line before any `//` comment.
///
/// A `//` inside a double-quoted string does not start a comment.
#[must_use]
pub fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' if in_string => idx += 1,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(idx + 1) == Some(&b'/') => return &line[..idx],
            _ => {}
        }
        idx += 1;
    }

    line
}

/// Normalizes keymap text before reference resolution.
///
/// Removes `//` comments and every line that is left blank. Running it twice
/// yields the same text as running it once.
///
/// # Examples
///
/// ```
/// use keymapviz::parser::normalize::normalize_keymap;
///
/// let text = "/ {\n    // comment\n\n    keymap { }; // trailing\n};\n";
/// assert_eq!(normalize_keymap(text), "/ {\n    keymap { };\n};\n");
/// ```
#[must_use]
pub fn normalize_keymap(content: &str) -> String {
    let mut output = String::with_capacity(content.len());

    for line in content.lines() {
        let code = strip_line_comment(line).trim_end();
        if code.trim().is_empty() {
            continue;
        }
        output.push_str(code);
        output.push('\n');
    }

    output
}

/// Iterates over lines that are not commented out.
///
/// Lines starting with `//` and lines inside `/* ... */` spans are skipped;
/// a line that opens a block comment contributes the text before `/*`.
pub fn code_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut in_block = false;

    content.lines().filter_map(move |line| {
        if in_block {
            if line.contains("*/") {
                in_block = false;
            }
            return None;
        }

        if line.trim_start().starts_with("//") {
            return None;
        }

        if let Some(start) = line.find("/*") {
            if !line[start + 2..].contains("*/") {
                in_block = true;
            }
            let before = &line[..start];
            return (!before.trim().is_empty()).then_some(before);
        }

        Some(line)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comment() {
        assert_eq!(strip_line_comment("#define BASE 0 // base layer"), "#define BASE 0 ");
        assert_eq!(strip_line_comment("// whole line"), "");
        assert_eq!(strip_line_comment("no comment"), "no comment");
    }

    #[test]
    fn test_comment_marker_inside_string_is_kept() {
        assert_eq!(
            strip_line_comment(r#"display-name = "a//b"; // note"#),
            r#"display-name = "a//b"; "#
        );
    }

    #[test]
    fn test_normalize_removes_blank_runs() {
        let text = "a\n\n\n   \nb // x\n\t\n// only comment\nc";
        assert_eq!(normalize_keymap(text), "a\nb\nc\n");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let text = "\n\n/ {\n  // layers\n  keymap {\n\n    base_layer { bindings = <&kp A>; }; // q\n  };\n};\n\n";
        let once = normalize_keymap(text);
        let twice = normalize_keymap(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_keymap(""), "");
        assert_eq!(normalize_keymap("\n\n// x\n"), "");
    }

    #[test]
    fn test_code_lines_skips_comments() {
        let text = "#define A 1\n// #define B 2\n/* block\n#define C 3\n*/\n#define D 4 /* inline */\n#define E 5 /* open\n#define F 6\n*/";
        let lines: Vec<&str> = code_lines(text).collect();
        assert_eq!(
            lines,
            vec!["#define A 1", "#define D 4 ", "#define E 5 "]
        );
    }
}
