//! Line splitting and tab expansion
//!
//! Turns decoded file content into `Line` values. Expansion is computed per
//! line from column zero, so every line can be processed independently.

use unicode_width::UnicodeWidthChar;

use super::types::Line;

/// Display width of a single character in terminal columns.
/// A literal tab (expansion disabled) counts as one column.
pub fn char_width(c: char) -> usize {
    if c == '\t' {
        1
    } else {
        c.width().unwrap_or(0)
    }
}

/// Display width of a string in terminal columns
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Split text on `\n`, `\r\n` and lone `\r`.
/// A terminator at the very end does not start another line.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = content.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        lines.push(&content[start..]);
    }

    lines
}

/// Replace each tab with spaces up to the next multiple of `tab_width`.
/// `tab_width == 0` leaves tabs untouched.
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    if tab_width == 0 || !line.contains('\t') {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + tab_width);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let fill = tab_width - column % tab_width;
            out.extend(std::iter::repeat(' ').take(fill));
            column += fill;
        } else {
            out.push(c);
            column += char_width(c);
        }
    }
    out
}

/// Tokenize a whole file into numbered lines
pub fn tokenize(content: &str, tab_width: usize) -> Vec<Line> {
    split_lines(content)
        .into_iter()
        .enumerate()
        .map(|(idx, text)| Line {
            number: idx + 1,
            text: text.to_string(),
            rendered: expand_tabs(text, tab_width),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- split_lines ---

    #[test]
    fn split_lines_trailing_newline_no_phantom_line() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn split_lines_without_trailing_newline() {
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn split_lines_keeps_real_empty_last_line() {
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
    }

    #[test]
    fn split_lines_universal_newlines() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn split_lines_empty() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn split_lines_only_newline() {
        assert_eq!(split_lines("\n"), vec![""]);
    }

    // --- expand_tabs ---

    #[test]
    fn expand_tabs_aligns_to_tab_stops() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tx", 4), "ab  x");
        assert_eq!(expand_tabs("abcd\tx", 4), "abcd    x");
    }

    #[test]
    fn expand_tabs_multiple_tabs() {
        assert_eq!(expand_tabs("a\tb\tc", 8), "a       b       c");
    }

    #[test]
    fn expand_tabs_zero_width_disables() {
        assert_eq!(expand_tabs("a\tb", 0), "a\tb");
    }

    #[test]
    fn expand_tabs_counts_wide_chars() {
        // U+4E2D is two columns wide
        assert_eq!(expand_tabs("\u{4e2d}\tx", 4), "\u{4e2d}  x");
    }

    // --- tokenize ---

    #[test]
    fn tokenize_numbers_lines_from_one() {
        let lines = tokenize("x\n\ty\n", 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[1].text, "\ty");
        assert_eq!(lines[1].rendered, "  y");
    }

    // --- display_width ---

    #[test]
    fn display_width_ascii_and_wide() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("\u{4e2d}\u{6587}"), 4);
    }
}
