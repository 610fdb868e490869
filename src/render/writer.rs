//! Emitting rendered rows
//!
//! `AnsiWriter` prints the two panes with crossterm styling; `JsonWriter`
//! prints one JSON object per row for other tools to consume.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

use crate::config::{Colors, HighlightMode};

use super::layout::{Cell, Highlight, Layout, RenderedKind, RenderedRow, SEPARATOR};

/// Sink for rendered rows
pub trait RowWriter {
    fn write_row(&mut self, row: &RenderedRow) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()>;

    fn write_all_rows(&mut self, rows: &[RenderedRow]) -> io::Result<()> {
        for row in rows {
            self.write_row(row)?;
        }
        self.finish()
    }
}

/// Writes rows as terminal lines: `num sign text │ num sign text`
pub struct AnsiWriter<W: Write> {
    out: W,
    layout: Layout,
    colors: Colors,
    highlight: HighlightMode,
    color: bool,
}

impl<W: Write> AnsiWriter<W> {
    pub fn new(
        out: W,
        layout: Layout,
        colors: Colors,
        highlight: HighlightMode,
        color: bool,
    ) -> Self {
        Self {
            out,
            layout,
            colors,
            highlight,
            color,
        }
    }

    fn write_cell(
        &mut self,
        cell: &Cell,
        kind: RenderedKind,
        number_width: usize,
    ) -> io::Result<()> {
        if kind.is_header() {
            let color = match kind {
                RenderedKind::FileHeader => self.colors.file_header,
                _ => self.colors.hunk_header,
            };
            self.fg(&cell.text, color)?;
            return self.pad(cell.padding);
        }

        if number_width > 0 {
            match cell.number {
                Some(n) => {
                    let text = format!("{:>width$} ", n, width = number_width - 1);
                    let color = self.colors.line_number;
                    self.fg(&text, color)?;
                }
                None => self.pad(number_width)?,
            }
        }

        if self.layout.signs {
            match cell.sign {
                '+' => {
                    let color = self.colors.added;
                    self.fg("+", color)?;
                }
                '-' => {
                    let color = self.colors.removed;
                    self.fg("-", color)?;
                }
                other => queue!(self.out, Print(other))?,
            }
        }

        let mut pos = 0;
        for styled in &cell.styles {
            if styled.range.start > pos {
                queue!(self.out, Print(char_slice(&cell.text, pos, styled.range.start)))?;
            }
            self.paint(char_slice(&cell.text, styled.range.start, styled.range.end), styled.style)?;
            pos = styled.range.end;
        }
        let len = cell.text.chars().count();
        if pos < len {
            queue!(self.out, Print(char_slice(&cell.text, pos, len)))?;
        }

        self.pad(cell.padding)
    }

    /// Paint a highlighted run. Whitespace-only runs always get a background,
    /// since a foreground color on blanks shows nothing.
    fn paint(&mut self, text: &str, style: Highlight) -> io::Result<()> {
        if !self.color {
            return queue!(self.out, Print(text));
        }

        let (fg, bg) = match style {
            Highlight::Added => (self.colors.added, self.colors.added_bg),
            Highlight::Removed => (self.colors.removed, self.colors.removed_bg),
        };
        let blank = text.chars().all(char::is_whitespace);

        match (self.highlight, blank) {
            (HighlightMode::Background, _) | (HighlightMode::Foreground, true) => {
                queue!(self.out, SetBackgroundColor(bg), Print(text), ResetColor)
            }
            (HighlightMode::Foreground, false) => {
                queue!(self.out, SetForegroundColor(fg), Print(text), ResetColor)
            }
        }
    }

    fn fg(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.color {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            queue!(self.out, Print(text))
        }
    }

    fn pad(&mut self, width: usize) -> io::Result<()> {
        if width > 0 {
            queue!(self.out, Print(" ".repeat(width)))?;
        }
        Ok(())
    }
}

impl<W: Write> RowWriter for AnsiWriter<W> {
    fn write_row(&mut self, row: &RenderedRow) -> io::Result<()> {
        let left_numbers = self.layout.left_number_width;
        let right_numbers = self.layout.right_number_width;
        self.write_cell(&row.left, row.kind, left_numbers)?;
        queue!(self.out, Print(SEPARATOR))?;
        self.write_cell(&row.right, row.kind, right_numbers)?;
        writeln!(self.out)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Writes each row as a single-line JSON object
pub struct JsonWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RowWriter for JsonWriter<W> {
    fn write_row(&mut self, row: &RenderedRow) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, row)?;
        writeln!(self.out)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Substring by char offsets `[start, end)`
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte = |idx: usize| {
        text.char_indices()
            .nth(idx)
            .map(|(b, _)| b)
            .unwrap_or(text.len())
    };
    &text[byte(start)..byte(end)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, WrapMode};
    use crate::diff::align_documents;
    use crate::diff::tokenize::tokenize;

    fn render(old: &str, new: &str, config: &Config) -> (Layout, Vec<RenderedRow>) {
        let old = tokenize(old, config.tab_width);
        let new = tokenize(new, config.tab_width);
        let hunks = align_documents(&old, &new, config.context_lines, config.similarity_threshold);
        let layout = Layout::new(config, &hunks).unwrap();
        let rows = layout.render("a.txt", "b.txt", &hunks);
        (layout, rows)
    }

    fn plain(config: &Config, old: &str, new: &str) -> String {
        let (layout, rows) = render(old, new, config);
        let mut out = Vec::new();
        AnsiWriter::new(&mut out, layout, config.colors.clone(), config.highlight, false)
            .write_all_rows(&rows)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn colored(config: &Config, old: &str, new: &str, mode: HighlightMode) -> String {
        let (layout, rows) = render(old, new, config);
        let mut out = Vec::new();
        AnsiWriter::new(&mut out, layout, config.colors.clone(), mode, true)
            .write_all_rows(&rows)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    /// `text` wrapped in the escape sequence of `command` and a reset
    fn styled(command: impl crossterm::Command, text: &str) -> String {
        let mut buf = Vec::new();
        queue!(buf, command, Print(text), ResetColor).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // --- char_slice ---

    #[test]
    fn char_slice_handles_multibyte() {
        assert_eq!(char_slice("a\u{4e2d}b", 1, 2), "\u{4e2d}");
        assert_eq!(char_slice("abc", 1, 3), "bc");
        assert_eq!(char_slice("abc", 3, 3), "");
    }

    // --- AnsiWriter ---

    #[test]
    fn plain_output_has_fixed_width_lines() {
        let config = Config {
            width: 40,
            ..Config::default()
        };
        let out = plain(&config, "a\nb\nc\n", "a\nx\nc\nd\n");
        for line in out.lines() {
            assert_eq!(unicode_width::UnicodeWidthStr::width(line), 40 - 1, "{:?}", line);
        }
    }

    #[test]
    fn plain_output_shows_numbers_and_signs() {
        let config = Config {
            width: 40,
            ..Config::default()
        };
        let out = plain(&config, "a\nb\n", "a\nx\n");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("--- a.txt"));
        assert!(lines[1].starts_with("@@ -1,2 @@"));
        assert!(lines[2].starts_with("1  a"));
        assert!(lines[3].starts_with("2 -b"));
        assert!(lines[3].contains("\u{2502} 2 +x"));
    }

    #[test]
    fn plain_output_without_decorations() {
        let config = Config {
            width: 21,
            line_numbers: false,
            signs: false,
            wrap: WrapMode::Truncate,
            ..Config::default()
        };
        let out = plain(&config, "same\n", "same\n");
        assert_eq!(out.lines().count(), 1);

        let out = plain(&config, &format!("{}\n", "o".repeat(30)), "n\n");
        let row = out.lines().nth(2).unwrap();
        assert_eq!(row, format!("{} \u{2502} n        ", "o".repeat(9)));
    }

    #[test]
    fn colored_output_uses_escapes() {
        let config = Config {
            width: 40,
            ..Config::default()
        };
        let out = colored(&config, "let x = 1;\n", "let y = 1;\n", HighlightMode::Foreground);
        assert!(out.contains('\u{1b}'));
        assert!(out.contains("\u{1b}[0m"));
    }

    #[test]
    fn foreground_mode_colors_changed_text() {
        let config = Config {
            width: 60,
            ..Config::default()
        };
        let colors = &config.colors;
        let out = colored(&config, "let x = 1;\n", "let y = 1;\n", HighlightMode::Foreground);
        assert!(out.contains(&styled(SetForegroundColor(colors.removed), "x")), "{:?}", out);
        assert!(out.contains(&styled(SetForegroundColor(colors.added), "y")), "{:?}", out);
        assert!(!out.contains(&styled(SetBackgroundColor(colors.added_bg), "y")));
    }

    #[test]
    fn foreground_mode_puts_background_on_blank_changes() {
        let config = Config {
            width: 60,
            ..Config::default()
        };
        // Only an extra space differs
        let out = colored(&config, "a b\n", "a  b\n", HighlightMode::Foreground);
        let blank = styled(SetBackgroundColor(config.colors.added_bg), " ");
        assert!(out.contains(&blank), "{:?}", out);
    }

    #[test]
    fn background_mode_paints_changed_text() {
        let config = Config {
            width: 60,
            ..Config::default()
        };
        let colors = &config.colors;
        let out = colored(&config, "let x = 1;\n", "let y = 1;\n", HighlightMode::Background);
        assert!(out.contains(&styled(SetBackgroundColor(colors.removed_bg), "x")), "{:?}", out);
        assert!(out.contains(&styled(SetBackgroundColor(colors.added_bg), "y")), "{:?}", out);
        assert!(!out.contains(&styled(SetForegroundColor(colors.added), "y")));
    }

    // --- JsonWriter ---

    #[test]
    fn json_rows_are_one_object_per_line() {
        let config = Config {
            width: 40,
            ..Config::default()
        };
        let (_, rows) = render("a\nb\n", "a\nc\n", &config);
        let mut out = Vec::new();
        JsonWriter::new(&mut out).write_all_rows(&rows).unwrap();
        let out = String::from_utf8(out).unwrap();

        let values: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(values.len(), rows.len());
        assert_eq!(values[0]["kind"], "file_header");
        let change = values.iter().find(|v| v["kind"] == "change").unwrap();
        assert_eq!(change["left"]["sign"], "-");
        assert_eq!(change["right"]["sign"], "+");
        assert_eq!(change["right"]["number"], 2);
        assert_eq!(change["right"]["styles"][0]["style"], "added");
        assert_eq!(change["right"]["styles"][0]["range"]["start"], 0);
    }
}
