//! Fitting aligned rows into two fixed-width panes
//!
//! Each side of a row is laid out as `[number][sign]text`, and the two sides
//! are joined by `SEPARATOR`. Text wider than its pane is either wrapped into
//! continuation rows or cut at the pane edge. Highlight ranges are re-based
//! onto every wrapped segment so they survive wrapping.

use std::ops::Range;

use serde::Serialize;

use crate::config::{Config, WrapMode};
use crate::error::ConfigError;
use crate::diff::tokenize::{char_width, display_width};
use crate::diff::{AlignedRow, Hunk, HunkRows, InlineHighlight, Line, RowKind, Span, SpanKind};

pub const SEPARATOR: &str = " \u{2502} ";
pub const SEPARATOR_WIDTH: usize = 3;

/// Style applied to a range of a cell's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Added,
    Removed,
}

/// A highlighted character range within a cell's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRange {
    pub range: Range<usize>,
    pub style: Highlight,
}

/// One side of a rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub number: Option<usize>,
    pub sign: char,
    pub text: String,
    pub styles: Vec<StyledRange>,
    /// Blank columns needed after `text` to fill the pane
    pub padding: usize,
}

/// Role of a rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderedKind {
    FileHeader,
    HunkHeader,
    Context,
    Add,
    Delete,
    Change,
}

impl RenderedKind {
    pub fn is_header(&self) -> bool {
        matches!(self, Self::FileHeader | Self::HunkHeader)
    }
}

impl From<RowKind> for RenderedKind {
    fn from(kind: RowKind) -> Self {
        match kind {
            RowKind::Context => Self::Context,
            RowKind::Add => Self::Add,
            RowKind::Delete => Self::Delete,
            RowKind::Change => Self::Change,
        }
    }
}

/// One physical output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub kind: RenderedKind,
    /// True for the second and later segments of a wrapped row
    pub continuation: bool,
    pub left: Cell,
    pub right: Cell,
}

/// Column budget shared by every row of one comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub pane_width: usize,
    /// Line number column widths, including the gap after the number
    pub left_number_width: usize,
    pub right_number_width: usize,
    pub signs: bool,
    pub line_numbers: bool,
    pub wrap: WrapMode,
}

/// Content of one side before wrapping
struct Side<'a> {
    number: Option<usize>,
    sign: char,
    text: &'a str,
    styles: Vec<StyledRange>,
}

impl Layout {
    /// Compute pane widths for `hunks` under `config`.
    /// Fails when the width leaves no content column for a pane.
    pub fn new(config: &Config, hunks: &[HunkRows<'_>]) -> Result<Self, ConfigError> {
        let (left_number_width, right_number_width) = if config.line_numbers {
            let max_old = hunks
                .iter()
                .flat_map(|h| h.rows.iter().filter_map(|r| r.old))
                .map(|l| l.number)
                .max()
                .unwrap_or(1);
            let max_new = hunks
                .iter()
                .flat_map(|h| h.rows.iter().filter_map(|r| r.new))
                .map(|l| l.number)
                .max()
                .unwrap_or(1);
            (digits(max_old) + 1, digits(max_new) + 1)
        } else {
            (0, 0)
        };

        let sign_width = if config.signs { 2 } else { 0 };
        let reserved = left_number_width + right_number_width + sign_width + SEPARATOR_WIDTH;
        let min = reserved + 2;
        if config.width < min {
            return Err(ConfigError::WidthTooNarrow {
                width: config.width,
                min,
            });
        }
        let pane_width = (config.width - reserved) / 2;

        log::debug!(
            "layout: width {} reserved {} pane {}",
            config.width,
            reserved,
            pane_width
        );

        Ok(Self {
            pane_width,
            left_number_width,
            right_number_width,
            signs: config.signs,
            line_numbers: config.line_numbers,
            wrap: config.wrap,
        })
    }

    /// Full width of the left side: number column, sign column and pane
    pub fn left_width(&self) -> usize {
        self.left_number_width + self.sign_width() + self.pane_width
    }

    /// Full width of the right side: number column, sign column and pane
    pub fn right_width(&self) -> usize {
        self.right_number_width + self.sign_width() + self.pane_width
    }

    fn sign_width(&self) -> usize {
        if self.signs {
            1
        } else {
            0
        }
    }

    /// Lay out a whole comparison: file header, then each hunk's header and rows
    pub fn render(
        &self,
        old_name: &str,
        new_name: &str,
        hunks: &[HunkRows<'_>],
    ) -> Vec<RenderedRow> {
        let mut out = self.render_header(
            RenderedKind::FileHeader,
            &format!("--- {}", old_name),
            &format!("+++ {}", new_name),
        );

        for hunk in hunks {
            let (old_header, new_header) = hunk_headers(&hunk.hunk);
            out.extend(self.render_header(RenderedKind::HunkHeader, &old_header, &new_header));
            for row in &hunk.rows {
                out.extend(self.render_row(row));
            }
        }

        out
    }

    /// Header text spans the number, sign and pane columns of its side
    fn render_header(&self, kind: RenderedKind, left: &str, right: &str) -> Vec<RenderedRow> {
        let left_cells = self.wrap_side(
            &Side {
                number: None,
                sign: ' ',
                text: left,
                styles: Vec::new(),
            },
            self.left_width(),
        );
        let right_cells = self.wrap_side(
            &Side {
                number: None,
                sign: ' ',
                text: right,
                styles: Vec::new(),
            },
            self.right_width(),
        );
        zip_cells(kind, left_cells, right_cells, self.left_width(), self.right_width())
    }

    /// Lay out one aligned row, producing continuation rows when it wraps
    pub fn render_row(&self, row: &AlignedRow<'_>) -> Vec<RenderedRow> {
        let (old_styles, new_styles) = row_styles(row);

        let left = row.old.map(|line| Side {
            number: self.number(line),
            sign: if self.signs && matches!(row.kind, RowKind::Delete | RowKind::Change) {
                '-'
            } else {
                ' '
            },
            text: &line.rendered,
            styles: old_styles,
        });
        let right = row.new.map(|line| Side {
            number: self.number(line),
            sign: if self.signs && matches!(row.kind, RowKind::Add | RowKind::Change) {
                '+'
            } else {
                ' '
            },
            text: &line.rendered,
            styles: new_styles,
        });

        let left_cells = left
            .map(|side| self.wrap_side(&side, self.pane_width))
            .unwrap_or_default();
        let right_cells = right
            .map(|side| self.wrap_side(&side, self.pane_width))
            .unwrap_or_default();

        zip_cells(
            row.kind.into(),
            left_cells,
            right_cells,
            self.pane_width,
            self.pane_width,
        )
    }

    fn number(&self, line: &Line) -> Option<usize> {
        if self.line_numbers {
            Some(line.number)
        } else {
            None
        }
    }

    /// Split one side into cells of at most `width` columns.
    /// In truncate mode only the first segment is kept.
    fn wrap_side(&self, side: &Side<'_>, width: usize) -> Vec<Cell> {
        let chars: Vec<char> = side.text.chars().collect();
        let mut segments = segments(&chars, width);
        if self.wrap == WrapMode::Truncate {
            segments.truncate(1);
        }

        segments
            .into_iter()
            .enumerate()
            .map(|(idx, seg)| {
                let text: String = chars[seg.clone()].iter().collect();
                let used = display_width(&text);
                Cell {
                    number: if idx == 0 { side.number } else { None },
                    sign: if idx == 0 { side.sign } else { ' ' },
                    styles: clip_styles(&side.styles, &seg),
                    text,
                    padding: width.saturating_sub(used),
                }
            })
            .collect()
    }
}

/// Pair up left and right cells, filling the shorter side with blank cells
fn zip_cells(
    kind: RenderedKind,
    left: Vec<Cell>,
    right: Vec<Cell>,
    left_width: usize,
    right_width: usize,
) -> Vec<RenderedRow> {
    let count = left.len().max(right.len());
    let mut left = left.into_iter();
    let mut right = right.into_iter();

    (0..count)
        .map(|idx| RenderedRow {
            kind,
            continuation: idx > 0,
            left: left.next().unwrap_or_else(|| blank_cell(left_width)),
            right: right.next().unwrap_or_else(|| blank_cell(right_width)),
        })
        .collect()
}

fn blank_cell(width: usize) -> Cell {
    Cell {
        number: None,
        sign: ' ',
        text: String::new(),
        styles: Vec::new(),
        padding: width,
    }
}

/// Char ranges of consecutive segments no wider than `width` columns.
/// Always returns at least one (possibly empty) segment.
pub fn segments(chars: &[char], width: usize) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut used = 0;

    for (idx, &c) in chars.iter().enumerate() {
        let w = char_width(c);
        // A character wider than the pane still gets a segment of its own
        if used + w > width && idx > start {
            out.push(start..idx);
            start = idx;
            used = 0;
        }
        used += w;
    }

    out.push(start..chars.len());
    out
}

/// Intersect styles with a segment and re-base them onto the segment start
fn clip_styles(styles: &[StyledRange], seg: &Range<usize>) -> Vec<StyledRange> {
    styles
        .iter()
        .filter_map(|s| {
            let start = s.range.start.max(seg.start);
            let end = s.range.end.min(seg.end);
            (start < end).then(|| StyledRange {
                range: start - seg.start..end - seg.start,
                style: s.style,
            })
        })
        .collect()
}

/// Highlight ranges for the old and new side of a row
fn row_styles(row: &AlignedRow<'_>) -> (Vec<StyledRange>, Vec<StyledRange>) {
    let whole = |line: Option<&Line>, style: Highlight| -> Vec<StyledRange> {
        line.map(|l| l.rendered.chars().count())
            .filter(|&len| len > 0)
            .map(|len| vec![StyledRange { range: 0..len, style }])
            .unwrap_or_default()
    };

    match row.kind {
        RowKind::Context => (Vec::new(), Vec::new()),
        RowKind::Delete => (whole(row.old, Highlight::Removed), Vec::new()),
        RowKind::Add => (Vec::new(), whole(row.new, Highlight::Added)),
        RowKind::Change => match &row.highlight {
            Some(InlineHighlight { old, new }) => (
                changed_ranges(old, Highlight::Removed),
                changed_ranges(new, Highlight::Added),
            ),
            None => (
                whole(row.old, Highlight::Removed),
                whole(row.new, Highlight::Added),
            ),
        },
    }
}

fn changed_ranges(spans: &[Span], style: Highlight) -> Vec<StyledRange> {
    spans
        .iter()
        .filter(|s| s.kind == SpanKind::Changed)
        .map(|s| StyledRange {
            range: s.start..s.end,
            style,
        })
        .collect()
}

/// `@@ -start,count @@` and `@@ +start,count @@` for a hunk
pub fn hunk_headers(hunk: &Hunk) -> (String, String) {
    let (old_start, old_count) = header_range(&hunk.old);
    let (new_start, new_count) = header_range(&hunk.new);
    (
        format!("@@ -{},{} @@", old_start, old_count),
        format!("@@ +{},{} @@", new_start, new_count),
    )
}

/// 1-based start and length; an empty range names the line before it
fn header_range(range: &Range<usize>) -> (usize, usize) {
    if range.is_empty() {
        (range.start, 0)
    } else {
        (range.start + 1, range.len())
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
