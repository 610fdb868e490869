use std::fmt;
use std::ops::Range;

/// A single line of one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in its file
    pub number: usize,
    /// Content as read, without the line terminator
    pub text: String,
    /// Content with tabs expanded, used for matching and display
    pub rendered: String,
}

/// Kind of an edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

impl OpTag {
    pub fn as_char(&self) -> char {
        match self {
            Self::Equal => '=',
            Self::Insert => '+',
            Self::Delete => '-',
            Self::Replace => '!',
        }
    }
}

impl fmt::Display for OpTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One step of an edit script, as half-open index ranges into both sides.
///
/// `Insert` has an empty `old` range and `Delete` an empty `new` range; the
/// empty range still sits at the position where the change happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub tag: OpTag,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

impl EditOp {
    pub fn new(tag: OpTag, old: Range<usize>, new: Range<usize>) -> Self {
        Self { tag, old, new }
    }

    pub fn is_change(&self) -> bool {
        self.tag != OpTag::Equal
    }
}

/// A group of edit operations shown together, with surrounding context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub ops: Vec<EditOp>,
    /// Old-side line indices covered, context included
    pub old: Range<usize>,
    /// New-side line indices covered, context included
    pub new: Range<usize>,
}

impl Hunk {
    /// Build a hunk from a contiguous run of ops, deriving its covered ranges
    pub fn from_ops(ops: Vec<EditOp>) -> Self {
        let old = match (ops.first(), ops.last()) {
            (Some(first), Some(last)) => first.old.start..last.old.end,
            _ => 0..0,
        };
        let new = match (ops.first(), ops.last()) {
            (Some(first), Some(last)) => first.new.start..last.new.end,
            _ => 0..0,
        };
        Self { ops, old, new }
    }
}

/// How a displayed row relates the two files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Context,
    Add,
    Delete,
    Change,
}

/// Whether a span of a changed line is shared with the other side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Common,
    Changed,
}

/// A character range `[start, end)` within a line's rendered text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self { start, end, kind }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Character-level spans for both sides of a `Change` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineHighlight {
    pub old: Vec<Span>,
    pub new: Vec<Span>,
}

/// One row of the side-by-side view, before layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRow<'a> {
    pub kind: RowKind,
    pub old: Option<&'a Line>,
    pub new: Option<&'a Line>,
    /// Set only on `Change` rows whose lines are similar enough
    pub highlight: Option<InlineHighlight>,
}

impl<'a> AlignedRow<'a> {
    pub fn context(old: &'a Line, new: &'a Line) -> Self {
        Self {
            kind: RowKind::Context,
            old: Some(old),
            new: Some(new),
            highlight: None,
        }
    }

    pub fn add(new: &'a Line) -> Self {
        Self {
            kind: RowKind::Add,
            old: None,
            new: Some(new),
            highlight: None,
        }
    }

    pub fn delete(old: &'a Line) -> Self {
        Self {
            kind: RowKind::Delete,
            old: Some(old),
            new: None,
            highlight: None,
        }
    }

    pub fn change(old: &'a Line, new: &'a Line) -> Self {
        Self {
            kind: RowKind::Change,
            old: Some(old),
            new: Some(new),
            highlight: None,
        }
    }
}

/// A hunk together with its paired rows
#[derive(Debug, Clone)]
pub struct HunkRows<'a> {
    pub hunk: Hunk,
    pub rows: Vec<AlignedRow<'a>>,
}
