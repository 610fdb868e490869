//! Intra-line change highlighting
//!
//! Paired lines of a replace block are compared character by character.
//! Highlighting is only kept when the two lines are similar enough; otherwise
//! the row is shown as a plain change.

use super::align::{edit_script, matched_len};
use super::types::{AlignedRow, InlineHighlight, OpTag, RowKind, Span, SpanKind};

/// Dice coefficient of two sequences: `2 * matched / (old_len + new_len)`
pub fn similarity(matched: usize, old_len: usize, new_len: usize) -> f64 {
    let total = old_len + new_len;
    if total == 0 {
        return 1.0;
    }
    (2 * matched) as f64 / total as f64
}

/// Compute common/changed spans for a pair of lines, or `None` when their
/// similarity is below `threshold`
pub fn inline_spans(old: &str, new: &str, threshold: f64) -> Option<InlineHighlight> {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();
    let ops = edit_script(&old_chars, &new_chars, |a, b| a == b);

    let ratio = similarity(matched_len(&ops), old_chars.len(), new_chars.len());
    if ratio < threshold {
        return None;
    }

    let mut old_spans = Vec::new();
    let mut new_spans = Vec::new();
    for op in &ops {
        match op.tag {
            OpTag::Equal => {
                push_span(&mut old_spans, Span::new(op.old.start, op.old.end, SpanKind::Common));
                push_span(&mut new_spans, Span::new(op.new.start, op.new.end, SpanKind::Common));
            }
            OpTag::Delete => {
                push_span(&mut old_spans, Span::new(op.old.start, op.old.end, SpanKind::Changed));
            }
            OpTag::Insert => {
                push_span(&mut new_spans, Span::new(op.new.start, op.new.end, SpanKind::Changed));
            }
            OpTag::Replace => {
                push_span(&mut old_spans, Span::new(op.old.start, op.old.end, SpanKind::Changed));
                push_span(&mut new_spans, Span::new(op.new.start, op.new.end, SpanKind::Changed));
            }
        }
    }

    Some(InlineHighlight {
        old: old_spans,
        new: new_spans,
    })
}

/// Append a span, extending the previous one when the kinds match
fn push_span(spans: &mut Vec<Span>, span: Span) {
    if span.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.kind == span.kind && last.end == span.start => last.end = span.end,
        _ => spans.push(span),
    }
}

/// Attach inline highlights to every `Change` row that passes the similarity gate
pub fn highlight_rows(rows: &mut [AlignedRow<'_>], threshold: f64) {
    for row in rows.iter_mut().filter(|r| r.kind == RowKind::Change) {
        if let (Some(old), Some(new)) = (row.old, row.new) {
            row.highlight = inline_spans(&old.rendered, &new.rendered, threshold);
        }
    }
}
