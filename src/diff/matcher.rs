use super::align::edit_script;
use super::types::{EditOp, Line, OpTag};

/// Compute the line-level edit script between two files.
///
/// Lines match when their tab-expanded content is identical. Any run of
/// deletions and insertions with no equal line between them becomes a
/// single `Replace`.
pub fn match_lines(old: &[Line], new: &[Line]) -> Vec<EditOp> {
    let raw = edit_script(old, new, |a, b| a.rendered == b.rendered);
    let ops = merge_replacements(raw);
    log::debug!(
        "matched {} old / {} new lines into {} ops",
        old.len(),
        new.len(),
        ops.len()
    );
    log::trace!("ops: {}", ops.iter().map(|op| op.tag.to_string()).collect::<String>());
    ops
}

/// Fold every maximal run of non-equal ops into one op
fn merge_replacements(ops: Vec<EditOp>) -> Vec<EditOp> {
    let mut merged: Vec<EditOp> = Vec::with_capacity(ops.len());

    for op in ops {
        match merged.last_mut() {
            Some(last) if last.is_change() && op.is_change() => {
                last.old.end = op.old.end;
                last.new.end = op.new.end;
                last.tag = if last.old.is_empty() {
                    OpTag::Insert
                } else if last.new.is_empty() {
                    OpTag::Delete
                } else {
                    OpTag::Replace
                };
            }
            _ => merged.push(op),
        }
    }

    merged
}
