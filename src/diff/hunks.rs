use super::types::{EditOp, Hunk, OpTag};

/// Group an edit script into hunks with `context` lines around each change.
///
/// Changes whose context windows overlap or touch end up in the same hunk,
/// with the equal run between them kept as context. `usize::MAX` keeps every
/// equal line, which collapses a changed file into one hunk.
pub fn build_hunks(ops: &[EditOp], context: usize) -> Vec<Hunk> {
    if !ops.iter().any(EditOp::is_change) {
        return Vec::new();
    }

    let mut hunks = Vec::new();
    let mut current: Vec<EditOp> = Vec::new();
    let last = ops.len() - 1;

    for (idx, op) in ops.iter().enumerate() {
        if op.is_change() {
            current.push(op.clone());
            continue;
        }

        let len = op.old.len();
        if current.is_empty() {
            // Leading context of a new hunk
            push_nonempty(&mut current, tail(op, len.min(context)));
        } else if idx == last {
            push_nonempty(&mut current, head(op, len.min(context)));
        } else if len > context.saturating_mul(2) {
            push_nonempty(&mut current, head(op, context));
            hunks.push(Hunk::from_ops(std::mem::take(&mut current)));
            push_nonempty(&mut current, tail(op, context));
        } else {
            current.push(op.clone());
        }
    }

    if current.iter().any(EditOp::is_change) {
        hunks.push(Hunk::from_ops(current));
    }

    log::debug!("built {} hunks with {} context lines", hunks.len(), context);
    hunks
}

fn push_nonempty(ops: &mut Vec<EditOp>, op: EditOp) {
    if !op.old.is_empty() || !op.new.is_empty() {
        ops.push(op);
    }
}

/// First `n` lines of an equal op
fn head(op: &EditOp, n: usize) -> EditOp {
    EditOp::new(
        OpTag::Equal,
        op.old.start..op.old.start + n,
        op.new.start..op.new.start + n,
    )
}

/// Last `n` lines of an equal op
fn tail(op: &EditOp, n: usize) -> EditOp {
    EditOp::new(
        OpTag::Equal,
        op.old.end - n..op.old.end,
        op.new.end - n..op.new.end,
    )
}
