use super::types::{AlignedRow, Hunk, Line, OpTag};

/// Turn a hunk's ops into side-by-side rows.
///
/// Replace blocks are paired by position: the i-th old line sits next to the
/// i-th new line, and whatever the longer side has left over becomes plain
/// delete or add rows after the pairs.
pub fn pair_rows<'a>(hunk: &Hunk, old: &'a [Line], new: &'a [Line]) -> Vec<AlignedRow<'a>> {
    let mut rows = Vec::with_capacity(hunk.old.len().max(hunk.new.len()));

    for op in &hunk.ops {
        let old_lines = &old[op.old.clone()];
        let new_lines = &new[op.new.clone()];

        match op.tag {
            OpTag::Equal => rows.extend(
                old_lines
                    .iter()
                    .zip(new_lines)
                    .map(|(o, n)| AlignedRow::context(o, n)),
            ),
            OpTag::Delete => rows.extend(old_lines.iter().map(AlignedRow::delete)),
            OpTag::Insert => rows.extend(new_lines.iter().map(AlignedRow::add)),
            OpTag::Replace => {
                let paired = old_lines.len().min(new_lines.len());
                rows.extend(
                    old_lines
                        .iter()
                        .zip(new_lines)
                        .map(|(o, n)| AlignedRow::change(o, n)),
                );
                rows.extend(old_lines[paired..].iter().map(AlignedRow::delete));
                rows.extend(new_lines[paired..].iter().map(AlignedRow::add));
            }
        }
    }

    rows
}
