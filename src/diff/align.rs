//! Generic sequence alignment
//!
//! Runs the Myers search from `similar` over any element type, comparing
//! elements with a caller-supplied predicate. Both the line matcher and the
//! inline highlighter are built on this.
//!
//! `similar` strips the common prefix and suffix before searching, so the
//! leading and trailing equal runs of the result are always as long as
//! possible. Once `ALIGN_TIMEOUT` has passed the search stops refining and the
//! unresolved middle is reported as one delete plus one insert.

use std::time::{Duration, Instant};

use similar::algorithms::{myers, Capture};
use similar::DiffTag;

use super::types::{EditOp, OpTag};

/// Time allowed for one alignment before settling for a coarser script
pub const ALIGN_TIMEOUT: Duration = Duration::from_secs(1);

/// An element that compares through the caller's predicate
struct Keyed<'a, T, F> {
    item: &'a T,
    same: &'a F,
}

impl<T, F> PartialEq for Keyed<'_, T, F>
where
    F: Fn(&T, &T) -> bool,
{
    fn eq(&self, other: &Self) -> bool {
        (self.same)(self.item, other.item)
    }
}

/// Compute an edit script from `old` to `new`.
///
/// The returned ops partition `0..old.len()` and `0..new.len()` in order.
/// Adjacent ops never share a tag. Only `Equal`, `Delete` and `Insert` runs
/// come out of the search.
pub fn edit_script<T, F>(old: &[T], new: &[T], eq: F) -> Vec<EditOp>
where
    F: Fn(&T, &T) -> bool,
{
    edit_script_until(old, new, eq, Instant::now().checked_add(ALIGN_TIMEOUT))
}

fn edit_script_until<T, F>(old: &[T], new: &[T], eq: F, deadline: Option<Instant>) -> Vec<EditOp>
where
    F: Fn(&T, &T) -> bool,
{
    let old_keys: Vec<Keyed<'_, T, F>> = old.iter().map(|item| Keyed { item, same: &eq }).collect();
    let new_keys: Vec<Keyed<'_, T, F>> = new.iter().map(|item| Keyed { item, same: &eq }).collect();

    let mut capture = Capture::new();
    if let Err(never) = myers::diff_deadline(
        &mut capture,
        &old_keys,
        0..old_keys.len(),
        &new_keys,
        0..new_keys.len(),
        deadline,
    ) {
        match never {}
    }

    if deadline.is_some_and(|limit| Instant::now() > limit) {
        log::warn!(
            "alignment of {} x {} elements ran past {:?}, script may not be minimal",
            old.len(),
            new.len(),
            ALIGN_TIMEOUT
        );
    }

    compress(capture.into_ops().iter().map(|op| op.as_tag_tuple()))
}

/// Count the elements matched by an edit script
pub fn matched_len(ops: &[EditOp]) -> usize {
    ops.iter()
        .filter(|op| op.tag == OpTag::Equal)
        .map(|op| op.old.len())
        .sum()
}

/// Join consecutive runs with the same tag and drop empty ones
fn compress<I>(runs: I) -> Vec<EditOp>
where
    I: IntoIterator<Item = (DiffTag, std::ops::Range<usize>, std::ops::Range<usize>)>,
{
    let mut ops: Vec<EditOp> = Vec::new();

    for (tag, old, new) in runs {
        if old.is_empty() && new.is_empty() {
            continue;
        }
        let tag = match tag {
            DiffTag::Equal => OpTag::Equal,
            DiffTag::Delete => OpTag::Delete,
            DiffTag::Insert => OpTag::Insert,
            DiffTag::Replace => OpTag::Replace,
        };

        match ops.last_mut() {
            Some(last) if last.tag == tag => {
                last.old.end = old.end;
                last.new.end = new.end;
            }
            _ => ops.push(EditOp::new(tag, old, new)),
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn script(a: &str, b: &str) -> Vec<EditOp> {
        edit_script(&chars(a), &chars(b), |x, y| x == y)
    }

    fn assert_partition(ops: &[EditOp], old_len: usize, new_len: usize) {
        let mut old_pos = 0;
        let mut new_pos = 0;
        for op in ops {
            assert_eq!(op.old.start, old_pos, "gap or overlap in old at {:?}", op);
            assert_eq!(op.new.start, new_pos, "gap or overlap in new at {:?}", op);
            match op.tag {
                OpTag::Insert => assert!(op.old.is_empty()),
                OpTag::Delete => assert!(op.new.is_empty()),
                OpTag::Equal => assert_eq!(op.old.len(), op.new.len()),
                OpTag::Replace => {}
            }
            old_pos = op.old.end;
            new_pos = op.new.end;
        }
        assert_eq!(old_pos, old_len);
        assert_eq!(new_pos, new_len);
    }

    // --- edit_script ---

    #[test]
    fn edit_script_identical() {
        let ops = script("abc", "abc");
        assert_eq!(ops, vec![EditOp::new(OpTag::Equal, 0..3, 0..3)]);
    }

    #[test]
    fn edit_script_both_empty() {
        assert!(script("", "").is_empty());
    }

    #[test]
    fn edit_script_one_side_empty() {
        assert_eq!(script("", "ab"), vec![EditOp::new(OpTag::Insert, 0..0, 0..2)]);
        assert_eq!(script("ab", ""), vec![EditOp::new(OpTag::Delete, 0..2, 0..0)]);
    }

    #[test]
    fn edit_script_single_substitution() {
        let ops = script("abc", "axc");
        assert_partition(&ops, 3, 3);
        assert_eq!(ops.first().map(|op| op.tag), Some(OpTag::Equal));
        assert_eq!(ops.last().map(|op| op.tag), Some(OpTag::Equal));
        assert_eq!(matched_len(&ops), 2);
    }

    #[test]
    fn edit_script_is_minimal() {
        // LCS of these is "BCBA" (length 4)
        let ops = script("ABCBDAB", "BDCABA");
        assert_partition(&ops, 7, 6);
        assert_eq!(matched_len(&ops), 4);
    }

    #[test]
    fn edit_script_prefers_long_common_prefix() {
        let ops = script("aaab", "aaaab");
        assert_eq!(ops[0], EditOp::new(OpTag::Equal, 0..3, 0..3));
        assert_partition(&ops, 4, 5);
    }

    #[test]
    fn edit_script_no_common_elements() {
        let ops = script("abc", "xyz");
        assert_partition(&ops, 3, 3);
        assert_eq!(matched_len(&ops), 0);
    }

    #[test]
    fn edit_script_is_deterministic() {
        let a = script("the quick brown fox", "the quack brawn fix");
        let b = script("the quick brown fox", "the quack brawn fix");
        assert_eq!(a, b);
    }

    #[test]
    fn edit_script_custom_equality() {
        let old = vec!["A", "b"];
        let new = vec!["a", "B"];
        let ops = edit_script(&old, &new, |x, y| x.eq_ignore_ascii_case(y));
        assert_eq!(ops, vec![EditOp::new(OpTag::Equal, 0..2, 0..2)]);
    }

    #[test]
    fn edit_script_partition_holds_for_many_inputs() {
        let samples = [
            ("", "a"),
            ("a", ""),
            ("abcabba", "cbabac"),
            ("xaxbxcx", "abc"),
            ("abc", "xaxbxcx"),
            ("aaaa", "aa"),
            ("ab", "ba"),
        ];
        for (a, b) in samples {
            let ops = script(a, b);
            assert_partition(&ops, a.chars().count(), b.chars().count());
            for pair in ops.windows(2) {
                assert_ne!(pair[0].tag, pair[1].tag);
            }
        }
    }

    // --- edit_script_until ---

    #[test]
    fn expired_deadline_still_partitions() {
        let old = chars("abcdef");
        let new = chars("abXdYf");
        let past = Instant::now().checked_sub(Duration::from_secs(1));
        let ops = edit_script_until(&old, &new, |a, b| a == b, past);
        assert_partition(&ops, 6, 6);
        // Prefix and suffix are still matched, the middle is not refined
        assert_eq!(ops.first(), Some(&EditOp::new(OpTag::Equal, 0..2, 0..2)));
        assert_eq!(ops.last(), Some(&EditOp::new(OpTag::Equal, 5..6, 5..6)));
        assert_eq!(matched_len(&ops), 3);
    }

    #[test]
    fn no_deadline_finds_minimal_script() {
        let old = chars("abcdef");
        let new = chars("abXdYf");
        let ops = edit_script_until(&old, &new, |a, b| a == b, None);
        assert_eq!(matched_len(&ops), 4);
    }

    // --- compress ---

    #[test]
    fn compress_joins_same_tag_runs() {
        let ops = compress(vec![
            (DiffTag::Equal, 0..1, 0..1),
            (DiffTag::Equal, 1..2, 1..2),
            (DiffTag::Delete, 2..2, 2..2),
            (DiffTag::Insert, 2..2, 2..3),
        ]);
        assert_eq!(
            ops,
            vec![
                EditOp::new(OpTag::Equal, 0..2, 0..2),
                EditOp::new(OpTag::Insert, 2..2, 2..3),
            ]
        );
    }
}
