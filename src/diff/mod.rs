//! Side-by-side alignment pipeline
//!
//! tokenize → match lines → build hunks → pair rows → inline highlight.
//! Every stage is a pure function of its input.

pub mod align;
pub mod hunks;
pub mod inline;
pub mod matcher;
pub mod pair;
pub mod tokenize;
pub mod types;

pub use types::*;

/// Align two tokenized files into hunks of side-by-side rows
pub fn align_documents<'a>(
    old: &'a [Line],
    new: &'a [Line],
    context: usize,
    similarity_threshold: f64,
) -> Vec<HunkRows<'a>> {
    let ops = matcher::match_lines(old, new);
    hunks::build_hunks(&ops, context)
        .into_iter()
        .map(|hunk| {
            let mut rows = pair::pair_rows(&hunk, old, new);
            inline::highlight_rows(&mut rows, similarity_threshold);
            HunkRows { hunk, rows }
        })
        .collect()
}
