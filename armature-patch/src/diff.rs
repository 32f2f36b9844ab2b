//! Hunk computation between two text revisions.

use similar::{Algorithm, DiffTag, TextDiff};

use crate::hunk::{split_lines, Hunk, CONTEXT_LINES};

/// Compute the line-level hunks that turn `old` into `new`.
///
/// Lines compare by exact equality under an LCS alignment. Contiguous runs
/// of deletions and insertions between matched lines collapse into one hunk,
/// deleted lines first; up to [`CONTEXT_LINES`] unchanged lines around each
/// old range are captured as anchors for later fuzzy replay.
///
/// Guarantees: hunks are disjoint and ordered ascending by `old_start` (and
/// `new_start`); equal inputs yield an empty vec; `apply_exact(old, &hunks)`
/// reconstructs `new` byte for byte. Output is deterministic for a given
/// input pair.
pub fn compute_hunks(old: &str, new: &str) -> Vec<Hunk> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Lcs)
        .diff_slices(&old_lines, &new_lines);

    let mut hunks: Vec<Hunk> = Vec::new();
    let mut pending: Option<Run> = None;

    for op in diff.ops() {
        let old_range = op.old_range();
        let new_range = op.new_range();
        if op.tag() == DiffTag::Equal {
            if let Some(run) = pending.take() {
                hunks.push(run.into_hunk(&old_lines));
            }
            continue;
        }
        let removed = old_lines[old_range.clone()].iter().map(|s| s.to_string());
        let added = new_lines[new_range.clone()].iter().map(|s| s.to_string());
        match pending.as_mut() {
            // The backend can emit adjacent delete/insert ops; they belong to
            // the same hunk when their ranges touch.
            Some(run) if run.old_end == old_range.start && run.new_end == new_range.start => {
                run.removed.extend(removed);
                run.added.extend(added);
                run.old_end = old_range.end;
                run.new_end = new_range.end;
            }
            _ => {
                if let Some(run) = pending.take() {
                    hunks.push(run.into_hunk(&old_lines));
                }
                pending = Some(Run {
                    old_start: old_range.start,
                    old_end: old_range.end,
                    new_start: new_range.start,
                    new_end: new_range.end,
                    removed: removed.collect(),
                    added: added.collect(),
                });
            }
        }
    }
    if let Some(run) = pending.take() {
        hunks.push(run.into_hunk(&old_lines));
    }
    hunks
}

struct Run {
    old_start: usize,
    old_end: usize,
    new_start: usize,
    new_end: usize,
    removed: Vec<String>,
    added: Vec<String>,
}

impl Run {
    fn into_hunk(self, old_lines: &[&str]) -> Hunk {
        let ctx_lo = self.old_start.saturating_sub(CONTEXT_LINES);
        let ctx_hi = (self.old_end + CONTEXT_LINES).min(old_lines.len());
        Hunk {
            old_start: self.old_start,
            old_lines: self.removed.len(),
            new_start: self.new_start,
            new_lines: self.added.len(),
            ctx_before_old: to_owned(&old_lines[ctx_lo..self.old_start]),
            ctx_after_old: to_owned(&old_lines[self.old_end..ctx_hi]),
            old_content: self.removed,
            new_content: self.added,
        }
    }
}

fn to_owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}
