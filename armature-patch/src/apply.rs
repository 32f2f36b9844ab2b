//! Replaying hunks onto exact and drifted bases.

use crate::error::PatchError;
use crate::hunk::{split_lines, Hunk};

/// How far before a trailing-context anchor the old block may sit when the
/// leading strategies fail.
const DRIFT_WINDOW: usize = 3;

/// Splice `hunks` into `base` assuming `base` is line-identical to the text
/// the hunks were computed against.
///
/// Callers hash-verify that assumption; this function only bounds-checks.
/// Positions shift by a running offset as earlier hunks grow or shrink the
/// text. Any out-of-range splice fails the whole operation.
pub fn apply_exact(base: &str, hunks: &[Hunk]) -> Result<String, PatchError> {
    check_consistency(hunks)?;
    let mut lines = split_lines(base);
    let mut offset: isize = 0;
    for (index, hunk) in hunks.iter().enumerate() {
        let start = hunk.old_start as isize + offset;
        let out_of_bounds = PatchError::RangeOutOfBounds {
            index,
            start: hunk.old_start,
            end: hunk.old_start + hunk.old_lines,
            len: lines.len(),
        };
        if start < 0 {
            return Err(out_of_bounds);
        }
        let start = start as usize;
        let end = start + hunk.old_lines;
        if start > lines.len() || end > lines.len() {
            return Err(out_of_bounds);
        }
        lines.splice(start..end, hunk.new_content.iter().map(String::as_str));
        offset += hunk.new_lines as isize - hunk.old_lines as isize;
    }
    Ok(lines.join("\n"))
}

/// Rebase `hunks` onto a `base` that drifted from the text they were
/// computed against.
///
/// A forward-only cursor walks the base. Each hunk with an old block is
/// placed by, in order: a literal occurrence of the block at or after the
/// cursor; an occurrence of its leading context with the block immediately
/// after; an occurrence of its trailing context with the block in a short
/// window before it. Pure insertions anchor after their leading context,
/// else before their trailing context, else at their recorded `new_start`
/// clamped into the remaining text. After each placement the cursor advances
/// past the inserted lines, so later hunks never match earlier text. An
/// unplaceable old block fails the whole operation.
///
/// Known limitation: the first match at or after the cursor wins, so
/// repetitive content can anchor a hunk at the wrong occurrence.
pub fn apply_fuzzy(base: &str, hunks: &[Hunk]) -> Result<String, PatchError> {
    check_consistency(hunks)?;
    let mut lines = split_lines(base);
    let mut cursor = 0usize;
    for (index, hunk) in hunks.iter().enumerate() {
        let at = if hunk.is_insertion() {
            insertion_point(&lines, hunk, cursor)
        } else {
            locate_block(&lines, hunk, cursor).ok_or(PatchError::Unplaced { index })?
        };
        lines.splice(at..at + hunk.old_lines, hunk.new_content.iter().map(String::as_str));
        cursor = at + hunk.new_lines;
    }
    Ok(lines.join("\n"))
}

fn check_consistency(hunks: &[Hunk]) -> Result<(), PatchError> {
    match hunks.iter().position(|h| !h.is_consistent()) {
        Some(index) => Err(PatchError::Inconsistent { index }),
        None => Ok(()),
    }
}

fn locate_block(lines: &[&str], hunk: &Hunk, cursor: usize) -> Option<usize> {
    if let Some(at) = find_block(lines, &hunk.old_content, cursor) {
        return Some(at);
    }

    if !hunk.ctx_before_old.is_empty() {
        let mut from = cursor;
        while let Some(ctx_at) = find_block(lines, &hunk.ctx_before_old, from) {
            let candidate = ctx_at + hunk.ctx_before_old.len();
            if block_at(lines, &hunk.old_content, candidate) {
                return Some(candidate);
            }
            from = ctx_at + 1;
        }
    }

    if !hunk.ctx_after_old.is_empty() {
        let mut from = cursor;
        while let Some(ctx_at) = find_block(lines, &hunk.ctx_after_old, from) {
            if let Some(adjacent) = ctx_at.checked_sub(hunk.old_lines) {
                let lo = adjacent.saturating_sub(DRIFT_WINDOW).max(cursor);
                // Nearest-first: right against the context, then further out.
                for candidate in (lo..=adjacent).rev() {
                    if block_at(lines, &hunk.old_content, candidate) {
                        return Some(candidate);
                    }
                }
            }
            from = ctx_at + 1;
        }
    }

    None
}

fn insertion_point(lines: &[&str], hunk: &Hunk, cursor: usize) -> usize {
    if !hunk.ctx_before_old.is_empty() {
        if let Some(ctx_at) = find_block(lines, &hunk.ctx_before_old, cursor) {
            return ctx_at + hunk.ctx_before_old.len();
        }
    }
    if !hunk.ctx_after_old.is_empty() {
        if let Some(ctx_at) = find_block(lines, &hunk.ctx_after_old, cursor) {
            return ctx_at;
        }
    }
    hunk.new_start.max(cursor).min(lines.len())
}

/// First occurrence of `block` at or after `from`, scanning forward.
fn find_block(lines: &[&str], block: &[String], from: usize) -> Option<usize> {
    if block.is_empty() {
        return None;
    }
    let last_start = lines.len().checked_sub(block.len())?;
    (from..=last_start).find(|&at| block_at(lines, block, at))
}

fn block_at(lines: &[&str], block: &[String], at: usize) -> bool {
    at + block.len() <= lines.len()
        && lines[at..at + block.len()]
            .iter()
            .zip(block)
            .all(|(line, want)| *line == want.as_str())
}
