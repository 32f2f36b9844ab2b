//! Parser for the ancestral whole-file line-diff format.
//!
//! Old commit records carry a single string in which every line of the old
//! file appears prefixed with ` ` (kept) or `-` (removed) and new lines
//! appear prefixed with `+`. Parsing turns that into the same hunks the diff
//! engine produces, so one applier serves both representations.

use crate::error::PatchError;
use crate::hunk::{Hunk, CONTEXT_LINES};

/// Parse a legacy whole-file line diff into hunks.
///
/// Runs of `-`/`+` lines between kept lines become one hunk each, removed
/// lines first. Context is captured from the kept lines, same cap as the
/// diff engine. A trailing newline on the diff text itself is tolerated;
/// any other unprefixed line is malformed.
pub fn parse_line_diff(text: &str) -> Result<Vec<Hunk>, PatchError> {
    let mut rows: Vec<&str> = text.split('\n').collect();
    if rows.last() == Some(&"") {
        rows.pop();
    }

    let mut old_buf: Vec<String> = Vec::new();
    let mut runs: Vec<Run> = Vec::new();
    let mut pending: Option<Run> = None;
    let mut new_index = 0usize;

    for (row, raw) in rows.iter().enumerate() {
        let rest = raw.get(1..).unwrap_or("");
        match raw.chars().next() {
            Some(' ') => {
                if let Some(run) = pending.take() {
                    runs.push(run);
                }
                old_buf.push(rest.to_string());
                new_index += 1;
            }
            Some('-') => {
                let run = pending.get_or_insert_with(|| Run::at(old_buf.len(), new_index));
                run.removed.push(rest.to_string());
                old_buf.push(rest.to_string());
            }
            Some('+') => {
                let run = pending.get_or_insert_with(|| Run::at(old_buf.len(), new_index));
                run.added.push(rest.to_string());
                new_index += 1;
            }
            _ => {
                return Err(PatchError::MalformedLineDiff {
                    line: row + 1,
                    found: raw.to_string(),
                })
            }
        }
    }
    if let Some(run) = pending.take() {
        runs.push(run);
    }

    Ok(runs.into_iter().map(|run| run.into_hunk(&old_buf)).collect())
}

struct Run {
    old_start: usize,
    new_start: usize,
    removed: Vec<String>,
    added: Vec<String>,
}

impl Run {
    fn at(old_start: usize, new_start: usize) -> Self {
        Self {
            old_start,
            new_start,
            removed: Vec::new(),
            added: Vec::new(),
        }
    }

    fn into_hunk(self, old_lines: &[String]) -> Hunk {
        let old_end = self.old_start + self.removed.len();
        let ctx_lo = self.old_start.saturating_sub(CONTEXT_LINES);
        let ctx_hi = (old_end + CONTEXT_LINES).min(old_lines.len());
        Hunk {
            old_start: self.old_start,
            old_lines: self.removed.len(),
            new_start: self.new_start,
            new_lines: self.added.len(),
            ctx_before_old: old_lines[ctx_lo..self.old_start].to_vec(),
            ctx_after_old: old_lines[old_end..ctx_hi].to_vec(),
            old_content: self.removed,
            new_content: self.added,
        }
    }
}
