//! The hunk model and its wire form.
//!
//! Hunks serialize with camelCase field names; the same shape is embedded in
//! both the baseline registry (cached snapshots) and commit records.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PatchError;
use crate::legacy::parse_line_diff;

/// Unchanged lines captured on each side of a hunk's old range.
pub const CONTEXT_LINES: usize = 3;

/// One contiguous line-level edit: `old_lines` lines at `old_start` in the
/// old text are replaced by `new_lines` lines at `new_start` in the new text.
///
/// Positions are 0-based line indexes. `old_content.len() == old_lines` and
/// `new_content.len() == new_lines` always hold for hunks this crate
/// produces; deserialized hunks are re-checked by the appliers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunk {
    pub old_start: usize,
    pub old_lines: usize,
    pub new_start: usize,
    pub new_lines: usize,
    pub old_content: Vec<String>,
    pub new_content: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ctx_before_old: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ctx_after_old: Vec<String>,
}

impl Hunk {
    /// Whether the declared counts match the content they describe.
    pub fn is_consistent(&self) -> bool {
        self.old_content.len() == self.old_lines && self.new_content.len() == self.new_lines
    }

    /// A pure insertion removes nothing from the old text.
    pub fn is_insertion(&self) -> bool {
        self.old_lines == 0
    }
}

/// Identifier of the hunk-list patch representation in persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PatchFormat {
    #[default]
    #[serde(rename = "hunks-v1")]
    HunksV1,
}

impl fmt::Display for PatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchFormat::HunksV1 => write!(f, "hunks-v1"),
        }
    }
}

/// A recorded edit set in either representation.
///
/// New records always carry `Hunks`; `LineDiff` is the ancestral whole-file
/// format still found in old commit files, resolved into hunks at read time
/// so one applier serves both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    Hunks(Vec<Hunk>),
    LineDiff(String),
}

impl Patch {
    /// Resolve to hunks, parsing the legacy representation if needed.
    pub fn hunks(&self) -> Result<Cow<'_, [Hunk]>, PatchError> {
        match self {
            Patch::Hunks(hunks) => Ok(Cow::Borrowed(hunks)),
            Patch::LineDiff(text) => parse_line_diff(text).map(Cow::Owned),
        }
    }
}

/// Split text into lines for diffing and splicing.
///
/// Uses `split('\n')`, so the empty string is one empty line and a trailing
/// newline yields a final empty line; `join("\n")` is the exact inverse.
/// This keeps trailing-newline edits visible to the diff instead of being
/// silently dropped the way `str::lines` would.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Render hunks in unified style for console preview.
///
/// Context comes from the hunks' captured `ctx_before_old`/`ctx_after_old`,
/// so the output shows at most [`CONTEXT_LINES`] lines around each change.
pub fn render_unified(rel_path: &str, hunks: &[Hunk]) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- a/{rel_path}\n+++ b/{rel_path}\n"));
    for hunk in hunks {
        let ctx = hunk.ctx_before_old.len();
        let old_count = ctx + hunk.old_lines + hunk.ctx_after_old.len();
        let new_count = ctx + hunk.new_lines + hunk.ctx_after_old.len();
        let old_begin = hunk.old_start.saturating_sub(ctx);
        let new_begin = hunk.new_start.saturating_sub(ctx);
        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            display_start(old_begin, old_count),
            old_count,
            display_start(new_begin, new_count),
            new_count,
        ));
        for line in &hunk.ctx_before_old {
            out.push(' ');
            out.push_str(line);
            out.push('\n');
        }
        for line in &hunk.old_content {
            out.push('-');
            out.push_str(line);
            out.push('\n');
        }
        for line in &hunk.new_content {
            out.push('+');
            out.push_str(line);
            out.push('\n');
        }
        for line in &hunk.ctx_after_old {
            out.push(' ');
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

// Unified convention: a zero-length range is addressed by the line before it.
fn display_start(begin: usize, count: usize) -> usize {
    if count == 0 {
        begin
    } else {
        begin + 1
    }
}
