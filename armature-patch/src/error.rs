//! Error types for armature-patch.

use thiserror::Error;

/// All errors that can arise from computing, parsing, or applying patches.
///
/// Apply failures are normal outcomes for callers reconciling drifted files,
/// not fatal conditions; they carry the index of the offending hunk so the
/// caller can log which edit was lost.
#[derive(Debug, Error)]
pub enum PatchError {
    /// An exact splice fell outside the base text.
    #[error("hunk {index} splices lines {start}..{end} but the text has {len} lines")]
    RangeOutOfBounds {
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    /// A fuzzy rebase found no placement for the hunk's old block.
    #[error("hunk {index} could not be located in the target text")]
    Unplaced { index: usize },

    /// A hunk's declared line counts do not match its content.
    #[error("hunk {index} declares line counts that do not match its content")]
    Inconsistent { index: usize },

    /// A legacy line-diff contained a line without a ` `/`-`/`+` prefix.
    #[error("malformed line diff at line {line}: {found:?}")]
    MalformedLineDiff { line: usize, found: String },
}
