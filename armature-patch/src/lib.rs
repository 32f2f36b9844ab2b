//! Line-level diff and patch engine.
//!
//! Computes hunks between two text revisions ([`compute_hunks`]), replays them
//! onto identical bases ([`apply_exact`]) or drifted ones ([`apply_fuzzy`]),
//! and reads the ancestral whole-file line-diff format ([`parse_line_diff`]).
//! Content is treated as opaque lines; nothing here knows what language the
//! text is written in.

pub mod apply;
pub mod diff;
pub mod error;
pub mod hunk;
pub mod legacy;

pub use apply::{apply_exact, apply_fuzzy};
pub use diff::compute_hunks;
pub use error::PatchError;
pub use hunk::{render_unified, split_lines, Hunk, Patch, PatchFormat, CONTEXT_LINES};
pub use legacy::parse_line_diff;
