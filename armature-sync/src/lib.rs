//! Reconciliation layer between rendered artifacts and the working tree.
//!
//! The crate tracks what the generator produced for each managed path in a
//! baseline registry, captures user edits as hunk commits, and on every
//! regeneration replays those edits onto new candidate content so manual
//! work survives blueprint changes.
//!
//! ## protocol
//! - `generate` renders the blueprint and reconciles every artifact through
//!   the write decision ladder in [`writer`]
//! - `commit_drift` captures user-modified files into an append-only commit
//!   record under `.armature/commits/`
//! - `diff_project` previews the drift between disk and the expected state
//! - `drift::check` classifies the project without touching any file

pub mod baseline;
pub mod commits;
pub mod confirm;
pub mod diff;
pub mod drift;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use confirm::{AlwaysConfirm, ConfirmPrompt, NeverConfirm};
pub use diff::{diff_project, FileDiff};
pub use drift::DriftSignal;
pub use error::SyncError;
pub use pipeline::{commit_drift, generate, CommitOutcome, GenerateReport};
pub use writer::{WriteOptions, WriteOutcome};
