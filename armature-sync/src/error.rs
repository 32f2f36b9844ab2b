//! Error types for armature-sync.

use std::path::PathBuf;

use thiserror::Error;

use armature_core::error::BlueprintError;
use armature_patch::PatchError;
use armature_render::RenderError;

/// All errors that can arise from reconciliation operations.
///
/// Only real failures live here. Conflicts, drift, corrupt state files, and
/// unchanged content are normal outcomes reported through return values, not
/// errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error loading or validating the blueprint.
    #[error("blueprint error: {0}")]
    Blueprint(#[from] BlueprintError),

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A patch that could not be applied for structural reasons.
    #[error("patch error: {0}")]
    Patch(#[from] PatchError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (registry or commit records).
    #[error("state JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
