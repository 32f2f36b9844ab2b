//! Subcommand implementations, one module per `armature <command>`.

use std::path::Path;

use anyhow::{Context, Result};

use armature_core::Workspace;

pub mod commit;
pub mod diff;
pub mod generate;
pub mod init;
pub mod status;

/// Resolve the `--root` argument into a workspace.
pub(crate) fn workspace_at(root: &Path) -> Result<Workspace> {
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot resolve project root '{}'", root.display()))?;
    Ok(Workspace::new(root))
}

/// Render a path relative to the workspace root for console output.
pub(crate) fn display_path(ws: &Workspace, path: &Path) -> String {
    path.strip_prefix(ws.root())
        .unwrap_or(path)
        .display()
        .to_string()
}
