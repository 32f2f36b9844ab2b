//! Diff preview for `armature diff`.
//!
//! Shows, per managed path, what a generate pass would leave on disk. For a
//! user-modified file the expected content is the candidate with recorded
//! edits replayed (the same merge the writer performs), so a committed edit
//! produces no diff noise — only genuine incoming changes show up.

use std::io::ErrorKind;
use std::path::Path;

use armature_core::{blueprint, Workspace};
use armature_patch::{compute_hunks, render_unified};
use armature_render::Renderer;

use crate::baseline::{self, hash_content, normalize_line_endings};
use crate::commits;
use crate::error::{io_err, SyncError};
use crate::writer::merge_candidate;

/// Rendered diff for a single managed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub rel_path: String,
    pub unified_diff: String,
}

/// Compare every managed path's disk content against what a generate pass
/// would produce. No files are written.
pub fn diff_project(ws: &Workspace) -> Result<Vec<FileDiff>, SyncError> {
    let bp = blueprint::load_at(ws)?;
    let renderer = Renderer::new()?;
    let mut artifacts = renderer.render_all(&bp)?;
    artifacts.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

    let registry = baseline::load(ws)?;
    let history = commits::load_history(ws)?;

    let mut diffs = Vec::new();
    for artifact in &artifacts {
        let rel_path = &artifact.rel_path;
        let candidate = normalize_line_endings(&artifact.content);
        let path = ws.artifact_path(rel_path);

        let disk = read_existing_or_empty(&path)?;
        let expected = if !path.exists() {
            // A missing target gets the candidate verbatim.
            candidate.clone()
        } else {
            let disk_hash = hash_content(&disk);
            let new_hash = hash_content(&candidate);
            let entry = registry.get(rel_path);
            let user_modified = entry.map_or(true, |e| e.hash != disk_hash);
            if disk_hash != new_hash && user_modified {
                // Reconstruct the post-merge content; an unmergeable
                // conflict falls back to the candidate (what a confirmed
                // overwrite would write).
                merge_candidate(&candidate, &new_hash, rel_path, entry, &history)
                    .unwrap_or_else(|| candidate.clone())
            } else {
                candidate.clone()
            }
        };

        if disk == expected {
            continue;
        }
        let hunks = compute_hunks(&disk, &expected);
        diffs.push(FileDiff {
            rel_path: rel_path.clone(),
            unified_diff: render_unified(rel_path, &hunks),
        });
    }

    Ok(diffs)
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}
