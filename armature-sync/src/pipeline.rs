//! Generation and commit entrypoints shared by the CLI commands.
//!
//! Files are processed strictly one at a time in sorted path order, so at
//! most one confirmation prompt is pending at any moment and console output
//! stays ordered. The registry is loaded once, mutated in memory, and
//! persisted once at the end of the pass.

use chrono::Utc;

use armature_core::{blueprint, Workspace};
use armature_patch::{compute_hunks, PatchFormat};
use armature_render::Renderer;

use crate::baseline::{self, hash_content, normalize_line_endings, CachedPatch};
use crate::commits::{self, CommitFileEntry, CommitRecord};
use crate::confirm::ConfirmPrompt;
use crate::error::{io_err, SyncError};
use crate::writer::{write_artifact, WriteOptions, WriteOutcome};

/// Outcome summary of one generate pass.
#[derive(Debug)]
pub struct GenerateReport {
    pub app: String,
    pub outcomes: Vec<(String, WriteOutcome)>,
}

impl GenerateReport {
    pub fn count(&self, pred: impl Fn(&WriteOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Render every artifact the blueprint declares and reconcile each against
/// the working tree.
pub fn generate(
    ws: &Workspace,
    opts: WriteOptions,
    confirm: &mut dyn ConfirmPrompt,
) -> Result<GenerateReport, SyncError> {
    let bp = blueprint::load_at(ws)?;
    let renderer = Renderer::new()?;
    let mut artifacts = renderer.render_all(&bp)?;
    artifacts.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

    let mut registry = baseline::load(ws)?;
    let history = commits::load_history(ws)?;

    let mut outcomes = Vec::new();
    for artifact in &artifacts {
        let outcome = write_artifact(
            ws,
            &artifact.rel_path,
            &artifact.content,
            &mut registry,
            &history,
            opts,
            confirm,
        )?;
        outcomes.push((artifact.rel_path.clone(), outcome));
    }

    if !opts.dry_run {
        baseline::save(ws, &registry)?;
    }

    Ok(GenerateReport {
        app: bp.app.name.clone(),
        outcomes,
    })
}

/// Outcome of a commit pass.
#[derive(Debug)]
pub struct CommitOutcome {
    /// The record written, or `None` when nothing had drifted.
    pub record: Option<CommitRecord>,
    /// Relative paths captured in the record.
    pub committed: Vec<String>,
}

/// Capture the current drift of every user-modified managed file as one
/// immutable commit record.
///
/// For paths the registry already tracks, the cached snapshot is refreshed
/// to the just-captured hunks so the next generate pass can merge without
/// scanning history.
pub fn commit_drift(ws: &Workspace) -> Result<CommitOutcome, SyncError> {
    let bp = blueprint::load_at(ws)?;
    let renderer = Renderer::new()?;
    let mut artifacts = renderer.render_all(&bp)?;
    artifacts.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

    let mut registry = baseline::load(ws)?;

    let mut files = Vec::new();
    let mut committed = Vec::new();
    let mut registry_touched = false;
    for artifact in &artifacts {
        let rel_path = &artifact.rel_path;
        let path = ws.artifact_path(rel_path);
        if !path.exists() {
            continue;
        }
        let candidate = normalize_line_endings(&artifact.content);
        let disk_raw = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let disk = normalize_line_endings(&disk_raw);
        let disk_hash = hash_content(&disk);

        let user_modified = registry
            .get(rel_path)
            .map_or(true, |entry| entry.hash != disk_hash);
        if !user_modified {
            continue;
        }

        let hunks = compute_hunks(&candidate, &disk);
        if hunks.is_empty() {
            // Content matches the candidate; hash-only noise, nothing to
            // capture.
            continue;
        }

        let base_hash = hash_content(&candidate);
        tracing::debug!("capturing {} hunk(s) for {rel_path}", hunks.len());
        files.push(CommitFileEntry::hunks_v1(
            rel_path.clone(),
            base_hash.clone(),
            disk_hash.clone(),
            hunks.clone(),
        ));
        committed.push(rel_path.clone());

        if let Some(entry) = registry.entries.get_mut(rel_path) {
            entry.snapshot = Some(CachedPatch {
                diff_format: PatchFormat::HunksV1,
                diff_base_hash: base_hash,
                diff_hunks: hunks,
                diff_result_hash: disk_hash,
                diff_updated_at: Utc::now(),
            });
            registry_touched = true;
        }
    }

    if files.is_empty() {
        return Ok(CommitOutcome {
            record: None,
            committed,
        });
    }

    let record = commits::record(ws, files)?;
    if registry_touched {
        baseline::save(ws, &registry)?;
    }
    Ok(CommitOutcome {
        record: Some(record),
        committed,
    })
}
