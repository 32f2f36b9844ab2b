//! Reconciliation writer — write, merge, skip, or prompt per artifact.
//!
//! ## Decision ladder (per file)
//!
//! 1. Target missing → plain write, register baseline.
//! 2. Disk hash == candidate hash → `Unchanged`.
//! 3. Registry hash == disk hash → file untouched since we wrote it → plain
//!    overwrite with the new candidate.
//! 4. Otherwise the user modified the file:
//!    a. replay the cached snapshot (exact when its base hash matches the
//!       candidate, fuzzy otherwise), falling back to commit history
//!       (preferring an entry computed against this exact candidate);
//!    b. merge succeeded → write the merged text, refresh baseline and
//!       snapshot;
//!    c. no merge source placed the edits → skip, or ask the injected
//!       prompt before overwriting.
//!
//! `force` bypasses step 4 entirely. Dry-run performs every computation but
//! touches neither the filesystem nor the registry and never prompts.
//!
//! The registry is passed in mutably and saved by the caller once per pass.

use std::path::{Path, PathBuf};

use chrono::Utc;

use armature_core::Workspace;
use armature_patch::{apply_exact, apply_fuzzy, compute_hunks, Hunk, PatchFormat};

use crate::baseline::{hash_content, normalize_line_endings, BaselineEntry, CachedPatch, Registry};
use crate::commits::{FileStatus, HistoryEntry};
use crate::confirm::ConfirmPrompt;
use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Options and outcome
// ---------------------------------------------------------------------------

/// Behavior switches for a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Overwrite user-modified files without merging or prompting.
    pub force: bool,
    /// On an unmergeable conflict, skip the file instead of prompting.
    pub skip_on_conflict: bool,
    /// Compute everything, write nothing, prompt never.
    pub dry_run: bool,
}

/// Outcome of reconciling one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Candidate written verbatim (fresh file, clean baseline, or confirmed
    /// overwrite).
    Written { path: PathBuf },
    /// User edits were replayed onto the candidate and the merged text
    /// written.
    Merged { path: PathBuf },
    /// Disk already holds the intended content; nothing written.
    Unchanged { path: PathBuf },
    /// File left untouched: unmergeable conflict skipped or overwrite
    /// declined.
    Skipped { path: PathBuf },
    /// Dry-run: the candidate would have been written verbatim.
    WouldWrite { path: PathBuf },
    /// Dry-run: user edits would have been merged onto the candidate.
    WouldMerge { path: PathBuf },
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written { path }
            | WriteOutcome::Merged { path }
            | WriteOutcome::Unchanged { path }
            | WriteOutcome::Skipped { path }
            | WriteOutcome::WouldWrite { path }
            | WriteOutcome::WouldMerge { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// write_artifact
// ---------------------------------------------------------------------------

/// Reconcile one artifact path against its candidate content.
///
/// `rel_path` is the artifact path relative to the workspace root; `history`
/// is the flattened commit history from [`crate::commits::load_history`].
/// Mutates `registry` in memory only — the caller persists it after all
/// files of the pass are processed.
pub fn write_artifact(
    ws: &Workspace,
    rel_path: &str,
    candidate: &str,
    registry: &mut Registry,
    history: &[HistoryEntry],
    opts: WriteOptions,
    confirm: &mut dyn ConfirmPrompt,
) -> Result<WriteOutcome, SyncError> {
    let path = ws.artifact_path(rel_path);
    let candidate = normalize_line_endings(candidate);
    let new_hash = hash_content(&candidate);

    // 1. Missing target: plain write.
    if !path.exists() {
        if opts.dry_run {
            tracing::info!("[dry-run] would write: {rel_path}");
            return Ok(WriteOutcome::WouldWrite { path });
        }
        atomic_write(&path, &candidate)?;
        registry.set(rel_path, BaselineEntry::new(&new_hash));
        tracing::debug!("wrote: {rel_path}");
        return Ok(WriteOutcome::Written { path });
    }

    let disk_raw = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let disk = normalize_line_endings(&disk_raw);
    let disk_hash = hash_content(&disk);

    // 2. Disk already holds the candidate content.
    if disk_hash == new_hash {
        if registry.get(rel_path).is_none() && !opts.dry_run {
            // Lost entry, but the content is provably ours. Re-register it.
            registry.set(rel_path, BaselineEntry::new(&new_hash));
        }
        tracing::debug!("unchanged: {rel_path}");
        return Ok(WriteOutcome::Unchanged { path });
    }

    let user_modified = registry
        .get(rel_path)
        .map_or(true, |entry| entry.hash != disk_hash);

    // 3/5. Clean baseline, or force: plain overwrite.
    if !user_modified || opts.force {
        if user_modified {
            tracing::warn!("overwriting user-modified file (forced): {rel_path}");
        }
        if opts.dry_run {
            tracing::info!("[dry-run] would write: {rel_path}");
            return Ok(WriteOutcome::WouldWrite { path });
        }
        atomic_write(&path, &candidate)?;
        registry.set(rel_path, BaselineEntry::new(&new_hash));
        tracing::debug!("wrote: {rel_path}");
        return Ok(WriteOutcome::Written { path });
    }

    // 4a/b. User modified: replay their recorded edits onto the candidate.
    let merged = merge_candidate(&candidate, &new_hash, rel_path, registry.get(rel_path), history);
    if let Some(merged) = merged {
        if merged == disk {
            // The replay reproduces what is already on disk. Refresh
            // tracking, skip the write.
            if !opts.dry_run {
                registry.set(rel_path, merged_entry(&candidate, &merged, &new_hash));
            }
            tracing::debug!("merge reproduces disk content: {rel_path}");
            return Ok(WriteOutcome::Unchanged { path });
        }
        if opts.dry_run {
            tracing::info!("[dry-run] would merge: {rel_path}");
            return Ok(WriteOutcome::WouldMerge { path });
        }
        atomic_write(&path, &merged)?;
        registry.set(rel_path, merged_entry(&candidate, &merged, &new_hash));
        tracing::info!("merged user edits: {rel_path}");
        return Ok(WriteOutcome::Merged { path });
    }

    // 4c/d. Unresolvable conflict.
    if opts.skip_on_conflict || opts.dry_run {
        tracing::warn!("conflict, skipped: {rel_path}");
        return Ok(WriteOutcome::Skipped { path });
    }
    let question = format!("{rel_path} has manual edits that cannot be merged. Overwrite?");
    if !confirm.confirm(&question) {
        tracing::info!("overwrite declined: {rel_path}");
        return Ok(WriteOutcome::Skipped { path });
    }
    atomic_write(&path, &candidate)?;
    registry.set(rel_path, BaselineEntry::new(&new_hash));
    tracing::warn!("overwrote user-modified file: {rel_path}");
    Ok(WriteOutcome::Written { path })
}

/// Registry entry after a successful merge: baseline is the candidate hash,
/// and the snapshot caches the hunks that turn the candidate into the merged
/// text, so the next pass can replay them without consulting history.
fn merged_entry(candidate: &str, merged: &str, new_hash: &str) -> BaselineEntry {
    let now = Utc::now();
    BaselineEntry {
        hash: new_hash.to_string(),
        updated_at: now,
        snapshot: Some(CachedPatch {
            diff_format: PatchFormat::HunksV1,
            diff_base_hash: new_hash.to_string(),
            diff_hunks: compute_hunks(candidate, merged),
            diff_result_hash: hash_content(merged),
            diff_updated_at: now,
        }),
    }
}

// ---------------------------------------------------------------------------
// Merge source selection
// ---------------------------------------------------------------------------

/// Replay recorded user edits onto `candidate`: cached snapshot first, then
/// commit history. Returns the merged text, or `None` when no source places
/// every hunk.
///
/// History preference: an entry whose `baseHash` equals the candidate hash
/// applies exactly; otherwise the most recent entry applies fuzzily. When the
/// candidate contains repeated blocks the fuzzy search takes the first match
/// at or after its cursor, which can pick the wrong occurrence — a known
/// limit of the linear scan.
pub(crate) fn merge_candidate(
    candidate: &str,
    new_hash: &str,
    rel_path: &str,
    entry: Option<&BaselineEntry>,
    history: &[HistoryEntry],
) -> Option<String> {
    if let Some(snapshot) = entry.and_then(|e| e.snapshot.as_ref()) {
        let replay = if snapshot.diff_base_hash == new_hash {
            apply_exact(candidate, &snapshot.diff_hunks)
        } else {
            apply_fuzzy(candidate, &snapshot.diff_hunks)
        };
        match replay {
            Ok(merged) => return Some(merged),
            Err(err) => {
                tracing::debug!("cached snapshot did not apply for {rel_path}: {err}");
            }
        }
    }

    let mut exact = None;
    let mut most_recent = None;
    for h in history.iter().rev() {
        if h.file != rel_path || h.entry.status != FileStatus::Modified {
            continue;
        }
        let Some(hunks) = resolve_history_patch(h, rel_path) else {
            continue;
        };
        if most_recent.is_none() {
            most_recent = Some(hunks.clone());
        }
        if h.entry.base_hash.as_deref() == Some(new_hash) {
            exact = Some(hunks);
            break;
        }
    }

    if let Some(hunks) = exact {
        match apply_exact(candidate, &hunks) {
            Ok(merged) => return Some(merged),
            Err(err) => {
                tracing::debug!("exact history replay failed for {rel_path}: {err}");
            }
        }
    }
    if let Some(hunks) = most_recent {
        match apply_fuzzy(candidate, &hunks) {
            Ok(merged) => return Some(merged),
            Err(err) => {
                tracing::info!("fuzzy history replay failed for {rel_path}: {err}");
            }
        }
    }
    None
}

fn resolve_history_patch(h: &HistoryEntry, rel_path: &str) -> Option<Vec<Hunk>> {
    let patch = h.entry.patch()?;
    match patch.hunks() {
        Ok(hunks) => Some(hunks.into_owned()),
        Err(err) => {
            tracing::warn!("unusable patch in commit history for {rel_path}: {err}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

fn atomic_write(path: &Path, content: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.armature.tmp", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commits::CommitFileEntry;
    use crate::confirm::{AlwaysConfirm, NeverConfirm};
    use std::fs;
    use tempfile::TempDir;

    const DEMO: &str = "src/demo.ts";

    /// Confirm stub that records questions and panics when not expected.
    struct Scripted {
        answer: bool,
        asked: Vec<String>,
    }

    impl Scripted {
        fn answering(answer: bool) -> Self {
            Scripted {
                answer,
                asked: Vec::new(),
            }
        }
    }

    impl ConfirmPrompt for Scripted {
        fn confirm(&mut self, question: &str) -> bool {
            self.asked.push(question.to_string());
            self.answer
        }
    }

    struct PanicPrompt;

    impl ConfirmPrompt for PanicPrompt {
        fn confirm(&mut self, question: &str) -> bool {
            panic!("prompt must not be reached: {question}");
        }
    }

    fn setup() -> (TempDir, Workspace, Registry) {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path());
        (tmp, ws, Registry::default())
    }

    fn write(
        ws: &Workspace,
        candidate: &str,
        registry: &mut Registry,
        history: &[HistoryEntry],
        opts: WriteOptions,
    ) -> WriteOutcome {
        write_artifact(ws, DEMO, candidate, registry, history, opts, &mut PanicPrompt).unwrap()
    }

    fn install_snapshot(registry: &mut Registry, candidate: &str, edited: &str) {
        let entry = registry.entries.get_mut(DEMO).expect("entry exists");
        let now = Utc::now();
        entry.snapshot = Some(CachedPatch {
            diff_format: PatchFormat::HunksV1,
            diff_base_hash: hash_content(candidate),
            diff_hunks: compute_hunks(candidate, edited),
            diff_result_hash: hash_content(edited),
            diff_updated_at: now,
        });
    }

    #[test]
    fn first_write_creates_file_and_registers_baseline() {
        let (_tmp, ws, mut registry) = setup();
        let outcome = write(&ws, "line1\nline2\n", &mut registry, &[], WriteOptions::default());
        assert!(matches!(outcome, WriteOutcome::Written { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "line1\nline2\n");
        assert_eq!(
            registry.get(DEMO).unwrap().hash,
            hash_content("line1\nline2\n")
        );
    }

    #[test]
    fn identical_content_is_unchanged_and_preserves_mtime() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "same\n", &mut registry, &[], WriteOptions::default());
        let before = fs::metadata(ws.artifact_path(DEMO)).unwrap().modified().unwrap();
        let entry_before = registry.get(DEMO).cloned();

        let outcome = write(&ws, "same\n", &mut registry, &[], WriteOptions::default());
        assert!(matches!(outcome, WriteOutcome::Unchanged { .. }));
        let after = fs::metadata(ws.artifact_path(DEMO)).unwrap().modified().unwrap();
        assert_eq!(after, before, "no-op write must not touch the file");
        assert_eq!(registry.get(DEMO).cloned(), entry_before);
    }

    #[test]
    fn clean_baseline_overwrites_without_prompting() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "v1\n", &mut registry, &[], WriteOptions::default());
        let outcome = write(&ws, "v2\n", &mut registry, &[], WriteOptions::default());
        assert!(matches!(outcome, WriteOutcome::Written { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "v2\n");
    }

    #[test]
    fn crlf_candidate_matches_lf_disk() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "a\nb\n", &mut registry, &[], WriteOptions::default());
        let outcome = write(&ws, "a\r\nb\r\n", &mut registry, &[], WriteOptions::default());
        assert!(matches!(outcome, WriteOutcome::Unchanged { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "a\nb\n");
    }

    #[test]
    fn conflict_prompt_decline_skips_and_preserves_file() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "generated\n", &mut registry, &[], WriteOptions::default());
        fs::write(ws.artifact_path(DEMO), "hand edited\n").unwrap();

        let mut prompt = Scripted::answering(false);
        let outcome = write_artifact(
            &ws,
            DEMO,
            "generated v2\n",
            &mut registry,
            &[],
            WriteOptions::default(),
            &mut prompt,
        )
        .unwrap();

        assert!(matches!(outcome, WriteOutcome::Skipped { .. }));
        assert_eq!(prompt.asked.len(), 1);
        assert!(prompt.asked[0].contains(DEMO));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "hand edited\n");
    }

    #[test]
    fn conflict_prompt_accept_overwrites() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "generated\n", &mut registry, &[], WriteOptions::default());
        fs::write(ws.artifact_path(DEMO), "hand edited\n").unwrap();

        let mut prompt = Scripted::answering(true);
        let outcome = write_artifact(
            &ws,
            DEMO,
            "generated v2\n",
            &mut registry,
            &[],
            WriteOptions::default(),
            &mut prompt,
        )
        .unwrap();

        assert!(matches!(outcome, WriteOutcome::Written { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "generated v2\n");
        assert_eq!(registry.get(DEMO).unwrap().hash, hash_content("generated v2\n"));
    }

    #[test]
    fn skip_on_conflict_never_prompts() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "generated\n", &mut registry, &[], WriteOptions::default());
        fs::write(ws.artifact_path(DEMO), "hand edited\n").unwrap();

        let opts = WriteOptions {
            skip_on_conflict: true,
            ..WriteOptions::default()
        };
        // PanicPrompt proves no prompt is reached.
        let outcome = write(&ws, "generated v2\n", &mut registry, &[], opts);
        assert!(matches!(outcome, WriteOutcome::Skipped { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "hand edited\n");
    }

    #[test]
    fn force_overwrites_user_edits_without_prompting() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "generated\n", &mut registry, &[], WriteOptions::default());
        fs::write(ws.artifact_path(DEMO), "hand edited\n").unwrap();

        let opts = WriteOptions {
            force: true,
            ..WriteOptions::default()
        };
        let outcome = write(&ws, "generated v2\n", &mut registry, &[], opts);
        assert!(matches!(outcome, WriteOutcome::Written { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "generated v2\n");
    }

    #[test]
    fn missing_registry_entry_counts_as_user_modified() {
        let (_tmp, ws, mut registry) = setup();
        // File exists with foreign content and no entry: must not be
        // silently overwritten.
        fs::create_dir_all(ws.artifact_path(DEMO).parent().unwrap()).unwrap();
        fs::write(ws.artifact_path(DEMO), "not ours\n").unwrap();

        let opts = WriteOptions {
            skip_on_conflict: true,
            ..WriteOptions::default()
        };
        let outcome = write(&ws, "generated\n", &mut registry, &[], opts);
        assert!(matches!(outcome, WriteOutcome::Skipped { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "not ours\n");
    }

    #[test]
    fn matching_unregistered_content_self_heals_the_entry() {
        let (_tmp, ws, mut registry) = setup();
        fs::create_dir_all(ws.artifact_path(DEMO).parent().unwrap()).unwrap();
        fs::write(ws.artifact_path(DEMO), "generated\n").unwrap();

        let outcome = write(&ws, "generated\n", &mut registry, &[], WriteOptions::default());
        assert!(matches!(outcome, WriteOutcome::Unchanged { .. }));
        assert_eq!(registry.get(DEMO).unwrap().hash, hash_content("generated\n"));
    }

    #[test]
    fn snapshot_replays_edits_onto_grown_candidate() {
        let (_tmp, ws, mut registry) = setup();
        let v1 = "line1\nline2\nline3\n";
        write(&ws, v1, &mut registry, &[], WriteOptions::default());

        let edited = "line1\nline2-EDITED\nline3\n";
        fs::write(ws.artifact_path(DEMO), edited).unwrap();
        install_snapshot(&mut registry, v1, edited);

        let v2 = "line1\nline2\nline3\nline4\n";
        let outcome = write(&ws, v2, &mut registry, &[], WriteOptions::default());
        assert!(matches!(outcome, WriteOutcome::Merged { .. }));
        assert_eq!(
            fs::read_to_string(ws.artifact_path(DEMO)).unwrap(),
            "line1\nline2-EDITED\nline3\nline4\n"
        );
        // Baseline is the candidate, snapshot replays candidate → merged.
        let entry = registry.get(DEMO).unwrap();
        assert_eq!(entry.hash, hash_content(v2));
        let snapshot = entry.snapshot.as_ref().expect("snapshot refreshed");
        assert_eq!(snapshot.diff_base_hash, hash_content(v2));
        assert_eq!(
            snapshot.diff_result_hash,
            hash_content("line1\nline2-EDITED\nline3\nline4\n")
        );
    }

    #[test]
    fn snapshot_exact_replay_matching_disk_reports_unchanged() {
        let (_tmp, ws, mut registry) = setup();
        let v1 = "line1\nline2\nline3\n";
        write(&ws, v1, &mut registry, &[], WriteOptions::default());

        let edited = "line1\nline2-EDITED\nline3\n";
        fs::write(ws.artifact_path(DEMO), edited).unwrap();
        install_snapshot(&mut registry, v1, edited);

        // Same candidate again: exact replay reproduces the disk content.
        let outcome = write(&ws, v1, &mut registry, &[], WriteOptions::default());
        assert!(matches!(outcome, WriteOutcome::Unchanged { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), edited);
    }

    #[test]
    fn history_exact_base_match_is_preferred_over_most_recent() {
        let (_tmp, ws, mut registry) = setup();
        let candidate = "a\nb\nc\n";
        write(&ws, candidate, &mut registry, &[], WriteOptions::default());
        fs::write(ws.artifact_path(DEMO), "a\nB\nc\n").unwrap();

        let matching = HistoryEntry {
            created_at: Utc::now() - chrono::Duration::hours(1),
            file: DEMO.to_string(),
            entry: CommitFileEntry::hunks_v1(
                DEMO,
                hash_content(candidate),
                hash_content("a\nB\nc\n"),
                compute_hunks(candidate, "a\nB\nc\n"),
            ),
        };
        let newer_foreign = HistoryEntry {
            created_at: Utc::now(),
            file: DEMO.to_string(),
            entry: CommitFileEntry::hunks_v1(
                DEMO,
                "unrelated-base",
                hash_content("a\nZ\nc\n"),
                compute_hunks(candidate, "a\nZ\nc\n"),
            ),
        };
        let history = vec![matching, newer_foreign];

        let outcome = write(&ws, candidate, &mut registry, &history, WriteOptions::default());
        // The base-matching entry replays exactly and reproduces the disk
        // content; the newer entry with a foreign base is not consulted.
        assert!(matches!(outcome, WriteOutcome::Unchanged { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), "a\nB\nc\n");
    }

    #[test]
    fn history_fuzzy_fallback_uses_most_recent_entry() {
        let (_tmp, ws, mut registry) = setup();
        let v1 = "line1\nline2\nline3\n";
        write(&ws, v1, &mut registry, &[], WriteOptions::default());
        fs::write(ws.artifact_path(DEMO), "line1\nline2-OLD\nline3\n").unwrap();

        let older = HistoryEntry {
            created_at: Utc::now() - chrono::Duration::hours(2),
            file: DEMO.to_string(),
            entry: CommitFileEntry::hunks_v1(
                DEMO,
                hash_content("ancient"),
                "r1".to_string(),
                compute_hunks(v1, "line1\nline2-OLD\nline3\n"),
            ),
        };
        let newer = HistoryEntry {
            created_at: Utc::now() - chrono::Duration::hours(1),
            file: DEMO.to_string(),
            entry: CommitFileEntry::hunks_v1(
                DEMO,
                hash_content("also-ancient"),
                "r2".to_string(),
                compute_hunks(v1, "line1\nline2-NEW\nline3\n"),
            ),
        };
        let history = vec![older, newer];

        let v2 = "line1\nline2\nline3\nline4\n";
        let outcome = write(&ws, v2, &mut registry, &history, WriteOptions::default());
        assert!(matches!(outcome, WriteOutcome::Merged { .. }));
        assert_eq!(
            fs::read_to_string(ws.artifact_path(DEMO)).unwrap(),
            "line1\nline2-NEW\nline3\nline4\n",
            "the most recent history entry wins the fuzzy fallback"
        );
    }

    #[test]
    fn vanished_block_fails_merge_and_skips() {
        let (_tmp, ws, mut registry) = setup();
        let v1 = "line1\nline2\nline3\n";
        write(&ws, v1, &mut registry, &[], WriteOptions::default());
        let edited = "line1\nline2-EDITED\nline3\n";
        fs::write(ws.artifact_path(DEMO), edited).unwrap();
        install_snapshot(&mut registry, v1, edited);

        // line2 no longer exists anywhere in the new candidate.
        let v2 = "alpha\nbeta\ngamma\n";
        let opts = WriteOptions {
            skip_on_conflict: true,
            ..WriteOptions::default()
        };
        let outcome = write(&ws, v2, &mut registry, &[], opts);
        assert!(matches!(outcome, WriteOutcome::Skipped { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), edited);
    }

    #[test]
    fn dry_run_reports_without_touching_anything() {
        let (_tmp, ws, mut registry) = setup();
        let opts = WriteOptions {
            dry_run: true,
            ..WriteOptions::default()
        };

        let outcome = write(&ws, "fresh\n", &mut registry, &[], opts);
        assert!(matches!(outcome, WriteOutcome::WouldWrite { .. }));
        assert!(!ws.artifact_path(DEMO).exists(), "dry-run must not create files");
        assert!(registry.is_empty(), "dry-run must not mutate the registry");
    }

    #[test]
    fn dry_run_merge_reports_would_merge() {
        let (_tmp, ws, mut registry) = setup();
        let v1 = "line1\nline2\nline3\n";
        write(&ws, v1, &mut registry, &[], WriteOptions::default());
        let edited = "line1\nline2-EDITED\nline3\n";
        fs::write(ws.artifact_path(DEMO), edited).unwrap();
        install_snapshot(&mut registry, v1, edited);
        let entry_before = registry.get(DEMO).cloned();

        let opts = WriteOptions {
            dry_run: true,
            ..WriteOptions::default()
        };
        let outcome = write(&ws, "line1\nline2\nline3\nline4\n", &mut registry, &[], opts);
        assert!(matches!(outcome, WriteOutcome::WouldMerge { .. }));
        assert_eq!(fs::read_to_string(ws.artifact_path(DEMO)).unwrap(), edited);
        assert_eq!(registry.get(DEMO).cloned(), entry_before);
    }

    #[test]
    fn dry_run_conflict_skips_without_prompting() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "generated\n", &mut registry, &[], WriteOptions::default());
        fs::write(ws.artifact_path(DEMO), "hand edited\n").unwrap();

        let opts = WriteOptions {
            dry_run: true,
            ..WriteOptions::default()
        };
        // PanicPrompt proves dry-run never prompts.
        let outcome = write(&ws, "generated v2\n", &mut registry, &[], opts);
        assert!(matches!(outcome, WriteOutcome::Skipped { .. }));
    }

    #[test]
    fn fresh_write_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path());
        let mut registry = Registry::default();
        let outcome = write_artifact(
            &ws,
            "src/api/index.ts",
            "export {};\n",
            &mut registry,
            &[],
            WriteOptions::default(),
            &mut AlwaysConfirm,
        )
        .unwrap();
        assert!(matches!(outcome, WriteOutcome::Written { .. }));
        assert!(ws.artifact_path("src/api/index.ts").exists());
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "data\n", &mut registry, &[], WriteOptions::default());
        let tmp_path = PathBuf::from(format!(
            "{}.armature.tmp",
            ws.artifact_path(DEMO).display()
        ));
        assert!(!tmp_path.exists(), ".armature.tmp must be cleaned up");
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("file.ts");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("file.ts.armature.tmp");

        atomic_write_with_tmp(&path, "new content", &tmp_path)
            .expect_err("rename should fail on readonly dir");

        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
        assert!(!tmp_path.exists(), ".armature.tmp should be cleaned up");

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();
    }

    #[test]
    fn never_confirm_behaves_like_decline() {
        let (_tmp, ws, mut registry) = setup();
        write(&ws, "generated\n", &mut registry, &[], WriteOptions::default());
        fs::write(ws.artifact_path(DEMO), "hand edited\n").unwrap();

        let outcome = write_artifact(
            &ws,
            DEMO,
            "generated v2\n",
            &mut registry,
            &[],
            WriteOptions::default(),
            &mut NeverConfirm,
        )
        .unwrap();
        assert!(matches!(outcome, WriteOutcome::Skipped { .. }));
    }
}
