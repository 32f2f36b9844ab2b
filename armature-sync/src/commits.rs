//! Commit store — append-only log of captured edit sets.
//!
//! Each explicit commit writes one immutable JSON file at
//! `<root>/.armature/commits/<timestamp>.json` and nothing ever rewrites or
//! deletes it. The full set, loaded and flattened per file, sorted ascending
//! by `createdAt`, is the replayable history of user customizations; the
//! registry can be discarded and rebuilt, the commit log cannot.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use armature_core::Workspace;
use armature_patch::{Hunk, Patch, PatchFormat};

use crate::error::{io_err, SyncError};

/// Per-file status recorded in a commit. Only modifications are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    #[default]
    Modified,
}

/// One file's captured edit set inside a commit record.
///
/// Current records carry `format: "hunks-v1"` plus `hunks`; ancestral records
/// carry a whole-file line-diff string in `diff` instead. Both resolve
/// through [`CommitFileEntry::patch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitFileEntry {
    pub file: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<PatchFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hunks: Option<Vec<Hunk>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl CommitFileEntry {
    /// Entry in the current hunk representation.
    pub fn hunks_v1(
        file: impl Into<String>,
        base_hash: impl Into<String>,
        result_hash: impl Into<String>,
        hunks: Vec<Hunk>,
    ) -> Self {
        CommitFileEntry {
            file: file.into(),
            status: FileStatus::Modified,
            format: Some(PatchFormat::HunksV1),
            base_hash: Some(base_hash.into()),
            result_hash: Some(result_hash.into()),
            hunks: Some(hunks),
            diff: None,
        }
    }

    /// The recorded patch, in whichever representation the entry carries.
    /// `None` when the entry has neither hunks nor a legacy diff.
    pub fn patch(&self) -> Option<Patch> {
        if let Some(hunks) = &self.hunks {
            return Some(Patch::Hunks(hunks.clone()));
        }
        self.diff.clone().map(Patch::LineDiff)
    }
}

/// One immutable commit: a timestamp plus the files it captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub created_at: DateTime<Utc>,
    pub files: Vec<CommitFileEntry>,
}

/// One flattened history element: a single file's entry from one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub created_at: DateTime<Utc>,
    pub file: String,
    pub entry: CommitFileEntry,
}

/// Path of the commit file for a given creation time.
///
/// `<root>/.armature/commits/20260821T143052026Z.json` — millisecond UTC
/// stamp, filesystem safe, lexicographic order matches chronological order.
pub fn commit_file_path(ws: &Workspace, created_at: DateTime<Utc>) -> PathBuf {
    ws.commits_dir()
        .join(format!("{}.json", created_at.format("%Y%m%dT%H%M%S%3fZ")))
}

/// Append one new commit record with the current timestamp.
///
/// There is no update or delete counterpart.
pub fn record(ws: &Workspace, files: Vec<CommitFileEntry>) -> Result<CommitRecord, SyncError> {
    let record = CommitRecord {
        created_at: Utc::now(),
        files,
    };

    let dir = ws.commits_dir();
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;

    let path = commit_file_path(ws, record.created_at);
    let json = serde_json::to_string_pretty(&record)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }

    tracing::info!("recorded commit {} ({} file(s))", path.display(), record.files.len());
    Ok(record)
}

/// Load every commit record, flattened per file, sorted ascending by
/// `createdAt`.
///
/// A record that fails to parse is logged and skipped; the scan of the
/// remaining records continues. A missing commits directory is an empty
/// history.
pub fn load_history(ws: &Workspace) -> Result<Vec<HistoryEntry>, SyncError> {
    let dir = ws.commits_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
        let entry = entry.map_err(|e| io_err(&dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut history = Vec::new();
    for path in paths {
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let record: CommitRecord = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("skipping malformed commit record {}: {err}", path.display());
                continue;
            }
        };
        for file_entry in record.files {
            history.push(HistoryEntry {
                created_at: record.created_at,
                file: file_entry.file.clone(),
                entry: file_entry,
            });
        }
    }

    history.sort_by_key(|h| h.created_at);
    Ok(history)
}
