//! Baseline registry — path → hash of the last content this tool wrote.
//!
//! Persists a JSON object at `<root>/.armature/baselines.json` keyed by
//! artifact path relative to the workspace root. Each entry records the
//! baseline hash plus, optionally, a cached snapshot of the most recent hunk
//! set computed for that path (flattened into the entry as the `diff*` keys).
//! Writes use the same atomic `.tmp` + rename pattern as the blueprint.
//!
//! A missing or malformed registry file is never fatal: it degrades to an
//! empty registry, losing tracking metadata but never source content.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use armature_core::Workspace;
use armature_patch::{Hunk, PatchFormat};

use crate::error::{io_err, SyncError};

/// Replace CRLF with LF. Applied to every candidate and every disk read
/// before hashing or comparing, so checked-out line endings never register
/// as drift.
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// SHA-256 hex digest of the normalized content.
pub fn hash_content(content: &str) -> String {
    let normalized = normalize_line_endings(content);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cached hunk snapshot: the most recent edit set computed for a path,
/// tagged with the baseline hash it was computed against (`diff_base_hash`)
/// and the hash of the content it produces (`diff_result_hash`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPatch {
    pub diff_format: PatchFormat,
    pub diff_base_hash: String,
    pub diff_hunks: Vec<Hunk>,
    pub diff_result_hash: String,
    pub diff_updated_at: DateTime<Utc>,
}

/// One registry entry. `hash` is the digest of the last content this tool
/// itself wrote for the path — the baseline — which is not necessarily what
/// is on disk now. Entries are only ever derived from tool-written content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineEntry {
    pub hash: String,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: Option<CachedPatch>,
}

impl BaselineEntry {
    /// Fresh entry with no cached snapshot.
    pub fn new(hash: impl Into<String>) -> Self {
        BaselineEntry {
            hash: hash.into(),
            updated_at: Utc::now(),
            snapshot: None,
        }
    }
}

/// In-memory registry: relative path string → [`BaselineEntry`].
///
/// A `BTreeMap` keeps the persisted document's key order stable across saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    pub entries: BTreeMap<String, BaselineEntry>,
}

impl Registry {
    pub fn get(&self, rel_path: &str) -> Option<&BaselineEntry> {
        self.entries.get(rel_path)
    }

    pub fn set(&mut self, rel_path: impl Into<String>, entry: BaselineEntry) {
        self.entries.insert(rel_path.into(), entry);
    }

    pub fn remove(&mut self, rel_path: &str) -> Option<BaselineEntry> {
        self.entries.remove(rel_path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest `updated_at` across all entries, if any.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.entries.values().map(|e| e.updated_at).max()
    }
}

/// Load the registry for a workspace.
///
/// A missing file yields an empty registry; a file that fails to parse is
/// logged and also yields an empty registry. Only read failures on an
/// existing file are errors.
pub fn load(ws: &Workspace) -> Result<Registry, SyncError> {
    let path = ws.baselines_path();
    if !path.exists() {
        return Ok(Registry::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    match serde_json::from_str::<Registry>(&contents) {
        Ok(registry) => Ok(registry),
        Err(err) => {
            tracing::warn!(
                "registry at {} is malformed ({err}); starting from an empty registry",
                path.display()
            );
            Ok(Registry::default())
        }
    }
}

/// Save the registry atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`. One whole-document
/// rewrite per generation pass.
pub fn save(ws: &Workspace, registry: &Registry) -> Result<(), SyncError> {
    ws.ensure_state_dir()?;
    let path = ws.baselines_path();
    let json = serde_json::to_string_pretty(registry)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    Ok(())
}
