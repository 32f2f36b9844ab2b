//! Drift signal detection for `armature status`.
//!
//! Signal precedence:
//! 1. `NeverGenerated` (registry missing or empty)
//! 2. `Missing` (managed files deleted)
//! 3. `BlueprintChanged` (blueprint newer than the newest baseline write)
//! 4. `Drifted` (tracked files edited since last generation)
//! 5. `Untracked` (managed files on disk with no registry entry)
//! 6. `Current`
//!
//! Modification is decided by the registry hash comparison and nothing else;
//! file mtimes only feed the blueprint-age check.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use armature_core::types::Blueprint;
use armature_core::Workspace;
use armature_render::artifact_paths;

use crate::baseline::{self, hash_content, normalize_line_endings, Registry};
use crate::error::{io_err, SyncError};

/// Project-level drift classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftSignal {
    NeverGenerated,
    Missing { files: Vec<String> },
    BlueprintChanged { reason: String },
    Drifted { files: Vec<String> },
    Untracked { files: Vec<String> },
    Current,
}

/// Per-path drift state, for the status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Current,
    Drifted,
    Missing,
    Untracked,
}

/// One managed path with its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDrift {
    pub rel_path: String,
    pub state: FileState,
}

/// Classify every managed path against the registry.
pub fn file_states(
    ws: &Workspace,
    blueprint: &Blueprint,
    registry: &Registry,
) -> Result<Vec<FileDrift>, SyncError> {
    let mut managed = artifact_paths(blueprint);
    managed.sort();

    let mut states = Vec::new();
    for rel_path in managed {
        let path = ws.artifact_path(&rel_path);
        let state = match (path.exists(), registry.get(&rel_path)) {
            (false, _) => FileState::Missing,
            (true, None) => FileState::Untracked,
            (true, Some(entry)) => {
                let disk_raw = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
                if hash_content(&normalize_line_endings(&disk_raw)) == entry.hash {
                    FileState::Current
                } else {
                    FileState::Drifted
                }
            }
        };
        states.push(FileDrift { rel_path, state });
    }
    Ok(states)
}

/// Check the project for drift against the registry and blueprint age.
pub fn check(ws: &Workspace, blueprint: &Blueprint) -> Result<DriftSignal, SyncError> {
    // First-run handling: no registry or no tracked baselines is "never
    // generated", not drift.
    let registry_exists = ws.baselines_path().exists();
    let registry = baseline::load(ws)?;
    if !registry_exists || registry.is_empty() {
        return Ok(DriftSignal::NeverGenerated);
    }

    let states = file_states(ws, blueprint, &registry)?;

    let missing = collect(&states, FileState::Missing);
    if !missing.is_empty() {
        return Ok(DriftSignal::Missing { files: missing });
    }

    // Freshness compares the blueprint mtime with the newest baseline
    // `updatedAt`, not with rendered file mtimes.
    let bp_path = ws.blueprint_path();
    let bp_meta = std::fs::metadata(&bp_path).map_err(|e| io_err(&bp_path, e))?;
    let bp_mtime = bp_meta.modified().map_err(|e| io_err(&bp_path, e))?;
    if let Some(last_generated) = registry.last_updated() {
        if unix_duration(bp_mtime) > datetime_to_unix_duration(last_generated) {
            return Ok(DriftSignal::BlueprintChanged {
                reason: format!(
                    "armature.yaml changed {} ago",
                    format_system_time_age(bp_mtime)
                ),
            });
        }
    }

    let drifted = collect(&states, FileState::Drifted);
    if !drifted.is_empty() {
        return Ok(DriftSignal::Drifted { files: drifted });
    }

    let untracked = collect(&states, FileState::Untracked);
    if !untracked.is_empty() {
        return Ok(DriftSignal::Untracked { files: untracked });
    }

    Ok(DriftSignal::Current)
}

fn collect(states: &[FileDrift], wanted: FileState) -> Vec<String> {
    states
        .iter()
        .filter(|s| s.state == wanted)
        .map(|s| s.rel_path.clone())
        .collect()
}

/// Format age from a filesystem timestamp.
pub fn format_system_time_age(timestamp: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(timestamp)
        .unwrap_or_default();
    format_seconds(age.as_secs())
}

/// Format age from a registry timestamp.
pub fn format_datetime_age(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let age = now.signed_duration_since(timestamp).num_seconds().max(0) as u64;
    format_seconds(age)
}

fn unix_duration(timestamp: SystemTime) -> Duration {
    timestamp.duration_since(UNIX_EPOCH).unwrap_or_default()
}

fn datetime_to_unix_duration(timestamp: DateTime<Utc>) -> Duration {
    let secs = timestamp.timestamp().max(0) as u64;
    Duration::new(secs, timestamp.timestamp_subsec_nanos())
}

fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}
