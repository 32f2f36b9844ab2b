//! Project-rooted path layout.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   armature.yaml            (the blueprint)
//!   .armature/
//!     baselines.json         (path → baseline hash registry)
//!     commits/
//!       <timestamp>.json     (one file per commit, append-only)
//!   src/…                    (generated artifacts)
//! ```
//!
//! A [`Workspace`] is constructed once at process start from an explicit root
//! and passed by reference into every load/save/write call. There is no
//! process-global root and no environment lookup.

use std::path::{Path, PathBuf};

use crate::error::BlueprintError;

/// File name of the blueprint at the workspace root.
pub const BLUEPRINT_FILE: &str = "armature.yaml";

/// Directory name of the tool's state, relative to the workspace root.
pub const STATE_DIR: &str = ".armature";

/// Explicit project root plus the paths derived from it. Pure except for
/// [`Workspace::ensure_state_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/armature.yaml`
    pub fn blueprint_path(&self) -> PathBuf {
        self.root.join(BLUEPRINT_FILE)
    }

    /// `<root>/.armature/`
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    /// `<root>/.armature/baselines.json`
    pub fn baselines_path(&self) -> PathBuf {
        self.state_dir().join("baselines.json")
    }

    /// `<root>/.armature/commits/`
    pub fn commits_dir(&self) -> PathBuf {
        self.state_dir().join("commits")
    }

    /// Join a registry-relative artifact path onto the root.
    ///
    /// Registry keys always use forward slashes; this converts them to the
    /// platform separator.
    pub fn artifact_path(&self, relative: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in relative.split('/') {
            path.push(part);
        }
        path
    }

    /// Create `<root>/.armature/` (and `commits/`) if absent.
    pub fn ensure_state_dir(&self) -> Result<(), BlueprintError> {
        std::fs::create_dir_all(self.commits_dir())?;
        Ok(())
    }
}
