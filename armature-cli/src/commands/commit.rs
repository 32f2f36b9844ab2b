//! `armature commit` — capture local edits as an immutable commit record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use armature_sync::{commit_drift, commits};

/// Arguments for `armature commit`.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Project root containing armature.yaml.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

impl CommitArgs {
    pub fn run(self) -> Result<()> {
        let ws = super::workspace_at(&self.root)?;
        let outcome = commit_drift(&ws).context("commit failed")?;

        let Some(record) = outcome.record else {
            println!("Nothing to commit — every managed file matches its generated content.");
            return Ok(());
        };

        println!("✓ Committed {} file(s)", outcome.committed.len());
        for file in &outcome.committed {
            println!("  ✎  {file}");
        }
        let record_path = commits::commit_file_path(&ws, record.created_at);
        println!("  Saved to: {}", super::display_path(&ws, &record_path));
        Ok(())
    }
}
