//! `armature diff` — unified diffs of what generate would change.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use armature_sync::diff_project;

/// Arguments for `armature diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Project root containing armature.yaml.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let ws = super::workspace_at(&self.root)?;
        let diffs = diff_project(&ws).context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences — the working tree matches what generate would produce.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
