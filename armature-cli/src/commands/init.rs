//! `armature init <app-name>` — scaffold a starter blueprint.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use armature_core::blueprint::{self, InitOutcome};

/// Arguments for `armature init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Application name written into the starter blueprint.
    pub app: String,

    /// Project root directory.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let ws = super::workspace_at(&self.root)?;
        let outcome = blueprint::init_at(&ws, &self.app)
            .with_context(|| format!("failed to scaffold a blueprint for '{}'", self.app))?;

        match outcome {
            InitOutcome::Created { path } => {
                println!("✓ Created {}", super::display_path(&ws, &path));
                println!("  Edit the blueprint, then run `armature generate`.");
            }
            InitOutcome::AlreadyExists { path } => {
                println!(
                    "'{}' already exists — left untouched.",
                    super::display_path(&ws, &path)
                );
            }
        }
        Ok(())
    }
}
