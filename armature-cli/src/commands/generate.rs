//! `armature generate` — render the blueprint and reconcile every managed file.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use armature_sync::{
    pipeline::{self, GenerateReport},
    AlwaysConfirm, ConfirmPrompt, WriteOptions, WriteOutcome,
};

/// Arguments for `armature generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Project root containing armature.yaml.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Overwrite user-modified files without merging or prompting.
    #[arg(long)]
    pub force: bool,

    /// Skip files whose edits cannot be merged instead of prompting.
    #[arg(long = "skip-conflicts")]
    pub skip_conflicts: bool,

    /// Show what would change without writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Answer yes to every overwrite prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        let ws = super::workspace_at(&self.root)?;
        let opts = WriteOptions {
            force: self.force,
            skip_on_conflict: self.skip_conflicts,
            dry_run: self.dry_run,
        };

        let report = if self.yes {
            pipeline::generate(&ws, opts, &mut AlwaysConfirm)
        } else {
            pipeline::generate(&ws, opts, &mut StdinConfirm)
        }
        .context("generate failed")?;

        print_report(&report, self.dry_run);
        Ok(())
    }
}

/// Prompts on stdout and reads one line from stdin. Anything other than
/// `y` or `yes` declines.
#[derive(Debug, Default)]
struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        print!("{question} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn print_report(report: &GenerateReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = report.count(|o| {
        matches!(
            o,
            WriteOutcome::Written { .. } | WriteOutcome::WouldWrite { .. }
        )
    });
    let merged = report.count(|o| {
        matches!(
            o,
            WriteOutcome::Merged { .. } | WriteOutcome::WouldMerge { .. }
        )
    });
    let unchanged = report.count(|o| matches!(o, WriteOutcome::Unchanged { .. }));
    let skipped = report.count(|o| matches!(o, WriteOutcome::Skipped { .. }));

    let mut summary = format!("{written} written, {merged} merged, {unchanged} unchanged");
    if skipped > 0 {
        summary.push_str(&format!(", {skipped} skipped"));
    }
    println!("{prefix}✓ '{}' generated ({summary})", report.app);

    for (rel_path, outcome) in &report.outcomes {
        let glyph = match outcome {
            WriteOutcome::Written { .. } => "✎",
            WriteOutcome::Merged { .. } => "⊕",
            WriteOutcome::Unchanged { .. } => "·",
            WriteOutcome::Skipped { .. } => "✗",
            WriteOutcome::WouldWrite { .. } | WriteOutcome::WouldMerge { .. } => "~",
        };
        println!("  {glyph}  {rel_path}");
    }

    if skipped > 0 {
        println!("Skipped files kept their local edits. Re-run with --force to overwrite.");
    }
}
