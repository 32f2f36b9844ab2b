//! Armature — blueprint-driven TypeScript scaffolding CLI.
//!
//! # Usage
//!
//! ```text
//! armature init <app-name> [--root <dir>]
//! armature generate [--root <dir>] [--dry-run] [--force] [--skip-conflicts] [--yes]
//! armature diff [--root <dir>]
//! armature commit [--root <dir>]
//! armature status [--root <dir>] [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    commit::CommitArgs, diff::DiffArgs, generate::GenerateArgs, init::InitArgs, status::StatusArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "armature",
    version,
    about = "Generate and regenerate TypeScript app scaffolds without losing local edits",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold a starter armature.yaml blueprint.
    Init(InitArgs),

    /// Render the blueprint and reconcile every managed file.
    Generate(GenerateArgs),

    /// Show what generate would change, as unified diffs.
    Diff(DiffArgs),

    /// Capture local edits to managed files as a commit record.
    Commit(CommitArgs),

    /// Show drift between the working tree and the generated state.
    Status(StatusArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Generate(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Commit(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
