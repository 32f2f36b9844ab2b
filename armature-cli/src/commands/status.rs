//! `armature status` — drift visibility for the managed working tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use armature_core::blueprint;
use armature_sync::{
    baseline,
    drift::{self, format_datetime_age, FileDrift, FileState},
    DriftSignal,
};

/// Arguments for `armature status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Project root containing armature.yaml.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let ws = super::workspace_at(&self.root)?;
        let bp = blueprint::load_at(&ws)
            .context("failed to load armature.yaml — run `armature init` first")?;

        let registry = baseline::load(&ws).context("failed to load the baseline registry")?;
        let signal = drift::check(&ws, &bp).context("drift check failed")?;
        let files = drift::file_states(&ws, &bp, &registry)
            .with_context(|| format!("drift check failed for '{}'", bp.app.name))?;

        let (last_generated_at, last_generated_age) = match registry.last_updated() {
            Some(at) => (
                Some(at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
                format_datetime_age(at),
            ),
            None => (None, "never".to_string()),
        };

        let report = StatusReport {
            app: bp.app.name,
            signal,
            files,
            last_generated_at,
            last_generated_age,
        };

        if self.json {
            print_json(report)?;
            return Ok(());
        }
        print_table(report);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct StatusReport {
    app: String,
    signal: DriftSignal,
    files: Vec<FileDrift>,
    last_generated_at: Option<String>,
    last_generated_age: String,
}

#[derive(Serialize)]
struct StatusReportJson {
    app: String,
    signal: String,
    detail: String,
    summary: StatusSummaryJson,
    last_generated_at: Option<String>,
    files: Vec<FileStateJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    managed: usize,
    drifted: usize,
    missing: usize,
    untracked: usize,
}

#[derive(Serialize)]
struct FileStateJson {
    path: String,
    state: String,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "state")]
    state: String,
}

fn count_state(files: &[FileDrift], state: FileState) -> usize {
    files.iter().filter(|f| f.state == state).count()
}

fn print_json(report: StatusReport) -> Result<()> {
    let payload = StatusReportJson {
        app: report.app,
        signal: signal_key(&report.signal).to_string(),
        detail: signal_detail(&report.signal),
        summary: StatusSummaryJson {
            managed: report.files.len(),
            drifted: count_state(&report.files, FileState::Drifted),
            missing: count_state(&report.files, FileState::Missing),
            untracked: count_state(&report.files, FileState::Untracked),
        },
        last_generated_at: report.last_generated_at,
        files: report
            .files
            .into_iter()
            .map(|f| FileStateJson {
                path: f.rel_path,
                state: state_key(f.state).to_string(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(report: StatusReport) {
    println!(
        "Armature v{} | app '{}' | {} managed files | {} drifted | last generated {}",
        env!("CARGO_PKG_VERSION"),
        report.app,
        report.files.len(),
        count_state(&report.files, FileState::Drifted),
        report.last_generated_age,
    );

    let separator = "■".repeat(67).bright_black().to_string();
    println!("{separator}");
    println!(
        "Indicators: {} CURRENT  {} DRIFTED  {} MISSING  {} UNTRACKED",
        state_indicator(FileState::Current),
        state_indicator(FileState::Drifted),
        state_indicator(FileState::Missing),
        state_indicator(FileState::Untracked),
    );
    println!("{separator}");
    println!(
        "{} {} — {}",
        signal_indicator(&report.signal),
        signal_label(&report.signal).bold(),
        signal_detail(&report.signal),
    );

    if !report.files.is_empty() {
        let rows: Vec<StatusTableRow> = report
            .files
            .iter()
            .map(|f| StatusTableRow {
                file: f.rel_path.clone(),
                state: state_label(f.state).to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    match report.signal {
        DriftSignal::Current => {}
        DriftSignal::NeverGenerated => {
            println!("Run 'armature generate' to create the project files.");
        }
        _ => {
            println!("Run 'armature diff' to inspect pending changes, then 'armature generate'.");
        }
    }
}

fn signal_key(signal: &DriftSignal) -> &'static str {
    match signal {
        DriftSignal::NeverGenerated => "never_generated",
        DriftSignal::Missing { .. } => "missing",
        DriftSignal::BlueprintChanged { .. } => "blueprint_changed",
        DriftSignal::Drifted { .. } => "drifted",
        DriftSignal::Untracked { .. } => "untracked",
        DriftSignal::Current => "current",
    }
}

fn signal_label(signal: &DriftSignal) -> &'static str {
    match signal {
        DriftSignal::NeverGenerated => "NEVER GENERATED",
        DriftSignal::Missing { .. } => "MISSING",
        DriftSignal::BlueprintChanged { .. } => "BLUEPRINT CHANGED",
        DriftSignal::Drifted { .. } => "DRIFTED",
        DriftSignal::Untracked { .. } => "UNTRACKED",
        DriftSignal::Current => "CURRENT",
    }
}

fn signal_indicator(signal: &DriftSignal) -> String {
    match signal {
        DriftSignal::NeverGenerated => "■".bright_black().bold().to_string(),
        DriftSignal::Missing { .. } => "■".cyan().bold().to_string(),
        DriftSignal::BlueprintChanged { .. } => "■".yellow().bold().to_string(),
        DriftSignal::Drifted { .. } => "■".red().bold().to_string(),
        DriftSignal::Untracked { .. } => "■".magenta().bold().to_string(),
        DriftSignal::Current => "■".green().bold().to_string(),
    }
}

fn signal_detail(signal: &DriftSignal) -> String {
    match signal {
        DriftSignal::NeverGenerated => "no baseline registry yet".to_string(),
        DriftSignal::Missing { files } => format!("{} deleted", summarize_files(files)),
        DriftSignal::BlueprintChanged { reason } => reason.clone(),
        DriftSignal::Drifted { files } => format!("{} edited", summarize_files(files)),
        DriftSignal::Untracked { files } => format!("{} untracked", summarize_files(files)),
        DriftSignal::Current => "up to date".to_string(),
    }
}

fn state_key(state: FileState) -> &'static str {
    match state {
        FileState::Current => "current",
        FileState::Drifted => "drifted",
        FileState::Missing => "missing",
        FileState::Untracked => "untracked",
    }
}

fn state_label(state: FileState) -> &'static str {
    match state {
        FileState::Current => "CURRENT",
        FileState::Drifted => "DRIFTED",
        FileState::Missing => "MISSING",
        FileState::Untracked => "UNTRACKED",
    }
}

fn state_indicator(state: FileState) -> String {
    match state {
        FileState::Current => "■".green().bold().to_string(),
        FileState::Drifted => "■".red().bold().to_string(),
        FileState::Missing => "■".cyan().bold().to_string(),
        FileState::Untracked => "■".magenta().bold().to_string(),
    }
}

fn summarize_files(files: &[String]) -> String {
    if files.is_empty() {
        return "unknown file".to_string();
    }

    let mut names: Vec<String> = files.iter().take(2).cloned().collect();
    if files.len() > names.len() {
        names.push(format!("+{} more", files.len() - names.len()));
    }
    names.join(", ")
}
