//! Blueprint load / save / init / validate.
//!
//! Every function takes the [`Workspace`] by reference; nothing here reads
//! the environment or a global root.

use std::path::PathBuf;

use crate::error::BlueprintError;
use crate::types::{Blueprint, Resource};
use crate::workspace::Workspace;

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

/// Load and validate `<root>/armature.yaml`.
///
/// Returns `BlueprintError::BlueprintNotFound` if absent,
/// `BlueprintError::Parse` (with path + line context) if malformed YAML,
/// or a validation error for a well-formed but inconsistent blueprint.
pub fn load_at(ws: &Workspace) -> Result<Blueprint, BlueprintError> {
    let path = ws.blueprint_path();
    if !path.exists() {
        return Err(BlueprintError::BlueprintNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    let blueprint: Blueprint =
        serde_yaml::from_str(&contents).map_err(|e| BlueprintError::Parse { path, source: e })?;
    validate(&blueprint)?;
    Ok(blueprint)
}

// ---------------------------------------------------------------------------
// 2. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save a blueprint to `<root>/armature.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `rename`. The `.tmp` lives
/// in the same directory as the target (same filesystem — no EXDEV).
pub fn save_at(ws: &Workspace, blueprint: &Blueprint) -> Result<(), BlueprintError> {
    validate(blueprint)?;
    let path = ws.blueprint_path();
    let tmp_path = path.with_extension("yaml.tmp");

    let yaml = serde_yaml::to_string(blueprint)?;
    std::fs::write(&tmp_path, yaml)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// 3. Init
// ---------------------------------------------------------------------------

/// Result of [`init_at`].
#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created { path: PathBuf },
    AlreadyExists { path: PathBuf },
}

/// Scaffold a starter `armature.yaml` at the workspace root.
///
/// Idempotent: an existing blueprint is never overwritten.
pub fn init_at(ws: &Workspace, app_name: &str) -> Result<InitOutcome, BlueprintError> {
    let path = ws.blueprint_path();
    if path.exists() {
        return Ok(InitOutcome::AlreadyExists { path });
    }
    if app_name.trim().is_empty() {
        return Err(BlueprintError::EmptyAppName);
    }

    let starter = format!(
        "app:\n\
         \x20 name: {app_name}\n\
         \x20 version: 0.1.0\n\
         resources:\n\
         \x20 - name: item\n\
         \x20   fields:\n\
         \x20     - {{ name: title, type: string, required: true }}\n\
         \x20     - {{ name: created, type: datetime }}\n\
         \x20   # actions defaults to [list, show, create, update, delete]\n"
    );
    let tmp_path = path.with_extension("yaml.tmp");
    std::fs::write(&tmp_path, starter)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(InitOutcome::Created { path })
}

// ---------------------------------------------------------------------------
// 4. Validation
// ---------------------------------------------------------------------------

/// Reject blueprints the renderer cannot work with.
///
/// Checks: non-empty app name, unique resource names, lower_snake_case
/// resource and field identifiers. Returns the first problem found.
pub fn validate(blueprint: &Blueprint) -> Result<(), BlueprintError> {
    if blueprint.app.name.trim().is_empty() {
        return Err(BlueprintError::EmptyAppName);
    }
    let mut seen: Vec<&str> = Vec::new();
    for resource in &blueprint.resources {
        validate_resource(resource)?;
        if seen.contains(&resource.name.0.as_str()) {
            return Err(BlueprintError::DuplicateResource {
                name: resource.name.0.clone(),
            });
        }
        seen.push(&resource.name.0);
    }
    Ok(())
}

fn validate_resource(resource: &Resource) -> Result<(), BlueprintError> {
    if !is_snake_ident(&resource.name.0) {
        return Err(BlueprintError::InvalidIdentifier {
            name: resource.name.0.clone(),
        });
    }
    for field in &resource.fields {
        if !is_snake_ident(&field.name) {
            return Err(BlueprintError::InvalidIdentifier {
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}

fn is_snake_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
