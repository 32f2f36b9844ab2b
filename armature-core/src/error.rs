//! Error types for armature-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from blueprint operations.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse blueprint at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The blueprint file did not exist at the expected path.
    #[error("blueprint not found at {path}")]
    BlueprintNotFound { path: PathBuf },

    /// `app.name` was empty or whitespace.
    #[error("app name must not be empty")]
    EmptyAppName,

    /// Two resources share the same name.
    #[error("duplicate resource name: {name}")]
    DuplicateResource { name: String },

    /// A resource or field name is not a lower_snake_case identifier.
    #[error("invalid identifier `{name}`: use lower_snake_case (letters, digits, underscores)")]
    InvalidIdentifier { name: String },
}
