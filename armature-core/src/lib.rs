//! Armature core library — blueprint types, loading, workspace layout, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and blueprint structs
//! - [`error`] — [`BlueprintError`]
//! - [`blueprint`] — load / save / init / validate
//! - [`workspace`] — [`Workspace`] project-rooted path layout

pub mod blueprint;
pub mod error;
pub mod types;
pub mod workspace;

pub use error::BlueprintError;
pub use types::{Action, AppInfo, Blueprint, Field, FieldType, Resource, ResourceName};
pub use workspace::Workspace;
