//! # armature-render
//!
//! Tera-based template engine that renders source artifacts from blueprint
//! data. Rendering is deterministic: the same blueprint always produces
//! byte-identical output, which the sync layer relies on when it compares
//! content hashes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use armature_render::Renderer;
//! use armature_core::Blueprint;
//!
//! fn render_all(blueprint: &Blueprint) {
//!     if let Ok(renderer) = Renderer::new() {
//!         if let Ok(artifacts) = renderer.render_all(blueprint) {
//!             for artifact in artifacts {
//!                 println!("{}: {} bytes", artifact.rel_path, artifact.content.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{pascal_case, AppContext, ResourceContext};
pub use engine::{artifact_paths, Artifact, GeneratorKind, Renderer, TemplateEngine};
pub use error::RenderError;
