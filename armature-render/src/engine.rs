//! Tera rendering engine — [`GeneratorKind`] enum and [`Renderer`].
//!
//! # Path mapping
//!
//! | Kind      | Output path (relative to the project root)      |
//! |-----------|--------------------------------------------------|
//! | Controller| `src/controllers/<name>_controller.ts`          |
//! | Service   | `src/services/<name>_service.ts`                |
//! | Store     | `src/stores/<name>_store.ts`                    |
//! | View      | `src/views/<Pascal>View.vue`                    |
//! | Routes    | `src/routes.ts`                                 |
//! | ApiIndex  | `src/api/index.ts`                              |
//!
//! Per-resource kinds emit one file per blueprint resource; app-level kinds
//! emit exactly one file per project.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use armature_core::types::Blueprint;

use crate::context::{pascal_case, AppContext, ResourceContext};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("controller.ts.tera", include_str!("templates/controller.ts.tera")),
    ("service.ts.tera", include_str!("templates/service.ts.tera")),
    ("store.ts.tera", include_str!("templates/store.ts.tera")),
    ("view.vue.tera", include_str!("templates/view.vue.tera")),
    ("routes.ts.tera", include_str!("templates/routes.ts.tera")),
    ("api_index.ts.tera", include_str!("templates/api_index.ts.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// GeneratorKind
// ---------------------------------------------------------------------------

/// All artifact kinds the generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    Controller,
    Service,
    Store,
    View,
    Routes,
    ApiIndex,
}

impl GeneratorKind {
    /// All kinds in a stable order.
    pub fn all() -> &'static [GeneratorKind] {
        &[
            GeneratorKind::Controller,
            GeneratorKind::Service,
            GeneratorKind::Store,
            GeneratorKind::View,
            GeneratorKind::Routes,
            GeneratorKind::ApiIndex,
        ]
    }

    /// Kinds rendered once per blueprint resource.
    pub fn per_resource() -> &'static [GeneratorKind] {
        &[
            GeneratorKind::Controller,
            GeneratorKind::Service,
            GeneratorKind::Store,
            GeneratorKind::View,
        ]
    }

    /// Kinds rendered once per project.
    pub fn app_level() -> &'static [GeneratorKind] {
        &[GeneratorKind::Routes, GeneratorKind::ApiIndex]
    }

    /// Embedded template this kind renders.
    pub fn template_name(&self) -> &'static str {
        match self {
            GeneratorKind::Controller => "controller.ts.tera",
            GeneratorKind::Service => "service.ts.tera",
            GeneratorKind::Store => "store.ts.tera",
            GeneratorKind::View => "view.vue.tera",
            GeneratorKind::Routes => "routes.ts.tera",
            GeneratorKind::ApiIndex => "api_index.ts.tera",
        }
    }

    /// Output paths for this kind, relative to the project root with forward
    /// slashes — one per resource for per-resource kinds, exactly one for
    /// app-level kinds. Order follows the blueprint's resource order.
    pub fn output_paths(&self, blueprint: &Blueprint) -> Vec<String> {
        let per_resource = |f: &dyn Fn(&str) -> String| -> Vec<String> {
            blueprint.resources.iter().map(|r| f(&r.name.0)).collect()
        };
        match self {
            GeneratorKind::Controller => {
                per_resource(&|name| format!("src/controllers/{name}_controller.ts"))
            }
            GeneratorKind::Service => {
                per_resource(&|name| format!("src/services/{name}_service.ts"))
            }
            GeneratorKind::Store => per_resource(&|name| format!("src/stores/{name}_store.ts")),
            GeneratorKind::View => {
                per_resource(&|name| format!("src/views/{}View.vue", pascal_case(name)))
            }
            GeneratorKind::Routes => vec!["src/routes.ts".to_string()],
            GeneratorKind::ApiIndex => vec!["src/api/index.ts".to_string()],
        }
    }
}

/// Every output path a blueprint produces, in kind-major order.
pub fn artifact_paths(blueprint: &Blueprint) -> Vec<String> {
    GeneratorKind::all()
        .iter()
        .flat_map(|kind| kind.output_paths(blueprint))
        .collect()
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering templates with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded
/// defaults. Template names are normalised to lowercase relative paths.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render one named template with the supplied context.
    pub fn render(&self, name: &str, ctx: &tera::Context) -> Result<String, RenderError> {
        Ok(self.tera.render(name, ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the project root, forward slashes.
    pub rel_path: String,
    pub content: String,
}

/// Renders every artifact a blueprint declares.
///
/// Create once with [`Renderer::new`] and reuse; rendering the same
/// blueprint twice produces identical output.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_template_dir(None)
    }

    /// Construct a [`Renderer`] that also loads user template overrides.
    pub fn with_template_dir(dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(dir)? })
    }

    /// Render all artifacts for `blueprint`, kind-major then blueprint
    /// resource order.
    pub fn render_all(&self, blueprint: &Blueprint) -> Result<Vec<Artifact>, RenderError> {
        let mut artifacts = Vec::new();

        let resource_ctxs: Vec<tera::Context> = blueprint
            .resources
            .iter()
            .map(|r| ResourceContext::new(blueprint, r).to_tera_context())
            .collect::<Result<_, _>>()?;
        for kind in GeneratorKind::per_resource() {
            for (rel_path, tera_ctx) in
                kind.output_paths(blueprint).into_iter().zip(&resource_ctxs)
            {
                artifacts.push(Artifact {
                    rel_path,
                    content: self.engine.render(kind.template_name(), tera_ctx)?,
                });
            }
        }

        let app_ctx = AppContext::from_blueprint(blueprint).to_tera_context()?;
        for kind in GeneratorKind::app_level() {
            for rel_path in kind.output_paths(blueprint) {
                artifacts.push(Artifact {
                    rel_path,
                    content: self.engine.render(kind.template_name(), &app_ctx)?,
                });
            }
        }
        Ok(artifacts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
