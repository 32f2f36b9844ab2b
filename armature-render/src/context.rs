//! Template contexts — serializable rendering payloads built from [`Blueprint`].

use serde::{Deserialize, Serialize};

use armature_core::types::{AppInfo, Blueprint, Resource};

use crate::error::RenderError;

/// Rendering payload for one resource (controller/service/store/view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContext {
    pub app: AppCtx,
    pub resource: ResourceCtx,
}

/// Rendering payload for app-level artifacts (routes, api index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppContext {
    pub app: AppCtx,
    pub resources: Vec<ResourceCtx>,
}

/// Application header shared by every template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCtx {
    pub name: String,
    pub version: String,
    pub generator_version: String,
}

/// One resource with the name forms the templates interpolate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCtx {
    /// lower_snake name as declared.
    pub name: String,
    /// PascalCase form for type and class names.
    pub pascal: String,
    /// Naive plural used for collections.
    pub plural: String,
    /// URL path for the resource's routes.
    pub route: String,
    pub fields: Vec<FieldCtx>,
    pub actions: Vec<String>,
}

/// One field with its TypeScript type already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCtx {
    pub name: String,
    pub ts_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl AppCtx {
    fn from_app(app: &AppInfo) -> Self {
        AppCtx {
            name: app.name.clone(),
            version: app.version.clone().unwrap_or_else(|| "0.0.0".to_string()),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ResourceCtx {
    fn from_resource(resource: &Resource) -> Self {
        let name = resource.name.0.clone();
        let plural = pluralize(&name);
        ResourceCtx {
            pascal: pascal_case(&name),
            route: format!("/{}", plural.replace('_', "-")),
            plural,
            fields: resource
                .fields
                .iter()
                .map(|f| FieldCtx {
                    name: f.name.clone(),
                    ts_type: f.field_type.ts_type().to_string(),
                    required: f.required,
                    default: f.default.clone(),
                })
                .collect(),
            actions: resource.actions.iter().map(|a| a.to_string()).collect(),
            name,
        }
    }
}

impl ResourceContext {
    /// Build the payload for one resource of a blueprint.
    pub fn new(blueprint: &Blueprint, resource: &Resource) -> Self {
        ResourceContext {
            app: AppCtx::from_app(&blueprint.app),
            resource: ResourceCtx::from_resource(resource),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

impl AppContext {
    /// Build the payload for app-level artifacts.
    pub fn from_blueprint(blueprint: &Blueprint) -> Self {
        AppContext {
            app: AppCtx::from_app(&blueprint.app),
            resources: blueprint
                .resources
                .iter()
                .map(ResourceCtx::from_resource)
                .collect(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// `order_item` → `OrderItem`.
pub fn pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn pluralize(name: &str) -> String {
    if name.ends_with('s') {
        format!("{name}es")
    } else {
        format!("{name}s")
    }
}
