//! Domain types for the armature blueprint.
//!
//! The blueprint (`armature.yaml`) declares an application and its resources;
//! everything else the tool does is derived from these types. All types are
//! serializable/deserializable via serde + serde_yaml.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a resource declared in the blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName(pub String);

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ResourceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The declared type of a resource field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Text,
    Int,
    Float,
    Bool,
    Datetime,
    Uuid,
}

impl FieldType {
    /// TypeScript type the renderer emits for this field.
    pub fn ts_type(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::Text | FieldType::Uuid => "string",
            FieldType::Int | FieldType::Float => "number",
            FieldType::Bool => "boolean",
            FieldType::Datetime => "Date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Text => write!(f, "text"),
            FieldType::Int => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Bool => write!(f, "bool"),
            FieldType::Datetime => write!(f, "datetime"),
            FieldType::Uuid => write!(f, "uuid"),
        }
    }
}

/// A CRUD action a resource exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    List,
    Show,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Every action, in route order.
    pub fn all() -> [Action; 5] {
        [
            Action::List,
            Action::Show,
            Action::Create,
            Action::Update,
            Action::Delete,
        ]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::List => write!(f, "list"),
            Action::Show => write!(f, "show"),
            Action::Create => write!(f, "create"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

fn default_actions() -> Vec<Action> {
    Action::all().to_vec()
}

// ---------------------------------------------------------------------------
// Blueprint structs
// ---------------------------------------------------------------------------

/// A single field on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A resource: one entity the generator produces artifacts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: ResourceName,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Omitted in YAML means all five CRUD actions.
    #[serde(default = "default_actions")]
    pub actions: Vec<Action>,
}

/// Application-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Root of the armature blueprint document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub app: AppInfo,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
