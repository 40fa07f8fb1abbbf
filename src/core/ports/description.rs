use indexmap::IndexMap;
use serde::Serialize;

use crate::core::values::Value;

/// Reserved key holding namespace-level attributes in a description
pub const ATTRS_KEY: &str = "_attrs";

/// Stringified attributes of a leaf port
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortDescription {
    pub name: String,
    pub required: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Namespace-level attributes, stored under [`ATTRS_KEY`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceAttrs {
    pub default: Option<Value>,
    pub dynamic: bool,
    pub valid_type: Option<String>,
    pub required: String,
    pub help: Option<String>,
}

/// Description of a namespace and, recursively, its children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceDescription {
    #[serde(rename = "_attrs")]
    pub attrs: NamespaceAttrs,
    #[serde(flatten)]
    pub ports: IndexMap<String, Description>,
}

/// Introspection snapshot of any port node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Description {
    Port(PortDescription),
    Namespace(NamespaceDescription),
}

impl Description {
    pub fn as_port(&self) -> Option<&PortDescription> {
        match self {
            Description::Port(port) => Some(port),
            Description::Namespace(_) => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&NamespaceDescription> {
        match self {
            Description::Namespace(namespace) => Some(namespace),
            Description::Port(_) => None,
        }
    }

    /// Render as a JSON value for display tooling
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
