//! Static tool catalogs.
//!
//! Each adapter declares its tools as a closed enum implementing [`ToolSet`]. The enum owns the
//! mapping to a `'static` [`ToolDescriptor`], which is what `tools/list` renders and what the
//! dispatcher validates arguments against.

use crate::semantics::annotations_for_method;
use reqwest::Method;
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::sync::Arc;

/// JSON type of a declared tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Object,
}

impl ParamType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }

    /// Whether a JSON value is acceptable for this parameter type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub description: &'static str,
    pub required: bool,
    /// Allowed values; empty means unrestricted.
    pub allowed: &'static [&'static str],
}

impl ParamSpec {
    #[must_use]
    pub const fn required(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            allowed: &[],
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            allowed: &[],
        }
    }

    #[must_use]
    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    fn schema(&self) -> Value {
        let mut schema = json!({
            "type": self.kind.as_str(),
            "description": self.description,
        });
        if !self.allowed.is_empty() {
            schema["enum"] = json!(self.allowed);
        }
        schema
    }
}

/// Immutable description of one tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub method: Method,
    pub params: &'static [ParamSpec],
}

impl ToolDescriptor {
    /// JSON Schema for the tool arguments (`required` only when non-empty).
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for p in self.params {
            properties.insert(p.name.to_string(), p.schema());
        }

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    /// Render as an MCP `Tool`.
    #[must_use]
    pub fn to_tool(&self) -> Tool {
        let schema_obj = self
            .input_schema()
            .as_object()
            .cloned()
            .unwrap_or_else(JsonObject::new);
        let mut tool = Tool::new(self.name, self.description, Arc::new(schema_obj));
        tool.annotations = Some(annotations_for_method(&self.method));
        tool
    }
}

/// A closed set of tools exposed by one adapter.
pub trait ToolSet: Copy + Send + Sync + 'static {
    /// Every variant, in catalog order.
    const ALL: &'static [Self];

    fn descriptor(self) -> &'static ToolDescriptor;

    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.descriptor().name == name)
    }

    #[must_use]
    fn name(self) -> &'static str {
        self.descriptor().name
    }
}

/// The catalog of a tool set as MCP tools, in declaration order.
#[must_use]
pub fn list_tools<T: ToolSet>() -> Vec<Tool> {
    T::ALL.iter().map(|t| t.descriptor().to_tool()).collect()
}
