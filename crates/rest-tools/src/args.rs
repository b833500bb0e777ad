//! Tool-call arguments.

use crate::catalog::{ParamType, ToolDescriptor};
use crate::error::{Result, ToolError};
use serde_json::{Map, Value};

/// The argument bag of one `tools/call`, already checked against the tool's declared params.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    inner: Map<String, Value>,
}

impl Arguments {
    #[must_use]
    pub fn new(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// Validate `raw` against `tool` and wrap it.
    ///
    /// Rejects missing (or `null`) required params, blank required strings, wrongly typed
    /// declared params, and values outside a declared `enum`. Undeclared keys are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] describing the first offending parameter.
    pub fn validated(tool: &ToolDescriptor, raw: Map<String, Value>) -> Result<Self> {
        for param in tool.params {
            let value = raw.get(param.name).filter(|v| !v.is_null());
            let Some(value) = value else {
                if param.required {
                    return Err(ToolError::InvalidArguments(format!(
                        "missing required parameter '{}'",
                        param.name
                    )));
                }
                continue;
            };

            if !param.kind.accepts(value) {
                return Err(ToolError::InvalidArguments(format!(
                    "parameter '{}' must be of type {}",
                    param.name,
                    param.kind.as_str()
                )));
            }

            if param.required
                && matches!(param.kind, ParamType::String)
                && value.as_str().is_some_and(|s| s.trim().is_empty())
            {
                return Err(ToolError::InvalidArguments(format!(
                    "parameter '{}' must not be empty",
                    param.name
                )));
            }

            if !param.allowed.is_empty()
                && !value
                    .as_str()
                    .is_some_and(|s| param.allowed.contains(&s))
            {
                return Err(ToolError::InvalidArguments(format!(
                    "parameter '{}' must be one of: {}",
                    param.name,
                    param.allowed.join(", ")
                )));
            }
        }

        Ok(Self { inner: raw })
    }

    /// A present, non-null argument.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.get(name).filter(|v| !v.is_null())
    }

    /// A string argument that must be present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] if the argument is absent, blank or not a string.
    pub fn required_str(&self, name: &str) -> Result<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments(format!("missing required parameter '{name}'"))
            })
    }

    /// A non-empty string argument.
    #[must_use]
    pub fn optional_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn optional_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// All arguments as a JSON object.
    #[must_use]
    pub fn to_body(&self) -> Value {
        Value::Object(self.inner.clone())
    }

    /// All arguments except `excluded`, as a JSON object.
    #[must_use]
    pub fn to_body_without(&self, excluded: &str) -> Value {
        let mut body = self.inner.clone();
        body.remove(excluded);
        Value::Object(body)
    }
}
