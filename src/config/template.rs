//! Request template loading
//!
//! The template is the base snapshot request every export starts from. It
//! is resolved once at startup from an inline document or a JSON file.

use super::schema::TemplateConfig;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use serde_json::{Map, Value};
use std::path::Path;

/// Base snapshot request, always a JSON object
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTemplate {
    fields: Map<String, Value>,
}

impl ExportTemplate {
    /// Wrap an already-parsed document
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless the document is a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ExporterError::Configuration(format!(
                "Template must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Read the template from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExporterError::Configuration(format!(
                "Template file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExporterError::Configuration(format!(
                "Failed to read template file {}: {e}",
                path.display()
            ))
        })?;

        let value: Value = serde_json::from_str(&contents).map_err(|e| {
            ExporterError::Configuration(format!(
                "Template file {} is not valid JSON: {e}",
                path.display()
            ))
        })?;

        Self::from_value(value)
    }

    /// Resolve the template from configuration, inline first
    pub fn resolve(config: &TemplateConfig) -> Result<Self> {
        if let Some(inline) = &config.inline {
            tracing::debug!("Using inline request template");
            return Self::from_value(inline.clone());
        }

        match config.path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => {
                tracing::debug!(path = %path, "Loading request template from file");
                Self::from_file(path)
            }
            _ => Err(ExporterError::Configuration(
                "Config JSON couldn't be found: set template.path, template.inline or CONFIG_JSON"
                    .to_string(),
            )),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
