//! Export descriptors - one unit of export work per entity

use super::ids::CountryCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property name used for explicit country exports
pub const ISO3_PROPERTY: &str = "iso3";

/// A single entity (country or scheduled item) to request an extraction for
///
/// Scheduled exports arrive as GeoJSON features; only their `properties`
/// matter here. Property order is preserved as received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportDescriptor {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

impl ExportDescriptor {
    /// Create a descriptor from a property mapping
    pub fn new(properties: Map<String, Value>) -> Self {
        Self { properties }
    }

    /// Descriptor for an explicitly requested country: `{iso3: code}`
    pub fn for_country(code: &CountryCode) -> Self {
        let mut properties = Map::new();
        properties.insert(
            ISO3_PROPERTY.to_string(),
            Value::String(code.as_str().to_string()),
        );
        Self { properties }
    }

    /// Short human-readable label built from the property values
    pub fn label(&self) -> String {
        if self.properties.is_empty() {
            return "<no properties>".to_string();
        }
        self.properties
            .values()
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}
