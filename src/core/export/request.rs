//! Request building - template plus descriptor properties
//!
//! Each request is an independent deep copy of the template; the template
//! itself is never touched.

use crate::config::{ExportTemplate, MergeStrategy};
use crate::domain::{ExportDescriptor, Result};
use serde_json::{Map, Value};

/// Field written by [`MergeStrategy::LastKeyWins`]
pub const LEGACY_OVERRIDE_FIELD: &str = "key";

/// A serialized snapshot request, ready to submit
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    /// Label of the descriptor it was built from, for logging
    pub label: String,

    /// JSON request body
    pub body: String,
}

/// Builds snapshot requests from the template
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    template: ExportTemplate,
    strategy: MergeStrategy,
}

impl RequestBuilder {
    pub fn new(template: ExportTemplate, strategy: MergeStrategy) -> Self {
        Self { template, strategy }
    }

    /// Apply a descriptor's properties to a fresh copy of the template
    pub fn merge(&self, descriptor: &ExportDescriptor) -> Map<String, Value> {
        let mut document = self.template.fields().clone();
        for (key, value) in &descriptor.properties {
            match self.strategy {
                MergeStrategy::PerKey => {
                    document.insert(key.clone(), value.clone());
                }
                MergeStrategy::LastKeyWins => {
                    document.insert(LEGACY_OVERRIDE_FIELD.to_string(), value.clone());
                }
            }
        }
        document
    }

    /// Build the serialized request for one descriptor
    pub fn build(&self, descriptor: &ExportDescriptor) -> Result<ExportRequest> {
        let body = serde_json::to_string(&self.merge(descriptor))?;
        Ok(ExportRequest {
            label: descriptor.label(),
            body,
        })
    }

    /// Build requests for every descriptor, preserving order
    pub fn build_all(&self, descriptors: &[ExportDescriptor]) -> Result<Vec<ExportRequest>> {
        descriptors.iter().map(|d| self.build(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CountryCode;
    use serde_json::json;

    fn template() -> ExportTemplate {
        ExportTemplate::from_value(json!({
            "iso3": null,
            "dataset": {"dataset_prefix": "hotosm", "dataset_folder": "HOTOSM"},
            "categories": [{"Buildings": {"types": ["polygons"]}}]
        }))
        .unwrap()
    }

    fn descriptor(value: Value) -> ExportDescriptor {
        match value {
            Value::Object(properties) => ExportDescriptor::new(properties),
            _ => panic!("descriptor properties must be an object"),
        }
    }

    fn parse(request: &ExportRequest) -> Value {
        serde_json::from_str(&request.body).unwrap()
    }

    #[test]
    fn test_single_key_overrides_field_and_keeps_the_rest() {
        let builder = RequestBuilder::new(template(), MergeStrategy::PerKey);
        let code = CountryCode::new("KEN").unwrap();
        let request = builder.build(&ExportDescriptor::for_country(&code)).unwrap();

        let body = parse(&request);
        assert_eq!(body["iso3"], "KEN");
        assert_eq!(body["dataset"], template().fields()["dataset"]);
        assert_eq!(body["categories"], template().fields()["categories"]);
        assert_eq!(request.label, "KEN");
    }

    #[test]
    fn test_empty_properties_yield_the_template() {
        for strategy in [MergeStrategy::PerKey, MergeStrategy::LastKeyWins] {
            let builder = RequestBuilder::new(template(), strategy);
            let request = builder.build(&ExportDescriptor::default()).unwrap();
            assert_eq!(parse(&request), Value::Object(template().fields().clone()));
        }
    }

    #[test]
    fn test_per_key_merges_every_property() {
        let builder = RequestBuilder::new(template(), MergeStrategy::PerKey);
        let request = builder
            .build(&descriptor(json!({"iso3": "NPL", "hdx_upload": true})))
            .unwrap();

        let body = parse(&request);
        assert_eq!(body["iso3"], "NPL");
        assert_eq!(body["hdx_upload"], true);
        assert!(body.get(LEGACY_OVERRIDE_FIELD).is_none());
    }

    #[test]
    fn test_last_key_wins_writes_single_field() {
        let builder = RequestBuilder::new(template(), MergeStrategy::LastKeyWins);
        let request = builder
            .build(&descriptor(json!({"iso3": "NPL", "dataset_title": "Nepal"})))
            .unwrap();

        let body = parse(&request);
        assert_eq!(body[LEGACY_OVERRIDE_FIELD], "Nepal");
        assert_eq!(body["iso3"], Value::Null);
    }

    #[test]
    fn test_template_is_not_mutated() {
        let builder = RequestBuilder::new(template(), MergeStrategy::PerKey);
        builder
            .build(&descriptor(json!({"iso3": "UGA", "dataset": "replaced"})))
            .unwrap();

        let again = builder.build(&ExportDescriptor::default()).unwrap();
        assert_eq!(parse(&again), Value::Object(template().fields().clone()));
    }

    #[test]
    fn test_build_all_preserves_order() {
        let builder = RequestBuilder::new(template(), MergeStrategy::PerKey);
        let descriptors: Vec<_> = ["KEN", "UGA", "TZA"]
            .iter()
            .map(|c| ExportDescriptor::for_country(&CountryCode::new(c).unwrap()))
            .collect();

        let labels: Vec<_> = builder
            .build_all(&descriptors)
            .unwrap()
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["KEN", "UGA", "TZA"]);
    }
}
