//! Metadata Composer - Merges user metadata with the project version
//!
//! The user supplies a free-form `{"key":"value"}` JSON object; the composer
//! stamps the computed project version onto it before submission. The
//! `version` key is always overwritten, even when the user already set one.

use crate::core::error::SyncError;
use serde_json::{Map, Value};

/// Composer for the `data` form part of the registration request
pub struct MetadataComposer;

impl Default for MetadataComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataComposer {
    /// Create a new MetadataComposer
    pub fn new() -> Self {
        Self
    }

    /// Merge the raw metadata JSON with the project version
    ///
    /// Fails when the text is not valid JSON or not a JSON object (an array
    /// or scalar is rejected). Key order beyond presence is not guaranteed.
    pub fn compose(&self, raw_metadata: &str, version: &str) -> Result<String, SyncError> {
        let value: Value =
            serde_json::from_str(raw_metadata).map_err(|e| SyncError::InvalidMetadata {
                message: e.to_string(),
            })?;

        let mut object: Map<String, Value> = match value {
            Value::Object(map) => map,
            other => {
                return Err(SyncError::InvalidMetadata {
                    message: format!("expected a JSON object, got {}", json_type_name(&other)),
                });
            }
        };

        object.insert(
            "version".to_string(),
            Value::String(version.to_string()),
        );

        serde_json::to_string(&Value::Object(object)).map_err(|e| SyncError::InvalidMetadata {
            message: e.to_string(),
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
