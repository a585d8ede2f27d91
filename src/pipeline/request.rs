//! Invocation input parsing.

use serde_json::Value;

use crate::error::ConfigError;

/// A validated obfuscation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObfuscationRequest {
    pub file_to_obfuscate: String,
    pub pii_fields: Vec<String>,
}

impl ObfuscationRequest {
    pub fn new(file_to_obfuscate: &str, pii_fields: &[&str]) -> Self {
        Self {
            file_to_obfuscate: file_to_obfuscate.to_string(),
            pii_fields: pii_fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse and validate the invocation JSON.
    ///
    /// Both keys must be present before either is type-checked, so a
    /// document missing `pii_fields` always reports that key.
    pub fn parse(input_json: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_json::from_str(input_json)?;
        let Value::Object(mut fields) = document else {
            return Err(ConfigError::NotAnObject);
        };

        let file = fields
            .remove("file_to_obfuscate")
            .ok_or(ConfigError::MissingFileToObfuscate)?;
        let pii = fields
            .remove("pii_fields")
            .ok_or(ConfigError::MissingPiiFields)?;

        let Value::String(file_to_obfuscate) = file else {
            return Err(ConfigError::InvalidFileToObfuscate);
        };

        let Value::Array(items) = pii else {
            return Err(ConfigError::InvalidPiiFields);
        };
        let pii_fields = items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                _ => Err(ConfigError::InvalidPiiFields),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            file_to_obfuscate,
            pii_fields,
        })
    }
}
