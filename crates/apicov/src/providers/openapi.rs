//! OpenAPI contract loader.
//!
//! Only `paths.<path>.<method>.responses` is read. Response keys count when
//! they are purely numeric; `default` and range keys such as `2XX` are
//! dropped. JSON documents load too, JSON being a subset of YAML.

use super::ContractProvider;
use crate::endpoint::{is_supported_method, DocumentedCodes, EndpointKey, StatusCode};
use crate::result::{ApicovError, ApicovResult};
use serde_yaml_ng::Value;
use std::path::Path;

/// Documented codes read from an OpenAPI document
#[derive(Debug, Clone, Default)]
pub struct OpenApiContract {
    documented: DocumentedCodes,
}

impl OpenApiContract {
    /// Load a contract from a file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid YAML
    pub fn from_path(path: impl AsRef<Path>) -> ApicovResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match Self::from_yaml_str(&content) {
            Err(ApicovError::ContractParse { message }) => Err(ApicovError::contract(format!(
                "{}: {message}",
                path.display()
            ))),
            other => other,
        }
    }

    /// Parse a contract from YAML or JSON text
    ///
    /// # Errors
    ///
    /// Returns error if the text is not valid YAML
    pub fn from_yaml_str(content: &str) -> ApicovResult<Self> {
        let document: Value =
            serde_yaml_ng::from_str(content).map_err(|e| ApicovError::contract(e.to_string()))?;
        let documented = collect_documented(&document);
        tracing::debug!(
            endpoints = documented.len(),
            codes = documented.code_count(),
            "loaded API contract"
        );
        Ok(Self { documented })
    }

    /// Documented codes
    #[must_use]
    pub fn documented(&self) -> &DocumentedCodes {
        &self.documented
    }

    /// Consume the loader, keeping the documented codes
    #[must_use]
    pub fn into_documented(self) -> DocumentedCodes {
        self.documented
    }
}

impl ContractProvider for OpenApiContract {
    fn documented_codes(&self) -> &DocumentedCodes {
        &self.documented
    }
}

fn collect_documented(document: &Value) -> DocumentedCodes {
    let mut documented = DocumentedCodes::new();
    let Some(paths) = document.get("paths").and_then(Value::as_mapping) else {
        return documented;
    };

    for (raw_path, path_item) in paths {
        let (Some(raw_path), Some(path_item)) = (raw_path.as_str(), path_item.as_mapping()) else {
            continue;
        };
        for (method, operation) in path_item {
            let Some(method) = method.as_str().filter(|m| is_supported_method(m)) else {
                continue;
            };
            let Some(responses) = operation.get("responses").and_then(Value::as_mapping) else {
                continue;
            };
            let endpoint = EndpointKey::new(method, raw_path);
            for status in responses.iter().filter_map(|(key, _)| status_key(key)) {
                documented.insert(endpoint.clone(), status);
            }
        }
    }
    documented
}

/// `"200"` or an unquoted `200` → `Some(200)`; anything else → `None`
///
/// Numeric keys beyond the `u16` range cannot be a status code and are dropped.
fn status_key(key: &Value) -> Option<StatusCode> {
    let parsed = match key {
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| StatusCode::try_from(n).ok()),
        _ => return None,
    };
    if parsed.is_none() {
        tracing::debug!(key = ?key, "skipping response key outside the status code range");
    }
    parsed
}
