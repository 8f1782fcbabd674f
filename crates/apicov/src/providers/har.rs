//! HAR (HTTP Archive) traffic loader.
//!
//! Reads the HAR 1.2 `log.entries` array and turns every request/response
//! pair into a [`ProbeObservation`]. Only the fields the engine needs are
//! modelled; everything else in the archive is ignored, and optional fields
//! may be missing.
//!
//! ## Correlation
//!
//! Test generators tag each request with a tracing header carrying a case id.
//! The header name is matched case-insensitively; requests without it (or
//! with an empty value) become uncorrelated observations.

use super::TrafficProvider;
use crate::endpoint::{EndpointKey, ProbeObservation, StatusCode, Traffic};
use crate::result::{ApicovError, ApicovResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tracing header set by Schemathesis on every generated request
pub const DEFAULT_CASE_HEADER: &str = "X-Schemathesis-TestCaseId";

// =============================================================================
// HAR 1.2 subset
// =============================================================================

/// HAR file root structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Har {
    /// HAR log container
    pub log: HarLog,
}

impl Har {
    /// Parse HAR from a JSON string
    ///
    /// # Errors
    ///
    /// Returns error if JSON parsing fails or `log.entries` is missing
    pub fn from_json(json: &str) -> ApicovResult<Self> {
        serde_json::from_str(json).map_err(|e| ApicovError::traffic(e.to_string()))
    }

    /// Get number of entries
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.log.entries.len()
    }
}

/// HAR log structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarLog {
    /// HAR format version
    #[serde(default)]
    pub version: String,
    /// Recorded entries
    pub entries: Vec<HarEntry>,
}

/// A single request/response pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarEntry {
    /// Request details
    pub request: HarRequest,
    /// Response details
    pub response: HarResponse,
}

/// HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarRequest {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Headers
    #[serde(default)]
    pub headers: Vec<HarHeader>,
}

impl HarRequest {
    /// Value of the first header named `name` (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarResponse {
    /// HTTP status code; browsers record 0 (or -1) for aborted requests
    pub status: i64,
}

/// HTTP header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarHeader {
    /// Header name
    #[serde(default)]
    pub name: String,
    /// Header value
    #[serde(default)]
    pub value: String,
}

// =============================================================================
// Loader
// =============================================================================

/// Observed traffic read from a HAR archive
#[derive(Debug, Clone, Default)]
pub struct HarTraffic {
    traffic: Traffic,
}

impl HarTraffic {
    /// Load traffic from a file using [`DEFAULT_CASE_HEADER`]
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a HAR archive
    pub fn from_path(path: impl AsRef<Path>) -> ApicovResult<Self> {
        Self::from_path_with_header(path, DEFAULT_CASE_HEADER)
    }

    /// Load traffic from a file, correlating on `case_header`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a HAR archive
    pub fn from_path_with_header(path: impl AsRef<Path>, case_header: &str) -> ApicovResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match Self::from_json_str_with_header(&content, case_header) {
            Err(ApicovError::TrafficParse { message }) => Err(ApicovError::traffic(format!(
                "{}: {message}",
                path.display()
            ))),
            other => other,
        }
    }

    /// Parse traffic from HAR JSON using [`DEFAULT_CASE_HEADER`]
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a HAR archive
    pub fn from_json_str(json: &str) -> ApicovResult<Self> {
        Self::from_json_str_with_header(json, DEFAULT_CASE_HEADER)
    }

    /// Parse traffic from HAR JSON, correlating on `case_header`
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a HAR archive
    pub fn from_json_str_with_header(json: &str, case_header: &str) -> ApicovResult<Self> {
        let har = Har::from_json(json)?;
        Ok(Self::from_har(&har, case_header))
    }

    /// Build traffic from an already parsed archive
    #[must_use]
    pub fn from_har(har: &Har, case_header: &str) -> Self {
        let mut traffic = Traffic::new();
        let mut correlated = 0usize;

        for entry in &har.log.entries {
            let Some(status) = StatusCode::try_from(entry.response.status)
                .ok()
                .filter(|&status| status > 0)
            else {
                tracing::debug!(
                    url = %entry.request.url,
                    status = entry.response.status,
                    "skipping entry without a usable status"
                );
                continue;
            };
            let endpoint = EndpointKey::new(&entry.request.method, extract_path(&entry.request.url));
            let mut observation = ProbeObservation::new(endpoint, status);
            if let Some(case_id) = entry.request.header(case_header).filter(|v| !v.is_empty()) {
                observation = observation.with_case_id(case_id);
                correlated += 1;
            }
            traffic.record(observation);
        }

        tracing::debug!(
            entries = har.entry_count(),
            observations = traffic.len(),
            correlated,
            "loaded traffic archive"
        );
        Self { traffic }
    }

    /// Observed traffic
    #[must_use]
    pub fn traffic(&self) -> &Traffic {
        &self.traffic
    }

    /// Consume the loader, keeping the traffic
    #[must_use]
    pub fn into_traffic(self) -> Traffic {
        self.traffic
    }
}

impl TrafficProvider for HarTraffic {
    fn traffic(&self) -> &Traffic {
        &self.traffic
    }
}

/// Path component of a request URL.
///
/// `https://host:8443/pets/1?x=y` → `/pets/1`. The scheme and host are
/// dropped, as are the query string and fragment. A URL without a path maps
/// to `/`.
#[must_use]
pub fn extract_path(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let end = without_scheme
        .find(|c: char| c == '?' || c == '#')
        .unwrap_or(without_scheme.len());
    let without_query = &without_scheme[..end];
    match without_query.find('/') {
        Some(start) => without_query[start..].to_string(),
        None => "/".to_string(),
    }
}
