//! Endpoint identity and the immutable inputs of a coverage run.
//!
//! Everything the engine consumes is expressed with these types:
//!
//! - [`EndpointKey`]: the (method, path) pair every other structure is keyed by
//! - [`DocumentedCodes`]: what the contract promises
//! - [`Traffic`]: what was actually observed on the wire
//! - [`FailingCaseIds`]: which correlated probes failed verification
//!
//! All collections are ordered so that reports come out in a stable order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// HTTP status code
pub type StatusCode = u16;

/// Ordered set of status codes
pub type StatusSet = BTreeSet<StatusCode>;

/// Status codes grouped per endpoint
pub type StatusMap = BTreeMap<EndpointKey, StatusSet>;

/// HTTP methods admitted from a contract document
pub const SUPPORTED_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

// =============================================================================
// EndpointKey
// =============================================================================

/// An (HTTP method, path) pair: the unit of coverage reporting.
///
/// The method is upper-cased on construction; the path is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EndpointKey {
    /// Upper-case HTTP method
    pub method: String,
    /// Path as written in the contract or extracted from a URL
    pub path: String,
}

impl EndpointKey {
    /// Create a key, normalizing the method to upper case
    #[must_use]
    pub fn new(method: impl AsRef<str>, path: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            path: path.into(),
        }
    }

    /// Whether the method is one a contract may document
    #[must_use]
    pub fn has_supported_method(&self) -> bool {
        is_supported_method(&self.method)
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Case-insensitive check against [`SUPPORTED_METHODS`]
#[must_use]
pub fn is_supported_method(method: &str) -> bool {
    SUPPORTED_METHODS
        .iter()
        .any(|m| m.eq_ignore_ascii_case(method))
}

// =============================================================================
// DocumentedCodes
// =============================================================================

/// Status codes declared per endpoint by the API contract
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentedCodes {
    endpoints: StatusMap,
}

impl DocumentedCodes {
    /// Create an empty contract
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `status` as a documented response of `endpoint`
    pub fn insert(&mut self, endpoint: EndpointKey, status: StatusCode) {
        self.endpoints.entry(endpoint).or_default().insert(status);
    }

    /// Builder form of [`insert`](Self::insert) for several codes at once
    #[must_use]
    pub fn with_endpoint(
        mut self,
        endpoint: EndpointKey,
        codes: impl IntoIterator<Item = StatusCode>,
    ) -> Self {
        self.endpoints.entry(endpoint).or_default().extend(codes);
        self
    }

    /// Documented codes of one endpoint
    #[must_use]
    pub fn get(&self, endpoint: &EndpointKey) -> Option<&StatusSet> {
        self.endpoints.get(endpoint)
    }

    /// Whether the contract documents this endpoint at all
    #[must_use]
    pub fn contains_endpoint(&self, endpoint: &EndpointKey) -> bool {
        self.endpoints.contains_key(endpoint)
    }

    /// Iterate endpoints in (method, path) order
    pub fn iter(&self) -> impl Iterator<Item = (&EndpointKey, &StatusSet)> {
        self.endpoints.iter()
    }

    /// Number of documented endpoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether no endpoint is documented
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Total number of (endpoint, status) pairs
    #[must_use]
    pub fn code_count(&self) -> usize {
        self.endpoints.values().map(BTreeSet::len).sum()
    }
}

impl FromIterator<(EndpointKey, StatusCode)> for DocumentedCodes {
    fn from_iter<I: IntoIterator<Item = (EndpointKey, StatusCode)>>(iter: I) -> Self {
        let mut documented = Self::new();
        for (endpoint, status) in iter {
            documented.insert(endpoint, status);
        }
        documented
    }
}

// =============================================================================
// Traffic
// =============================================================================

/// A single observed request/response instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeObservation {
    /// Endpoint the request targeted
    pub endpoint: EndpointKey,
    /// Response status
    pub status: StatusCode,
    /// Correlation id, absent when no tracing header was sent
    pub case_id: Option<String>,
}

impl ProbeObservation {
    /// Create an uncorrelated observation
    #[must_use]
    pub fn new(endpoint: EndpointKey, status: StatusCode) -> Self {
        Self {
            endpoint,
            status,
            case_id: None,
        }
    }

    /// Attach a correlation id
    #[must_use]
    pub fn with_case_id(mut self, case_id: impl Into<String>) -> Self {
        self.case_id = Some(case_id.into());
        self
    }
}

/// Observed traffic: bulk `seen` statuses plus the individual observations
#[derive(Debug, Clone, Default)]
pub struct Traffic {
    seen: StatusMap,
    observations: Vec<ProbeObservation>,
}

impl Traffic {
    /// Create empty traffic
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation; its status also counts as seen
    pub fn record(&mut self, observation: ProbeObservation) {
        self.seen
            .entry(observation.endpoint.clone())
            .or_default()
            .insert(observation.status);
        self.observations.push(observation);
    }

    /// Record a bulk `seen` status with no individual observation behind it
    pub fn record_seen(&mut self, endpoint: EndpointKey, status: StatusCode) {
        self.seen.entry(endpoint).or_default().insert(status);
    }

    /// Statuses seen for one endpoint
    #[must_use]
    pub fn seen(&self, endpoint: &EndpointKey) -> Option<&StatusSet> {
        self.seen.get(endpoint)
    }

    /// All seen statuses, per endpoint
    #[must_use]
    pub fn seen_map(&self) -> &StatusMap {
        &self.seen
    }

    /// Individual observations, in recording order
    #[must_use]
    pub fn observations(&self) -> &[ProbeObservation] {
        &self.observations
    }

    /// Endpoints that appear anywhere in the traffic
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointKey> {
        self.seen.keys()
    }

    /// Number of individual observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether nothing was observed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty() && self.seen.is_empty()
    }
}

impl FromIterator<ProbeObservation> for Traffic {
    fn from_iter<I: IntoIterator<Item = ProbeObservation>>(iter: I) -> Self {
        let mut traffic = Self::new();
        for observation in iter {
            traffic.record(observation);
        }
        traffic
    }
}

// =============================================================================
// FailingCaseIds
// =============================================================================

/// Correlation ids known to have failed verification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailingCaseIds {
    ids: BTreeSet<String>,
}

impl FailingCaseIds {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a failing id
    pub fn insert(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    /// Whether `id` failed
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Iterate ids in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Number of failing ids
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no id failed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FailingCaseIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
