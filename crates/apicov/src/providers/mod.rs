//! Input providers.
//!
//! The engine consumes three views of an API. Each view sits behind a trait
//! so the engine never cares where the data came from; the file-backed
//! implementations here read the formats produced by a typical contract
//! fuzzing run:
//!
//! | Trait               | Implementation       | Format            |
//! |---------------------|----------------------|-------------------|
//! | [`ContractProvider`]| [`OpenApiContract`]  | OpenAPI YAML/JSON |
//! | [`TrafficProvider`] | [`HarTraffic`]       | HAR 1.2 JSON      |
//! | [`VerdictProvider`] | [`JunitVerdicts`]    | JUnit XML         |

pub mod har;
pub mod junit;
pub mod openapi;

pub use har::{extract_path, HarTraffic, DEFAULT_CASE_HEADER};
pub use junit::{CaseIdMatcher, JunitVerdicts};
pub use openapi::OpenApiContract;

use crate::endpoint::{DocumentedCodes, FailingCaseIds, Traffic};

/// Supplies the documented (endpoint, status) pairs
pub trait ContractProvider {
    /// Documented codes per endpoint
    fn documented_codes(&self) -> &DocumentedCodes;
}

/// Supplies observed traffic
pub trait TrafficProvider {
    /// Seen statuses and individual observations
    fn traffic(&self) -> &Traffic;
}

/// Supplies the correlation ids that failed verification
pub trait VerdictProvider {
    /// Failing case ids
    fn failing_case_ids(&self) -> &FailingCaseIds;
}

impl ContractProvider for DocumentedCodes {
    fn documented_codes(&self) -> &DocumentedCodes {
        self
    }
}

impl TrafficProvider for Traffic {
    fn traffic(&self) -> &Traffic {
        self
    }
}

impl VerdictProvider for FailingCaseIds {
    fn failing_case_ids(&self) -> &FailingCaseIds {
        self
    }
}
