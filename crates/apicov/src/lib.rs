//! apicov: status-code coverage for HTTP APIs
//!
//! Folds three views of an API into a per-endpoint health report:
//!
//! - the **contract**: which status codes each (method, path) documents
//! - the **traffic**: which status codes were actually observed
//! - the **verdicts**: which correlated probes failed verification
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │ OpenApiContract │   │   HarTraffic    │   │  JunitVerdicts  │
//! └────────┬────────┘   └────────┬────────┘   └────────┬────────┘
//!          │ DocumentedCodes     │ Traffic             │ FailingCaseIds
//!          └─────────────────────┼─────────────────────┘
//!                                ▼
//!                       ┌─────────────────┐
//!                       │ CoverageEngine  │◄── IgnoreRuleSet
//!                       └────────┬────────┘
//!                                │ CoverageRun
//!              ┌─────────────────┼─────────────────┐
//!              ▼                 ▼                 ▼
//!         TextReport        HtmlReport        JsonReport
//! ```
//!
//! # Example
//!
//! ```
//! use apicov::{CoverageEngine, CoverageColor, DocumentedCodes, EndpointKey, FailingCaseIds,
//!              ProbeObservation, Traffic};
//!
//! let pets = EndpointKey::new("GET", "/pets");
//! let documented = DocumentedCodes::new().with_endpoint(pets.clone(), [200, 404]);
//! let traffic: Traffic = vec![
//!     ProbeObservation::new(pets.clone(), 200),
//!     ProbeObservation::new(pets.clone(), 404).with_case_id("a1"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let run = CoverageEngine::with_default_rules().run(&documented, &traffic, &FailingCaseIds::new());
//! assert_eq!(run.record(&pets).map(|r| r.color), Some(CoverageColor::Green));
//! assert_eq!(run.summary.format_percent(run.summary.total_pass), "100.0%");
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod endpoint;
pub mod engine;
pub mod ignore;
pub mod providers;
pub mod reconcile;
pub mod report;
mod result;
pub mod summary;

pub use classify::{ClassificationRecord, CoverageColor, EndpointClassifier};
pub use endpoint::{
    DocumentedCodes, EndpointKey, FailingCaseIds, ProbeObservation, StatusCode, StatusMap,
    StatusSet, Traffic,
};
pub use engine::{CoverageEngine, CoverageRun};
pub use ignore::{flatten_patterns, IgnoreRuleSet, DEFAULT_IGNORE_PATTERNS};
pub use providers::{
    ContractProvider, HarTraffic, JunitVerdicts, OpenApiContract, TrafficProvider,
    VerdictProvider, DEFAULT_CASE_HEADER,
};
pub use reconcile::{VerdictReconciler, Verdicts};
pub use report::{HtmlReport, JsonReport, TextReport};
pub use result::{ApicovError, ApicovResult};
pub use summary::{Summary, SummaryAggregator};
