//! Coverage Reconciliation Engine.
//!
//! Wires the components together for one run:
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────┐   ┌────────────────────┐   ┌───────────────────┐
//! │ IgnoreRuleSet│──►│                   │   │                    │   │                   │
//! └──────────────┘   │ EndpointClassifier│──►│ ClassificationRecord──►│ SummaryAggregator │
//! ┌──────────────┐   │  (per endpoint)   │   │  (per endpoint)    │   │                   │
//! │ Reconciler   │──►│                   │   │                    │   │                   │
//! └──────────────┘   └───────────────────┘   └────────────────────┘   └───────────────────┘
//! ```
//!
//! The engine is a pure function of its inputs. Endpoints are classified
//! independently; only endpoints present in the contract are reported.

use crate::classify::{ClassificationRecord, CoverageColor, EndpointClassifier};
use crate::endpoint::{DocumentedCodes, EndpointKey, FailingCaseIds, StatusSet, Traffic};
use crate::ignore::IgnoreRuleSet;
use crate::providers::{ContractProvider, TrafficProvider, VerdictProvider};
use crate::reconcile::VerdictReconciler;
use crate::summary::{Summary, SummaryAggregator};
use serde::Serialize;
use std::collections::BTreeMap;

static NO_CODES: StatusSet = StatusSet::new();

/// Result of one coverage run
#[derive(Debug, Clone, Serialize)]
pub struct CoverageRun {
    /// One record per documented endpoint, in (method, path) order
    pub records: Vec<ClassificationRecord>,
    /// Totals over `records`
    pub summary: Summary,
    /// Endpoints seen in traffic but absent from the contract
    pub undocumented_endpoints: Vec<EndpointKey>,
}

impl CoverageRun {
    /// Record for one endpoint
    #[must_use]
    pub fn record(&self, endpoint: &EndpointKey) -> Option<&ClassificationRecord> {
        self.records.iter().find(|r| &r.endpoint == endpoint)
    }

    /// Number of endpoints per health color
    #[must_use]
    pub fn color_counts(&self) -> BTreeMap<CoverageColor, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.color).or_insert(0) += 1;
        }
        counts
    }
}

/// Runs reconciliation, classification and aggregation under fixed ignore rules
#[derive(Debug, Clone)]
pub struct CoverageEngine {
    rules: IgnoreRuleSet,
}

impl Default for CoverageEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl CoverageEngine {
    /// Create an engine with explicit ignore rules
    #[must_use]
    pub fn new(rules: IgnoreRuleSet) -> Self {
        Self { rules }
    }

    /// Create an engine using the default `429`, `5XX` rules
    #[must_use]
    pub fn with_default_rules() -> Self {
        Self::new(IgnoreRuleSet::default_rules())
    }

    /// Ignore rules in effect
    #[must_use]
    pub fn rules(&self) -> &IgnoreRuleSet {
        &self.rules
    }

    /// Classify every documented endpoint
    #[must_use]
    pub fn run(
        &self,
        documented: &DocumentedCodes,
        traffic: &Traffic,
        failing_ids: &FailingCaseIds,
    ) -> CoverageRun {
        let verdicts = VerdictReconciler::new().reconcile(traffic, failing_ids);
        let classifier = EndpointClassifier::new(&self.rules);

        let records: Vec<ClassificationRecord> = documented
            .iter()
            .map(|(endpoint, codes)| {
                classifier.classify(
                    endpoint,
                    codes,
                    traffic.seen(endpoint).unwrap_or(&NO_CODES),
                    verdicts.passing(endpoint).unwrap_or(&NO_CODES),
                    verdicts.failing(endpoint).unwrap_or(&NO_CODES),
                )
            })
            .collect();

        let undocumented_endpoints: Vec<EndpointKey> = traffic
            .endpoints()
            .filter(|endpoint| !documented.contains_endpoint(endpoint))
            .cloned()
            .collect();
        if !undocumented_endpoints.is_empty() {
            tracing::warn!(
                count = undocumented_endpoints.len(),
                "traffic observed for endpoints absent from the contract; they are not classified"
            );
        }

        let summary = SummaryAggregator::new().aggregate(&records);
        tracing::info!(
            endpoints = records.len(),
            total_doc = summary.total_doc,
            total_pass = summary.total_pass,
            total_fail = summary.total_fail,
            total_untested = summary.total_untested,
            extra_total = summary.extra_total,
            "coverage run complete"
        );

        CoverageRun {
            records,
            summary,
            undocumented_endpoints,
        }
    }

    /// Same as [`run`](Self::run), pulling inputs from providers
    #[must_use]
    pub fn run_providers(
        &self,
        contract: &impl ContractProvider,
        traffic: &impl TrafficProvider,
        verdicts: &impl VerdictProvider,
    ) -> CoverageRun {
        self.run(
            contract.documented_codes(),
            traffic.traffic(),
            verdicts.failing_case_ids(),
        )
    }
}
