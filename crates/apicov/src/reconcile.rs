//! Verdict reconciliation.
//!
//! Folds correlated verdicts and bulk observed traffic into per-endpoint
//! passing and failing status sets.
//!
//! 1. An observation carrying a correlation id lands in `failing` when the id
//!    is a known failure, otherwise in `passing`. The same (endpoint, status)
//!    may end up in both when probes disagree.
//! 2. Any status seen in traffic that is not already failing for its endpoint
//!    is credited as passing. Uncorrelated traffic therefore counts as
//!    exercised and innocent unless a verdict says otherwise.
//!
//! Both steps are set unions, so the result does not depend on the order of
//! the observations.

use crate::endpoint::{EndpointKey, FailingCaseIds, StatusMap, StatusSet, Traffic};

/// Per-endpoint passing and failing status sets.
///
/// The two maps are not disjoint: a status may be present in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdicts {
    passing: StatusMap,
    failing: StatusMap,
}

impl Verdicts {
    /// Statuses credited as passing for `endpoint`
    #[must_use]
    pub fn passing(&self, endpoint: &EndpointKey) -> Option<&StatusSet> {
        self.passing.get(endpoint)
    }

    /// Statuses with failure evidence for `endpoint`
    #[must_use]
    pub fn failing(&self, endpoint: &EndpointKey) -> Option<&StatusSet> {
        self.failing.get(endpoint)
    }

    /// All passing statuses
    #[must_use]
    pub fn passing_map(&self) -> &StatusMap {
        &self.passing
    }

    /// All failing statuses
    #[must_use]
    pub fn failing_map(&self) -> &StatusMap {
        &self.failing
    }
}

/// Merges traffic and failing case ids into [`Verdicts`]
#[derive(Debug, Clone, Copy, Default)]
pub struct VerdictReconciler;

impl VerdictReconciler {
    /// Create a reconciler
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reconcile `traffic` against the known failures
    #[must_use]
    pub fn reconcile(&self, traffic: &Traffic, failing_ids: &FailingCaseIds) -> Verdicts {
        let mut verdicts = Verdicts::default();

        for observation in traffic.observations() {
            let Some(case_id) = observation.case_id.as_deref() else {
                continue;
            };
            let target = if failing_ids.contains(case_id) {
                &mut verdicts.failing
            } else {
                &mut verdicts.passing
            };
            target
                .entry(observation.endpoint.clone())
                .or_default()
                .insert(observation.status);
        }

        for (endpoint, statuses) in traffic.seen_map() {
            let failing = verdicts.failing.get(endpoint);
            let innocent: Vec<_> = statuses
                .iter()
                .copied()
                .filter(|status| !failing.is_some_and(|f| f.contains(status)))
                .collect();
            if innocent.is_empty() {
                continue;
            }
            verdicts
                .passing
                .entry(endpoint.clone())
                .or_default()
                .extend(innocent);
        }

        tracing::debug!(
            passing_endpoints = verdicts.passing.len(),
            failing_endpoints = verdicts.failing.len(),
            "reconciled verdicts"
        );
        verdicts
    }
}
