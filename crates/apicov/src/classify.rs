//! Per-endpoint coverage classification.
//!
//! Given one endpoint's documented codes, the codes seen in traffic and the
//! reconciled passing/failing sets, the classifier partitions codes into
//! coverage buckets and derives a health color.
//!
//! ## Buckets
//!
//! | Bucket             | Source                                         |
//! |--------------------|------------------------------------------------|
//! | `covered_failing`  | non-ignored documented, failing                |
//! | `covered_passing`  | non-ignored documented, passing, not failing   |
//! | `untested`         | non-ignored documented, neither                |
//! | `ignored_failing`  | ignored documented, failing                    |
//! | `ignored_passing`  | ignored documented, passing, not failing       |
//! | `extra_*`          | seen but undocumented, split by ignore rules   |
//!
//! ## Colors
//!
//! - **grey**: nothing covered at all
//! - **red**: failures and no passing code
//! - **yellow**: failures mixed with passes, or partial coverage
//! - **green**: every non-ignored documented code passed and nothing failed
//!
//! Undocumented statuses are never credited as coverage. They only ever count
//! as failure signals, whatever their ignore status.

use crate::endpoint::{EndpointKey, StatusSet};
use crate::ignore::IgnoreRuleSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coverage health of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageColor {
    /// Fully covered, no failures
    Green,
    /// Mixed pass/fail or partial coverage
    Yellow,
    /// Only failures
    Red,
    /// Untested
    Grey,
}

impl CoverageColor {
    /// Lower-case name, as used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Grey => "grey",
        }
    }
}

impl fmt::Display for CoverageColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRecord {
    /// Endpoint identity
    #[serde(flatten)]
    pub endpoint: EndpointKey,
    /// All documented codes
    pub documented: StatusSet,
    /// Documented codes counted for coverage
    pub nonignored_docs: StatusSet,
    /// Documented codes matched by an ignore rule
    pub ignored_docs: StatusSet,
    /// Codes seen in traffic
    pub seen: StatusSet,
    /// Codes credited as passing
    pub passing: StatusSet,
    /// Codes with failure evidence
    pub failing: StatusSet,
    /// Non-ignored documented codes that passed
    pub covered_passing: StatusSet,
    /// Non-ignored documented codes that failed
    pub covered_failing: StatusSet,
    /// Non-ignored documented codes never exercised
    pub untested: StatusSet,
    /// Ignored documented codes that passed
    pub ignored_passing: StatusSet,
    /// Ignored documented codes that failed
    pub ignored_failing: StatusSet,
    /// Undocumented seen codes not matched by an ignore rule
    pub extra_nonignored: StatusSet,
    /// Undocumented seen codes matched by an ignore rule
    pub extra_ignored: StatusSet,
    /// Health color
    pub color: CoverageColor,
}

impl ClassificationRecord {
    /// All undocumented codes seen for this endpoint
    #[must_use]
    pub fn extra(&self) -> StatusSet {
        self.extra_nonignored
            .union(&self.extra_ignored)
            .copied()
            .collect()
    }

    /// Any bucket other than `untested` is populated
    #[must_use]
    pub fn has_any_coverage(&self) -> bool {
        !self.covered_passing.is_empty()
            || !self.covered_failing.is_empty()
            || !self.ignored_passing.is_empty()
            || !self.ignored_failing.is_empty()
            || self.has_extra()
    }

    /// A documented code (ignored or not) passed
    #[must_use]
    pub fn has_any_passing(&self) -> bool {
        !self.covered_passing.is_empty() || !self.ignored_passing.is_empty()
    }

    /// A documented code failed, or an undocumented code was observed
    #[must_use]
    pub fn has_any_failing(&self) -> bool {
        !self.covered_failing.is_empty() || !self.ignored_failing.is_empty() || self.has_extra()
    }

    fn has_extra(&self) -> bool {
        !self.extra_nonignored.is_empty() || !self.extra_ignored.is_empty()
    }

    fn decide_color(&self) -> CoverageColor {
        if !self.has_any_coverage() {
            return CoverageColor::Grey;
        }
        if self.has_any_failing() {
            return if self.has_any_passing() {
                CoverageColor::Yellow
            } else {
                CoverageColor::Red
            };
        }
        // An endpoint whose documented codes are all ignored compares 0 == 0
        // here and comes out green.
        if self.covered_passing.len() == self.nonignored_docs.len() {
            CoverageColor::Green
        } else {
            CoverageColor::Yellow
        }
    }
}

/// Classifies endpoints under one set of ignore rules
#[derive(Debug, Clone, Copy)]
pub struct EndpointClassifier<'a> {
    rules: &'a IgnoreRuleSet,
}

impl<'a> EndpointClassifier<'a> {
    /// Create a classifier bound to `rules`
    #[must_use]
    pub fn new(rules: &'a IgnoreRuleSet) -> Self {
        Self { rules }
    }

    /// Ignore rules in effect
    #[must_use]
    pub fn rules(&self) -> &IgnoreRuleSet {
        self.rules
    }

    /// Classify one endpoint
    #[must_use]
    pub fn classify(
        &self,
        endpoint: &EndpointKey,
        documented: &StatusSet,
        seen: &StatusSet,
        passing: &StatusSet,
        failing: &StatusSet,
    ) -> ClassificationRecord {
        let (ignored_docs, nonignored_docs) = self.partition(documented.iter().copied());
        let (extra_ignored, extra_nonignored) =
            self.partition(seen.difference(documented).copied());

        let mut covered_passing = StatusSet::new();
        let mut covered_failing = StatusSet::new();
        let mut untested = StatusSet::new();
        for &code in &nonignored_docs {
            if failing.contains(&code) {
                covered_failing.insert(code);
            } else if passing.contains(&code) {
                covered_passing.insert(code);
            } else {
                untested.insert(code);
            }
        }

        let ignored_failing: StatusSet = ignored_docs
            .iter()
            .copied()
            .filter(|code| failing.contains(code))
            .collect();
        let ignored_passing: StatusSet = ignored_docs
            .iter()
            .copied()
            .filter(|code| passing.contains(code) && !failing.contains(code))
            .collect();

        let mut record = ClassificationRecord {
            endpoint: endpoint.clone(),
            documented: documented.clone(),
            nonignored_docs,
            ignored_docs,
            seen: seen.clone(),
            passing: passing.clone(),
            failing: failing.clone(),
            covered_passing,
            covered_failing,
            untested,
            ignored_passing,
            ignored_failing,
            extra_nonignored,
            extra_ignored,
            color: CoverageColor::Grey,
        };
        record.color = record.decide_color();

        tracing::debug!(endpoint = %endpoint, color = %record.color, "classified endpoint");
        record
    }

    /// Split codes into (ignored, kept)
    fn partition(&self, codes: impl Iterator<Item = u16>) -> (StatusSet, StatusSet) {
        codes.partition(|&code| self.rules.is_ignored(code))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn set(codes: &[u16]) -> StatusSet {
        codes.iter().copied().collect()
    }

    fn classify(
        documented: &[u16],
        seen: &[u16],
        passing: &[u16],
        failing: &[u16],
    ) -> ClassificationRecord {
        let rules = IgnoreRuleSet::default_rules();
        EndpointClassifier::new(&rules).classify(
            &EndpointKey::new("GET", "/pets"),
            &set(documented),
            &set(seen),
            &set(passing),
            &set(failing),
        )
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_grey_when_nothing_seen() {
            let record = classify(&[200, 404], &[], &[], &[]);
            assert_eq!(record.color, CoverageColor::Grey);
            assert_eq!(record.untested, set(&[200, 404]));
        }

        #[test]
        fn test_green_when_everything_passes() {
            let record = classify(&[200], &[200], &[200], &[]);
            assert_eq!(record.covered_passing, set(&[200]));
            assert!(record.untested.is_empty());
            assert_eq!(record.color, CoverageColor::Green);
        }

        #[test]
        fn test_red_when_only_failures() {
            let record = classify(&[200, 500], &[200], &[], &[200]);
            assert_eq!(record.covered_failing, set(&[200]));
            assert_eq!(record.ignored_docs, set(&[500]));
            assert!(!record.has_any_passing());
            assert_eq!(record.color, CoverageColor::Red);
        }

        #[test]
        fn test_yellow_via_undocumented_status() {
            let record = classify(&[200], &[200, 418], &[200], &[]);
            assert_eq!(record.extra_nonignored, set(&[418]));
            assert!(record.has_any_failing());
            assert!(record.has_any_passing());
            assert_eq!(record.color, CoverageColor::Yellow);
        }

        #[test]
        fn test_yellow_when_partially_covered() {
            let record = classify(&[200, 404], &[200], &[200], &[]);
            assert_eq!(record.untested, set(&[404]));
            assert_eq!(record.color, CoverageColor::Yellow);
        }

        #[test]
        fn test_red_via_ignored_undocumented_status() {
            let record = classify(&[200], &[503], &[503], &[]);
            assert_eq!(record.extra_ignored, set(&[503]));
            assert!(record.extra_nonignored.is_empty());
            assert_eq!(record.color, CoverageColor::Red);
        }

        #[test]
        fn test_green_when_all_documented_codes_ignored() {
            let record = classify(&[429, 500], &[500], &[500], &[]);
            assert!(record.nonignored_docs.is_empty());
            assert_eq!(record.ignored_passing, set(&[500]));
            assert_eq!(record.color, CoverageColor::Green);
        }

        #[test]
        fn test_grey_when_only_ignored_documented_and_unseen() {
            let record = classify(&[429], &[], &[], &[]);
            assert_eq!(record.color, CoverageColor::Grey);
        }
    }

    mod bucket_tests {
        use super::*;

        #[test]
        fn test_failure_takes_precedence() {
            let record = classify(&[200], &[200], &[200], &[200]);
            assert_eq!(record.covered_failing, set(&[200]));
            assert!(record.covered_passing.is_empty());
            assert_eq!(record.color, CoverageColor::Red);
        }

        #[test]
        fn test_ignored_failure_takes_precedence() {
            let record = classify(&[200, 500], &[200, 500], &[200, 500], &[500]);
            assert_eq!(record.ignored_failing, set(&[500]));
            assert!(record.ignored_passing.is_empty());
            assert_eq!(record.color, CoverageColor::Yellow);
        }

        #[test]
        fn test_extra_is_never_coverage() {
            let record = classify(&[200], &[201], &[201], &[]);
            assert!(record.covered_passing.is_empty());
            assert_eq!(record.untested, set(&[200]));
            assert_eq!(record.extra(), set(&[201]));
        }

        #[test]
        fn test_extra_split_by_ignore_rules() {
            let record = classify(&[200], &[200, 418, 429, 502], &[200], &[]);
            assert_eq!(record.extra_nonignored, set(&[418]));
            assert_eq!(record.extra_ignored, set(&[429, 502]));
        }

        #[test]
        fn test_record_keeps_inputs() {
            let record = classify(&[200], &[200], &[200], &[404]);
            assert_eq!(record.documented, set(&[200]));
            assert_eq!(record.seen, set(&[200]));
            assert_eq!(record.failing, set(&[404]));
            assert_eq!(record.endpoint.to_string(), "GET /pets");
        }

        #[test]
        fn test_custom_rules() {
            let rules = IgnoreRuleSet::new(["404"]);
            let record = EndpointClassifier::new(&rules).classify(
                &EndpointKey::new("GET", "/pets"),
                &set(&[200, 404, 500]),
                &set(&[]),
                &set(&[]),
                &set(&[]),
            );
            assert_eq!(record.nonignored_docs, set(&[200, 500]));
            assert_eq!(record.ignored_docs, set(&[404]));
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_color_serializes_lowercase() {
            let json = serde_json::to_string(&CoverageColor::Grey).unwrap();
            assert_eq!(json, "\"grey\"");
        }

        #[test]
        fn test_record_flattens_endpoint() {
            let record = classify(&[200], &[200], &[200], &[]);
            let value = serde_json::to_value(&record).unwrap();
            assert_eq!(value["method"], "GET");
            assert_eq!(value["path"], "/pets");
            assert_eq!(value["covered_passing"], serde_json::json!([200]));
            assert_eq!(value["color"], "green");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn codes() -> impl Strategy<Value = StatusSet> {
            prop::collection::btree_set(
                prop::sample::select(vec![200u16, 201, 204, 400, 404, 418, 429, 500, 503]),
                0..6,
            )
        }

        proptest! {
            #[test]
            fn prop_partition_invariant(
                documented in codes(),
                seen in codes(),
                passing in codes(),
                failing in codes(),
            ) {
                let rules = IgnoreRuleSet::default_rules();
                let record = EndpointClassifier::new(&rules).classify(
                    &EndpointKey::new("GET", "/x"),
                    &documented,
                    &seen,
                    &passing,
                    &failing,
                );

                let docs: StatusSet = record.nonignored_docs.union(&record.ignored_docs).copied().collect();
                prop_assert_eq!(&docs, &documented);
                prop_assert!(record.nonignored_docs.is_disjoint(&record.ignored_docs));

                let covered: StatusSet = record
                    .covered_passing
                    .iter()
                    .chain(&record.covered_failing)
                    .chain(&record.untested)
                    .copied()
                    .collect();
                prop_assert_eq!(&covered, &record.nonignored_docs);
                prop_assert_eq!(
                    record.covered_passing.len() + record.covered_failing.len() + record.untested.len(),
                    record.nonignored_docs.len()
                );

                let extra: StatusSet = seen.difference(&documented).copied().collect();
                prop_assert_eq!(record.extra(), extra);
                prop_assert!(record.extra_nonignored.is_disjoint(&record.extra_ignored));
            }

            #[test]
            fn prop_failing_never_credited_as_passing(
                documented in codes(),
                passing in codes(),
                failing in codes(),
            ) {
                let rules = IgnoreRuleSet::default_rules();
                let record = EndpointClassifier::new(&rules).classify(
                    &EndpointKey::new("GET", "/x"),
                    &documented,
                    &StatusSet::new(),
                    &passing,
                    &failing,
                );
                prop_assert!(record.covered_passing.is_disjoint(&failing));
                prop_assert!(record.ignored_passing.is_disjoint(&failing));
            }
        }
    }
}
