//! Run-level totals.

use crate::classify::ClassificationRecord;
use serde::{Deserialize, Serialize};

/// Placeholder rendered when a percentage has no denominator
pub const UNDEFINED_PERCENT: &str = "-";

/// Totals over every classified endpoint.
///
/// All counts except `extra_total` cover non-ignored documented codes only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Non-ignored documented codes
    pub total_doc: usize,
    /// Covered and passing
    pub total_pass: usize,
    /// Covered and failing
    pub total_fail: usize,
    /// Never exercised
    pub total_untested: usize,
    /// Undocumented codes seen, ignored or not
    pub extra_total: usize,
}

impl Summary {
    /// Fold one record into the totals
    pub fn add(&mut self, record: &ClassificationRecord) {
        self.total_doc += record.nonignored_docs.len();
        self.total_pass += record.covered_passing.len();
        self.total_fail += record.covered_failing.len();
        self.total_untested += record.untested.len();
        self.extra_total += record.extra_nonignored.len() + record.extra_ignored.len();
    }

    /// `count` as a percentage of `total_doc`; `None` when nothing is documented
    #[must_use]
    pub fn percent_of_documented(&self, count: usize) -> Option<f64> {
        if self.total_doc == 0 {
            None
        } else {
            Some(count as f64 * 100.0 / self.total_doc as f64)
        }
    }

    /// [`percent_of_documented`](Self::percent_of_documented) rendered with one decimal
    #[must_use]
    pub fn format_percent(&self, count: usize) -> String {
        self.percent_of_documented(count)
            .map_or_else(|| UNDEFINED_PERCENT.to_string(), |p| format!("{p:.1}%"))
    }

    /// Passing share of documented codes
    #[must_use]
    pub fn pass_percent(&self) -> Option<f64> {
        self.percent_of_documented(self.total_pass)
    }

    /// Failing share of documented codes
    #[must_use]
    pub fn fail_percent(&self) -> Option<f64> {
        self.percent_of_documented(self.total_fail)
    }

    /// Untested share of documented codes
    #[must_use]
    pub fn untested_percent(&self) -> Option<f64> {
        self.percent_of_documented(self.total_untested)
    }
}

impl<'a> FromIterator<&'a ClassificationRecord> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a ClassificationRecord>>(iter: I) -> Self {
        let mut summary = Self::default();
        for record in iter {
            summary.add(record);
        }
        summary
    }
}

/// Reduces classification records to a [`Summary`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Create an aggregator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Sum bucket sizes across `records`
    #[must_use]
    pub fn aggregate<'a>(
        &self,
        records: impl IntoIterator<Item = &'a ClassificationRecord>,
    ) -> Summary {
        records.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::EndpointClassifier;
    use crate::endpoint::{EndpointKey, StatusSet};
    use crate::ignore::IgnoreRuleSet;

    fn record(documented: &[u16], seen: &[u16], passing: &[u16], failing: &[u16]) -> ClassificationRecord {
        let rules = IgnoreRuleSet::default_rules();
        let set = |codes: &[u16]| codes.iter().copied().collect::<StatusSet>();
        EndpointClassifier::new(&rules).classify(
            &EndpointKey::new("GET", "/x"),
            &set(documented),
            &set(seen),
            &set(passing),
            &set(failing),
        )
    }

    #[test]
    fn test_aggregate_sums_buckets() {
        let records = vec![
            record(&[200, 404, 500], &[200, 418, 503], &[200, 418, 503], &[]),
            record(&[201, 400], &[400], &[], &[400]),
        ];
        let summary = SummaryAggregator::new().aggregate(&records);

        assert_eq!(summary.total_doc, 4);
        assert_eq!(summary.total_pass, 1);
        assert_eq!(summary.total_fail, 1);
        assert_eq!(summary.total_untested, 2);
        assert_eq!(summary.extra_total, 2);
    }

    #[test]
    fn test_aggregate_empty() {
        let records: Vec<ClassificationRecord> = Vec::new();
        let summary = SummaryAggregator::new().aggregate(&records);
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_percent_guard() {
        let summary = Summary::default();
        assert_eq!(summary.percent_of_documented(0), None);
        assert_eq!(summary.pass_percent(), None);
        assert_eq!(summary.format_percent(0), UNDEFINED_PERCENT);
    }

    #[test]
    fn test_percent_format() {
        let summary = Summary {
            total_doc: 3,
            total_pass: 1,
            total_fail: 0,
            total_untested: 2,
            extra_total: 0,
        };
        assert_eq!(summary.format_percent(summary.total_pass), "33.3%");
        assert_eq!(summary.format_percent(summary.total_fail), "0.0%");
        assert_eq!(summary.format_percent(summary.total_untested), "66.7%");
    }

    #[test]
    fn test_only_ignored_documented_codes() {
        let records = vec![record(&[429, 500], &[500], &[500], &[])];
        let summary = SummaryAggregator::new().aggregate(&records);
        assert_eq!(summary.total_doc, 0);
        assert_eq!(summary.untested_percent(), None);
    }
}
