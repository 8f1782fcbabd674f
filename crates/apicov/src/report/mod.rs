//! Report rendering.
//!
//! Three renderers consume a finished [`CoverageRun`]:
//!
//! - [`TextReport`]: plain listing for terminals, optionally colored
//! - [`HtmlReport`]: self-contained page with a summary table
//! - [`JsonReport`]: machine-readable dump of records and totals
//!
//! Each renderer exposes `render()` returning the document and `write_to()`
//! writing it to a file. The ignore directives are passed in for display
//! only; the run has already been classified with them.

pub mod html;
pub mod json;
pub mod text;

pub use html::HtmlReport;
pub use json::JsonReport;
pub use text::TextReport;

use crate::classify::ClassificationRecord;
use crate::endpoint::StatusSet;
use crate::engine::CoverageRun;

/// Placeholder for an empty code list
pub const EMPTY_CODES: &str = "-";

/// Heading of the ignore-directive line
pub const IGNORED_HEADING: &str = "Ignored for coverage (but still reported if seen failing)";

/// Heading of the list of endpoints absent from the contract
pub const UNDOCUMENTED_HEADING: &str = "Observed but not in contract";

/// Comma separated codes, or [`EMPTY_CODES`]
#[must_use]
pub fn format_codes(codes: &StatusSet) -> String {
    if codes.is_empty() {
        return EMPTY_CODES.to_string();
    }
    codes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Labelled code lists shown for every endpoint, in display order
#[must_use]
pub fn bucket_rows(record: &ClassificationRecord) -> [(&'static str, String); 9] {
    [
        ("Documented", format_codes(&record.documented)),
        ("Documented (non-ignored)", format_codes(&record.nonignored_docs)),
        ("Seen (any)", format_codes(&record.seen)),
        ("Covered & passing", format_codes(&record.covered_passing)),
        ("Covered & failing", format_codes(&record.covered_failing)),
        ("Untested (non-ignored documented)", format_codes(&record.untested)),
        ("Ignored documented statuses", format_codes(&record.ignored_docs)),
        ("Ignored & failing", format_codes(&record.ignored_failing)),
        (
            "Undocumented but seen (treated as failures)",
            format_codes(&record.extra()),
        ),
    ]
}

/// Summary rows: label, count and percent-of-documented column
///
/// The documented row is the denominator itself, so its percent column is `-`.
#[must_use]
pub fn summary_rows(run: &CoverageRun) -> [(&'static str, usize, String); 5] {
    let summary = &run.summary;
    [
        ("Documented (non-ignored)", summary.total_doc, EMPTY_CODES.to_string()),
        (
            "Covered & passing",
            summary.total_pass,
            summary.format_percent(summary.total_pass),
        ),
        (
            "Covered & failing",
            summary.total_fail,
            summary.format_percent(summary.total_fail),
        ),
        (
            "Untested",
            summary.total_untested,
            summary.format_percent(summary.total_untested),
        ),
        (
            "Undocumented statuses seen",
            summary.extra_total,
            EMPTY_CODES.to_string(),
        ),
    ]
}

/// Ignore directives joined for display, or `none`
#[must_use]
pub fn format_patterns(patterns: &[String]) -> String {
    if patterns.is_empty() {
        "none".to_string()
    } else {
        patterns.join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::classify::EndpointClassifier;
    use crate::endpoint::{DocumentedCodes, EndpointKey, FailingCaseIds, ProbeObservation, Traffic};
    use crate::engine::CoverageEngine;
    use crate::ignore::IgnoreRuleSet;

    fn set(codes: &[u16]) -> StatusSet {
        codes.iter().copied().collect()
    }

    #[test]
    fn test_format_codes() {
        assert_eq!(format_codes(&set(&[])), "-");
        assert_eq!(format_codes(&set(&[404, 200])), "200, 404");
    }

    #[test]
    fn test_bucket_rows_extra_merges_ignored_and_nonignored() {
        let rules = IgnoreRuleSet::default_rules();
        let record = EndpointClassifier::new(&rules).classify(
            &EndpointKey::new("GET", "/a"),
            &set(&[200]),
            &set(&[200, 418, 503]),
            &set(&[200]),
            &set(&[]),
        );
        let rows = bucket_rows(&record);
        assert_eq!(rows[0], ("Documented", "200".to_string()));
        assert_eq!(rows[8].1, "418, 503");
    }

    #[test]
    fn test_summary_rows_without_documented_codes() {
        let run = CoverageEngine::with_default_rules().run(
            &DocumentedCodes::new(),
            &Traffic::new(),
            &FailingCaseIds::new(),
        );
        for (_, count, percent) in summary_rows(&run) {
            assert_eq!(count, 0);
            assert_eq!(percent, "-");
        }
    }

    #[test]
    fn test_summary_rows_percentages() {
        let key = EndpointKey::new("GET", "/a");
        let documented = DocumentedCodes::new().with_endpoint(key.clone(), [200, 404]);
        let traffic: Traffic = vec![ProbeObservation::new(key, 200)].into_iter().collect();
        let run = CoverageEngine::with_default_rules().run(&documented, &traffic, &FailingCaseIds::new());
        let rows = summary_rows(&run);
        assert_eq!(rows[0], ("Documented (non-ignored)", 2, "-".to_string()));
        assert_eq!(rows[1].2, "50.0%");
        assert_eq!(rows[3].2, "50.0%");
    }

    #[test]
    fn test_format_patterns() {
        assert_eq!(format_patterns(&[]), "none");
        assert_eq!(
            format_patterns(&["429".to_string(), "5XX".to_string()]),
            "429, 5XX"
        );
    }
}
