//! JSON coverage report.

use crate::classify::ClassificationRecord;
use crate::endpoint::EndpointKey;
use crate::engine::CoverageRun;
use crate::result::{ApicovError, ApicovResult};
use crate::summary::Summary;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Percentages {
    pass: Option<f64>,
    fail: Option<f64>,
    untested: Option<f64>,
}

#[derive(Serialize)]
struct Document<'a> {
    ignore_patterns: &'a [String],
    summary: &'a Summary,
    percentages: Percentages,
    endpoints: &'a [ClassificationRecord],
    undocumented_endpoints: &'a [EndpointKey],
}

/// JSON rendering of a coverage run.
///
/// Code lists come out as ascending arrays and colors as lower-case names.
/// Percentages are `null` when no documented code counts.
#[derive(Debug, Clone)]
pub struct JsonReport<'a> {
    run: &'a CoverageRun,
    ignore_patterns: &'a [String],
}

impl<'a> JsonReport<'a> {
    /// Create a report for `run`
    #[must_use]
    pub fn new(run: &'a CoverageRun) -> Self {
        Self {
            run,
            ignore_patterns: &[],
        }
    }

    /// Set the ignore directives recorded in the document
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: &'a [String]) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Render pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn render(&self) -> ApicovResult<String> {
        let summary = &self.run.summary;
        let document = Document {
            ignore_patterns: self.ignore_patterns,
            summary,
            percentages: Percentages {
                pass: summary.pass_percent(),
                fail: summary.fail_percent(),
                untested: summary.untested_percent(),
            },
            endpoints: &self.run.records,
            undocumented_endpoints: &self.run.undocumented_endpoints,
        };
        serde_json::to_string_pretty(&document).map_err(|e| ApicovError::render(e.to_string()))
    }

    /// Write the document to a file
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn write_to(&self, path: &Path) -> ApicovResult<()> {
        std::fs::write(path, self.render()?)?;
        Ok(())
    }
}
