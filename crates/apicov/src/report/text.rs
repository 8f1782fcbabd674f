//! Plain-text coverage report.

use super::{bucket_rows, format_patterns, summary_rows, IGNORED_HEADING, UNDOCUMENTED_HEADING};
use crate::classify::{ClassificationRecord, CoverageColor};
use crate::engine::CoverageRun;
use crate::result::ApicovResult;
use console::style;
use std::fmt::Write as _;
use std::path::Path;

const LABEL_WIDTH: usize = 45;

/// Terminal listing of a coverage run
#[derive(Debug, Clone)]
pub struct TextReport<'a> {
    run: &'a CoverageRun,
    ignore_patterns: &'a [String],
    colored: bool,
}

impl<'a> TextReport<'a> {
    /// Create a report for `run` with no directives listed and no color
    #[must_use]
    pub fn new(run: &'a CoverageRun) -> Self {
        Self {
            run,
            ignore_patterns: &[],
            colored: false,
        }
    }

    /// Set the ignore directives shown in the summary
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: &'a [String]) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Color endpoint headers by health
    #[must_use]
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Render the report
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        for record in &self.run.records {
            let _ = writeln!(out, "{}", self.header(record));
            for (label, codes) in bucket_rows(record) {
                let _ = writeln!(out, "  {:<width$} {codes}", format!("{label}:"), width = LABEL_WIDTH);
            }
            out.push('\n');
        }

        out.push_str("Summary\n");
        for (label, count, percent) in summary_rows(self.run) {
            let _ = writeln!(
                out,
                "  {:<width$} {count:>6}  {percent}",
                format!("{label}:"),
                width = LABEL_WIDTH
            );
        }
        let _ = writeln!(out, "{IGNORED_HEADING}: {}", format_patterns(self.ignore_patterns));

        if !self.run.undocumented_endpoints.is_empty() {
            let _ = writeln!(out, "{UNDOCUMENTED_HEADING}:");
            for endpoint in &self.run.undocumented_endpoints {
                let _ = writeln!(out, "  {endpoint}");
            }
        }

        out
    }

    /// Write the uncolored report to a file
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn write_to(&self, path: &Path) -> ApicovResult<()> {
        std::fs::write(path, self.clone().with_color(false).render())?;
        Ok(())
    }

    fn header(&self, record: &ClassificationRecord) -> String {
        let text = format!("{} [{}]", record.endpoint, record.color);
        if !self.colored {
            return text;
        }
        let styled = style(text).force_styling(true).bold();
        let styled = match record.color {
            CoverageColor::Green => styled.green(),
            CoverageColor::Yellow => styled.yellow(),
            CoverageColor::Red => styled.red(),
            CoverageColor::Grey => styled.dim(),
        };
        styled.to_string()
    }
}
