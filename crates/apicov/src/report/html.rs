//! Self-contained HTML coverage report.

use super::{bucket_rows, format_patterns, summary_rows, IGNORED_HEADING, UNDOCUMENTED_HEADING};
use crate::engine::CoverageRun;
use crate::result::ApicovResult;
use std::path::Path;

/// Page title
pub const REPORT_TITLE: &str = "API Status Coverage";

const STYLE: &str = r#"    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        table { border-collapse: collapse; margin-bottom: 16px; }
        th, td { border: 1px solid #ddd; padding: 4px 10px; text-align: left; }
        th { background: #f5f5f5; }
        details { margin: 6px 0; border: 1px solid #eee; border-radius: 4px; padding: 6px 10px; }
        .endpoint-header { font-family: monospace; font-weight: bold; }
        .badge { display: inline-block; padding: 1px 8px; border-radius: 10px; color: #fff; font-size: 0.85em; margin-right: 8px; }
        .badge.green { background: #4caf50; }
        .badge.yellow { background: #ff9800; }
        .badge.red { background: #f44336; }
        .badge.grey { background: #9e9e9e; }
        .note { color: #555; }
    </style>
"#;

/// HTML rendering of a coverage run
#[derive(Debug, Clone)]
pub struct HtmlReport<'a> {
    run: &'a CoverageRun,
    ignore_patterns: &'a [String],
}

impl<'a> HtmlReport<'a> {
    /// Create a report for `run`
    #[must_use]
    pub fn new(run: &'a CoverageRun) -> Self {
        Self {
            run,
            ignore_patterns: &[],
        }
    }

    /// Set the ignore directives listed under the summary
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: &'a [String]) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Render the page
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n");
        html.push_str(&format!("    <title>{REPORT_TITLE}</title>\n"));
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>{REPORT_TITLE}</h1>\n"));

        // Summary
        html.push_str("<h2>Summary</h2>\n<table>\n");
        html.push_str("    <tr><th>Metric</th><th>Count</th><th>Percent of documented (non-ignored)</th></tr>\n");
        for (label, count, percent) in summary_rows(self.run) {
            html.push_str(&format!(
                "    <tr><td>{}</td><td>{count}</td><td>{}</td></tr>\n",
                escape_html(label),
                escape_html(&percent)
            ));
        }
        html.push_str("</table>\n");
        html.push_str(&format!(
            "<p class=\"note\">{}: {}</p>\n",
            escape_html(IGNORED_HEADING),
            escape_html(&format_patterns(self.ignore_patterns))
        ));

        if !self.run.undocumented_endpoints.is_empty() {
            html.push_str(&format!(
                "<p class=\"note\">{}:</p>\n<ul>\n",
                escape_html(UNDOCUMENTED_HEADING)
            ));
            for endpoint in &self.run.undocumented_endpoints {
                html.push_str(&format!(
                    "    <li><code>{}</code></li>\n",
                    escape_html(&endpoint.to_string())
                ));
            }
            html.push_str("</ul>\n");
        }

        // Endpoints
        html.push_str("<h2>Endpoints</h2>\n");
        for record in &self.run.records {
            html.push_str(&format!(
                "<details>\n    <summary><span class=\"badge {color}\">{color}</span><span class=\"endpoint-header\">{}</span></summary>\n    <table>\n",
                escape_html(&record.endpoint.to_string()),
                color = record.color
            ));
            for (label, codes) in bucket_rows(record) {
                html.push_str(&format!(
                    "        <tr><th>{}</th><td>{}</td></tr>\n",
                    escape_html(label),
                    escape_html(&codes)
                ));
            }
            html.push_str("    </table>\n</details>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Write the page to a file
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn write_to(&self, path: &Path) -> ApicovResult<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

/// Escape HTML special characters
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
