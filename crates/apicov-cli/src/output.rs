//! Status lines written next to the report

use crate::error::CliResult;
use apicov::{CoverageColor, CoverageRun};
use console::{style, Style, Term};
use std::io::Write;

/// Writes short status messages to stderr so stdout carries only the report
#[derive(Debug)]
pub struct StatusPrinter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for StatusPrinter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl StatusPrinter {
    /// Create a new printer
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print the per-color endpoint tally of a run
    pub fn health(&self, run: &CoverageRun) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(&health_line(run, self.use_color));
    }
}

/// Write report text to `out`; a closed pipe or full disk surfaces as `CliError::Io`
pub fn emit(out: &mut impl Write, text: &str) -> CliResult<()> {
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// `3 endpoints: 1 green, 1 yellow, 0 red, 1 grey`
#[must_use]
pub fn health_line(run: &CoverageRun, use_color: bool) -> String {
    let counts = run.color_counts();
    let parts: Vec<String> = [
        CoverageColor::Green,
        CoverageColor::Yellow,
        CoverageColor::Red,
        CoverageColor::Grey,
    ]
    .into_iter()
    .map(|color| {
        let text = format!("{} {color}", counts.get(&color).copied().unwrap_or(0));
        if use_color {
            color_style(color).apply_to(text).to_string()
        } else {
            text
        }
    })
    .collect();
    format!("{} endpoints: {}", run.records.len(), parts.join(", "))
}

fn color_style(color: CoverageColor) -> Style {
    let style = Style::new().force_styling(true);
    match color {
        CoverageColor::Green => style.green(),
        CoverageColor::Yellow => style.yellow(),
        CoverageColor::Red => style.red(),
        CoverageColor::Grey => style.dim(),
    }
}
