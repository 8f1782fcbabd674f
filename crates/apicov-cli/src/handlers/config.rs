//! Config command handler

use crate::config::{CliConfig, ColorChoice, Verbosity};
use crate::error::{CliError, CliResult};
use crate::output::emit;
use serde::Serialize;

/// Configuration as it applies to a run, with the ignore rules parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Whether stdout output will be colored
    pub colored_output: bool,
    /// Ignore directives as given
    pub ignore_patterns: Vec<String>,
    /// Exact codes the directives resolved to
    pub ignored_codes: Vec<i64>,
    /// Status classes the directives resolved to, e.g. `5XX`
    pub ignored_classes: Vec<String>,
    /// Correlation header name
    pub case_header: String,
}

/// Resolve `config` into its effective form
#[must_use]
pub fn effective_config(config: &CliConfig) -> EffectiveConfig {
    let rules = config.ignore_rules();
    EffectiveConfig {
        verbosity: config.verbosity,
        color: config.color,
        colored_output: config.color.should_color(),
        ignore_patterns: config.ignore_patterns.clone(),
        ignored_codes: rules.exact_codes().collect(),
        ignored_classes: rules.classes().map(|digit| format!("{digit}XX")).collect(),
        case_header: config.case_header.clone(),
    }
}

/// Execute the config command: print the effective configuration as JSON
pub fn execute_config(config: &CliConfig) -> CliResult<()> {
    let json = serde_json::to_string_pretty(&effective_config(config))
        .map_err(|e| CliError::config(e.to_string()))?;
    emit(&mut std::io::stdout().lock(), &format!("{json}\n"))?;
    Ok(())
}
