//! Report command handler

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{emit, StatusPrinter};
use crate::ReportArgs;
use apicov::{
    ApicovError, ApicovResult, CoverageEngine, CoverageRun, HarTraffic, HtmlReport, JsonReport,
    JunitVerdicts, OpenApiContract, TextReport,
};
use std::path::Path;

/// The three loaded inputs of a run
#[derive(Debug, Clone)]
pub struct CoverageInputs {
    /// Documented codes
    pub contract: OpenApiContract,
    /// Observed traffic
    pub traffic: HarTraffic,
    /// Failing case ids
    pub verdicts: JunitVerdicts,
}

impl CoverageInputs {
    /// Run the engine under the configured ignore rules
    #[must_use]
    pub fn run(&self, config: &CliConfig) -> CoverageRun {
        CoverageEngine::new(config.ignore_rules()).run_providers(
            &self.contract,
            &self.traffic,
            &self.verdicts,
        )
    }
}

/// Load contract, traffic and verdicts named by `args`
pub fn load_inputs(config: &CliConfig, args: &ReportArgs) -> CliResult<CoverageInputs> {
    if config.case_header.trim().is_empty() {
        return Err(CliError::config("case header name must not be empty"));
    }
    Ok(CoverageInputs {
        contract: with_path("OpenAPI contract", &args.openapi, OpenApiContract::from_path(&args.openapi))?,
        traffic: with_path(
            "HAR archive",
            &args.har,
            HarTraffic::from_path_with_header(&args.har, &config.case_header),
        )?,
        verdicts: with_path("JUnit report", &args.junit, JunitVerdicts::from_path(&args.junit))?,
    })
}

/// Attach the offending path to I/O failures; parse errors already carry it
fn with_path<T>(what: &str, path: &Path, result: ApicovResult<T>) -> CliResult<T> {
    result.map_err(|e| match e {
        ApicovError::Io(io) => CliError::invalid_argument(format!(
            "cannot read {what} {}: {io}",
            path.display()
        )),
        other => CliError::Apicov(other),
    })
}

/// Execute the report command
pub fn execute_report(config: &CliConfig, args: &ReportArgs) -> CliResult<()> {
    let printer = StatusPrinter::new(config.color.should_color(), config.verbosity.is_quiet());
    let inputs = load_inputs(config, args)?;
    let run = inputs.run(config);

    if !config.verbosity.is_quiet() {
        let text = TextReport::new(&run)
            .with_ignore_patterns(&config.ignore_patterns)
            .with_color(config.color.should_color())
            .render();
        emit(&mut std::io::stdout().lock(), &text)?;
    }

    if let Some(ref path) = args.html {
        HtmlReport::new(&run)
            .with_ignore_patterns(&config.ignore_patterns)
            .write_to(path)
            .map_err(|e| report_error(path, &e))?;
        printer.success(&format!("HTML report written to {}", path.display()));
    }

    if let Some(ref path) = args.json {
        JsonReport::new(&run)
            .with_ignore_patterns(&config.ignore_patterns)
            .write_to(path)
            .map_err(|e| report_error(path, &e))?;
        printer.success(&format!("JSON report written to {}", path.display()));
    }

    if run.records.is_empty() {
        printer.warning("the contract documents no endpoints with numeric response codes");
    }
    printer.health(&run);
    Ok(())
}

fn report_error(path: &Path, error: &ApicovError) -> CliError {
    CliError::report_generation(format!("{}: {error}", path.display()))
}
