//! CLI command definitions using clap

use apicov::DEFAULT_CASE_HEADER;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Environment variable read when no `--ignore-status` flag is given
pub const IGNORE_STATUS_ENV: &str = "APICOV_IGNORE_STATUS";

/// apicov: per-endpoint status-code coverage from an OpenAPI contract,
/// recorded HAR traffic and JUnit test verdicts
#[derive(Parser, Debug)]
#[command(name = "apicov")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a coverage report from contract, traffic and verdicts
    Report(ReportArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Ignore directive flags shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct IgnoreArgs {
    /// Status codes excluded from coverage: exact codes (429) or classes (5XX).
    /// Repeatable; each value may hold several comma or space separated tokens.
    /// Defaults to "429 5XX".
    #[arg(long = "ignore-status", value_name = "PATTERN", env = IGNORE_STATUS_ENV)]
    pub ignore_status: Vec<String>,
}

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// OpenAPI contract (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub openapi: PathBuf,

    /// Recorded traffic (HAR)
    #[arg(long, value_name = "FILE")]
    pub har: PathBuf,

    /// Test verdicts (JUnit XML)
    #[arg(long, value_name = "FILE")]
    pub junit: PathBuf,

    /// Ignore directives
    #[command(flatten)]
    pub ignore: IgnoreArgs,

    /// Request header carrying the test case id
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CASE_HEADER)]
    pub case_header: String,

    /// Write an HTML report to this file
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Write a JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Ignore directives
    #[command(flatten)]
    pub ignore: IgnoreArgs,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
