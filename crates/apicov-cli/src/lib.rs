//! apicov CLI Library
//!
//! Command-line interface for the apicov coverage engine.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, IgnoreArgs, ReportArgs, IGNORE_STATUS_ENV};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{emit, health_line, StatusPrinter};
