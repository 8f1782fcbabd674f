//! apicov CLI: status-code coverage for HTTP APIs
//!
//! ## Usage
//!
//! ```bash
//! apicov report --openapi api.yaml --har traffic.har --junit junit.xml
//! apicov report ... --ignore-status 429 --ignore-status 5XX --html coverage.html
//! apicov config --ignore-status "4XX, 503"
//! ```

use apicov_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Report(args) => {
            let config = config
                .with_ignore_patterns(&args.ignore.ignore_status)
                .with_case_header(&args.case_header);
            handlers::execute_report(&config, &args)
        }
        Commands::Config(args) => {
            let config = config.with_ignore_patterns(&args.ignore.ignore_status);
            handlers::execute_config(&config)
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `-q`/`-v`
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
