//! Command handlers - extracted from main.rs for testability

pub mod config;
pub mod report;

pub use config::{effective_config, execute_config, EffectiveConfig};
pub use report::{execute_report, load_inputs, CoverageInputs};
