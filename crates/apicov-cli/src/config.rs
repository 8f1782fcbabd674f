//! CLI configuration

use apicov::{flatten_patterns, IgnoreRuleSet, DEFAULT_CASE_HEADER, DEFAULT_IGNORE_PATTERNS};
use serde::{Deserialize, Serialize};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - run summary in the log
    Verbose,
    /// Debug - loader and per-endpoint events
    Debug,
    /// Trace - everything
    Trace,
}

impl Verbosity {
    /// Map `-q` and the `-v` count to a level; `-q` wins
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug | Self::Trace)
    }

    /// Log filter used when `RUST_LOG` is not set
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Ignore directives, one token per entry
    pub ignore_patterns: Vec<String>,
    /// Request header carrying the correlation id
    pub case_header: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
            ignore_patterns: DEFAULT_IGNORE_PATTERNS.iter().map(ToString::to_string).collect(),
            case_header: DEFAULT_CASE_HEADER.to_string(),
        }
    }
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Replace the ignore directives. Each entry may pack several
    /// comma or space separated tokens; an empty list keeps the defaults.
    #[must_use]
    pub fn with_ignore_patterns<I, S>(mut self, directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut directives = directives.into_iter().peekable();
        if directives.peek().is_some() {
            self.ignore_patterns = flatten_patterns(directives);
        }
        self
    }

    /// Set the correlation header name
    #[must_use]
    pub fn with_case_header(mut self, header: impl Into<String>) -> Self {
        self.case_header = header.into();
        self
    }

    /// Parsed ignore rules
    #[must_use]
    pub fn ignore_rules(&self) -> IgnoreRuleSet {
        IgnoreRuleSet::new(&self.ignore_patterns)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_default_verbosity() {
            assert_eq!(Verbosity::default(), Verbosity::Normal);
        }

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(false, 7), Verbosity::Trace);
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
        }

        #[test]
        fn test_is_quiet() {
            assert!(Verbosity::Quiet.is_quiet());
            assert!(!Verbosity::Normal.is_quiet());
        }

        #[test]
        fn test_is_verbose() {
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Verbose.is_verbose());
            assert!(Verbosity::Trace.is_verbose());
        }

        #[test]
        fn test_log_filter() {
            assert_eq!(Verbosity::Quiet.log_filter(), "error");
            assert_eq!(Verbosity::Normal.log_filter(), "warn");
            assert_eq!(Verbosity::Verbose.log_filter(), "info");
            assert_eq!(Verbosity::Debug.log_filter(), "debug");
            assert_eq!(Verbosity::Trace.log_filter(), "trace");
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_default_color() {
            assert_eq!(ColorChoice::default(), ColorChoice::Auto);
        }

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::new();
            assert_eq!(config.ignore_patterns, vec!["429", "5XX"]);
            assert_eq!(config.case_header, "X-Schemathesis-TestCaseId");
            let rules = config.ignore_rules();
            assert!(rules.is_ignored(429));
            assert!(rules.is_ignored(503));
            assert!(!rules.is_ignored(404));
        }

        #[test]
        fn test_ignore_patterns_are_flattened() {
            let config = CliConfig::new().with_ignore_patterns(["401, 403", "4XX 5XX"]);
            assert_eq!(config.ignore_patterns, vec!["401", "403", "4XX", "5XX"]);
            let rules = config.ignore_rules();
            assert!(rules.is_ignored(401));
            assert!(rules.is_ignored(418));
            assert!(!rules.is_ignored(302));
        }

        #[test]
        fn test_empty_directives_keep_defaults() {
            let config = CliConfig::new().with_ignore_patterns(Vec::<String>::new());
            assert_eq!(config.ignore_patterns, vec!["429", "5XX"]);
        }

        #[test]
        fn test_explicit_patterns_replace_defaults() {
            let config = CliConfig::new().with_ignore_patterns(["418"]);
            let rules = config.ignore_rules();
            assert!(rules.is_ignored(418));
            assert!(!rules.is_ignored(500));
        }

        #[test]
        fn test_builder_chain() {
            let config = CliConfig::new()
                .with_verbosity(Verbosity::Debug)
                .with_color(ColorChoice::Never)
                .with_case_header("X-Trace");
            assert_eq!(config.verbosity, Verbosity::Debug);
            assert_eq!(config.color, ColorChoice::Never);
            assert_eq!(config.case_header, "X-Trace");
        }

        #[test]
        fn test_serializes() {
            let json = serde_json::to_string(&CliConfig::new()).unwrap();
            assert!(json.contains("\"ignore_patterns\":[\"429\",\"5XX\"]"));
        }
    }
}
