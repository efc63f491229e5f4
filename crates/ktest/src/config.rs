//! Runner configuration via environment variables
//!
//! ktest has no configuration file. Flags are enabled by the exact value `1`;
//! any other value, or absence, leaves them disabled.

use std::env;

/// Run each test in its own child process
pub const FORK_ENV: &str = "KTEST_FORK";
/// Exit with a failure status after the report if any test failed
pub const EXIT_ENV: &str = "KTEST_EXIT";
/// Disable colored output
pub const NO_COLOR_ENV: &str = "KTEST_NO_COLOR";
/// `tracing` filter for diagnostic logs
pub const LOG_ENV: &str = "KTEST_LOG";
/// Catalog index of the test an isolation child must run
pub const CHILD_ENV: &str = "KTEST_CHILD";
/// Name of the test an isolation child must run, cross-checked against the index
pub const CHILD_NAME_ENV: &str = "KTEST_CHILD_NAME";

/// Directive passed from the runner to an isolation child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDirective {
    /// Raw value of `KTEST_CHILD`, parsed by the runner
    pub index: String,
    /// Value of `KTEST_CHILD_NAME`, if present
    pub name: Option<String>,
}

/// Runner configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Run each test in its own process (KTEST_FORK=1)
    pub isolate_tests: bool,
    /// Exit nonzero after the report if any test failed (KTEST_EXIT=1)
    pub exit_on_failure: bool,
    /// Disable colored output (KTEST_NO_COLOR or NO_COLOR set)
    pub no_color: bool,
    /// Set when this process is an isolation child
    pub child: Option<ChildDirective>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).map(|v| v == "1").unwrap_or(false);

        Self {
            isolate_tests: flag(FORK_ENV),
            exit_on_failure: flag(EXIT_ENV),
            no_color: lookup(NO_COLOR_ENV).is_some() || lookup("NO_COLOR").is_some(),
            child: lookup(CHILD_ENV).map(|index| ChildDirective {
                index,
                name: lookup(CHILD_NAME_ENV),
            }),
        }
    }

    pub fn with_isolation(mut self, isolate_tests: bool) -> Self {
        self.isolate_tests = isolate_tests;
        self
    }

    pub fn with_exit_on_failure(mut self, exit_on_failure: bool) -> Self {
        self.exit_on_failure = exit_on_failure;
        self
    }

    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Whether isolation was requested and this platform can honor it
    pub fn isolation_active(&self) -> bool {
        self.isolate_tests && crate::isolation::SUPPORTED
    }

    /// Whether a run with `failed` failures must end the process
    pub fn should_exit(&self, failed: usize) -> bool {
        self.exit_on_failure && failed > 0
    }
}
