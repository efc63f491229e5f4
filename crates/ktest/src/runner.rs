//! Test runner - execute registered tests

use crate::assertion::AssertionAbort;
use crate::catalog::{self, Catalog, TestCase};
use crate::config::{ChildDirective, Config};
use crate::isolation;
use crate::reporter::TestReporter;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Why a test failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// An assertion raised the abort signal
    Assertion,
    /// The body panicked with something other than the abort signal
    Panicked(String),
    /// The body returned an error
    Errored(String),
    /// The isolation child exited with a nonzero status
    ExitCode(i32),
    /// The isolation child was killed by a signal
    Signal(String),
    /// The isolation child could not be started or waited for
    Spawn(String),
    /// The isolation child ended in a way that could not be classified
    Internal(String),
}

/// Final state of a single test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed(Failure),
}

impl TestOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }

    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }
}

/// A completed test
#[derive(Debug, Clone)]
pub struct TestRun {
    pub name: String,
    pub outcome: TestOutcome,
    pub duration: Duration,
}

/// Aggregate result of one pass over the catalog
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub passed: usize,
    pub failed: usize,
    /// Every executed test, in execution order
    pub runs: Vec<TestRun>,
}

impl RunReport {
    pub fn from_runs(runs: Vec<TestRun>) -> Self {
        let mut report = Self::default();
        for run in runs {
            report.record(run);
        }
        report
    }

    pub fn record(&mut self, run: TestRun) {
        if run.outcome.is_pass() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.runs.push(run);
    }

    pub fn total(&self) -> usize {
        self.runs.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Sequential test runner
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
    reporter: TestReporter,
}

impl Default for Runner {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Runner {
    pub fn new(config: Config) -> Self {
        let reporter = TestReporter::new().with_no_color(config.no_color);
        Self { config, reporter }
    }

    /// Create a runner configured from `KTEST_*` environment variables
    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every test in the catalog, in registration order.
    ///
    /// The catalog is sealed first, so the set of tests run is exactly the set
    /// registered at this point. In an isolation child this runs only the
    /// directed test and exits the process.
    pub fn run(&self, catalog: &Catalog) -> RunReport {
        if let Some(directive) = &self.config.child {
            self.run_child(catalog, directive);
        }

        catalog.seal();
        let tests = catalog.snapshot();

        let isolate = self.config.isolation_active();
        if self.config.isolate_tests && !isolate {
            warn!("process isolation is not supported on this platform, running tests in-process");
        }
        debug!(tests = tests.len(), isolate, "starting test run");

        self.reporter.begin();
        let started = Instant::now();
        let mut report = RunReport::default();

        for (index, case) in tests.iter().enumerate() {
            self.reporter.test_started(case.name());
            let run = self.run_single_test(index, case, isolate);
            self.reporter.test_finished(&run);
            report.record(run);
        }

        self.reporter.summary(&report, started.elapsed());
        self.reporter.end();
        report
    }

    fn run_single_test(&self, index: usize, case: &TestCase, isolate: bool) -> TestRun {
        let start = Instant::now();

        let outcome = if isolate {
            match isolation::spawn(index, case) {
                Ok(status) => isolation::classify(status),
                Err(err) => {
                    warn!(test = case.name(), error = %err, "could not run isolated test");
                    self.reporter.infrastructure_error(&err.to_string());
                    TestOutcome::Failed(Failure::Spawn(err.to_string()))
                }
            }
        } else {
            execute(case)
        };

        TestRun {
            name: case.name().to_string(),
            outcome,
            duration: start.elapsed(),
        }
    }

    fn run_child(&self, catalog: &Catalog, directive: &ChildDirective) -> ! {
        catalog.seal();
        let tests = catalog.snapshot();
        self.reporter.begin();

        let code = match isolation::resolve(&tests, directive) {
            Ok(case) => {
                debug!(test = case.name(), "running isolated test");
                let outcome = execute(case);
                if let TestOutcome::Failed(failure) = &outcome {
                    self.reporter.child_failure(failure);
                }
                isolation::exit_code(&outcome)
            }
            Err(err) => {
                self.reporter.infrastructure_error(&err.to_string());
                isolation::EXIT_INTERNAL
            }
        };

        process::exit(code)
    }
}

/// Run a test body in the current process and classify how it ended.
///
/// The abort signal, any other panic, and a returned error are all contained
/// here. Only something that kills the process escapes.
pub fn execute(case: &TestCase) -> TestOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| case.call())) {
        Ok(Ok(())) => TestOutcome::Passed,
        Ok(Err(err)) => TestOutcome::Failed(Failure::Errored(format!("{err:#}"))),
        Err(payload) if AssertionAbort::is_abort(payload.as_ref()) => {
            TestOutcome::Failed(Failure::Assertion)
        }
        Err(payload) => TestOutcome::Failed(Failure::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run every test registered in the process-wide catalog.
///
/// Reads `KTEST_FORK` and `KTEST_EXIT`. With `KTEST_EXIT=1` and at least one
/// failure this does not return: the process exits with status 1.
pub fn run_all() -> RunReport {
    let runner = Runner::from_env();
    let report = runner.run(catalog::global());

    if runner.config().should_exit(report.failed) {
        println!("Exiting...");
        process::exit(isolation::EXIT_FAILED);
    }

    report
}
