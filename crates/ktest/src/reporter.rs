//! Test reporter - console output for a run

use crate::runner::{Failure, RunReport, TestOutcome, TestRun};
use colored::*;
use std::time::Duration;

/// Test reporter with output configuration
#[derive(Debug, Clone, Default)]
pub struct TestReporter {
    /// Disable colored output
    no_color: bool,
}

impl TestReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Apply the color setting for the duration of a run
    pub fn begin(&self) {
        if self.no_color {
            colored::control::set_override(false);
        }
    }

    pub fn end(&self) {
        if self.no_color {
            colored::control::unset_override();
        }
    }

    /// Print the start marker for a test
    pub fn test_started(&self, name: &str) {
        println!("{}", start_line(name));
    }

    /// Print the pass/fail line for a finished test
    pub fn test_finished(&self, run: &TestRun) {
        println!("{}", finish_line(run));
    }

    /// Report a runner-level problem with one test
    pub fn infrastructure_error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    /// Explain a failure from inside an isolation child.
    ///
    /// The parent only sees the exit status, so panics and returned errors
    /// are described here.
    pub fn child_failure(&self, failure: &Failure) {
        if let Some(detail) = failure_detail(failure) {
            eprintln!("{}", detail.red());
        }
    }

    /// Print the summary block
    pub fn summary(&self, report: &RunReport, elapsed: Duration) {
        println!("{}", "## TEST RESULTS ##".bold());
        println!("  Tests passed: {}", report.passed.to_string().green());
        println!(
            "  Tests failed: {}",
            if report.failed > 0 {
                report.failed.to_string().red().bold()
            } else {
                report.failed.to_string().normal()
            }
        );
        println!("  Time: {:.2?}", elapsed);

        if report.failed > 0 {
            println!("{}", "## TESTS FAILED ##".red().bold());
        }
        println!();
    }
}

fn start_line(name: &str) -> String {
    format!("Running test: {}", name.cyan().bold())
}

fn finish_line(run: &TestRun) -> String {
    let name = run.name.cyan().bold();
    match &run.outcome {
        TestOutcome::Passed => format!("Test {} {}.", name, "passed".green().bold()),
        TestOutcome::Failed(failure) => {
            let failed = "failed".red().bold();
            match failure_detail(failure) {
                Some(detail) => format!("Test {name} {failed}. {detail}"),
                None => format!("Test {name} {failed}."),
            }
        }
    }
}

fn failure_detail(failure: &Failure) -> Option<String> {
    match failure {
        // Assertion failures were already reported where they happened.
        Failure::Assertion => None,
        Failure::ExitCode(code) if *code == crate::isolation::EXIT_FAILED => None,
        Failure::ExitCode(code) => Some(format!("Exit code: {code}")),
        Failure::Signal(signal) => Some(format!("Signal: {signal}")),
        Failure::Panicked(message) => Some(format!("Panicked: {message}")),
        Failure::Errored(message) => Some(format!("Error: {message}")),
        Failure::Spawn(message) => Some(format!("Could not start test: {message}")),
        Failure::Internal(message) => Some(format!("Internal error: {message}")),
    }
}
