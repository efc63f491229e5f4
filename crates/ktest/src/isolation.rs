//! Per-test process isolation
//!
//! In isolation mode the runner re-executes the current binary once per test
//! with a directive naming that test (`KTEST_CHILD`). The child performs the
//! same registrations as the parent, so the catalog index addresses the same
//! test in both processes. The child runs only that test and reports through
//! its exit status:
//!
//! - `0`: the test passed
//! - `1`: the test failed (assertion, panic, or returned error)
//! - `2`: internal error (bad directive, catalog mismatch)
//!
//! Anything else, including death by signal, is a failure observed by the parent.

use crate::catalog::TestCase;
use crate::config::{ChildDirective, CHILD_ENV, CHILD_NAME_ENV};
use crate::error::{KtestError, KtestResult};
use crate::runner::{Failure, TestOutcome};
use std::env;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Whether this platform can spawn isolation children
pub const SUPPORTED: bool = cfg!(any(unix, windows));

pub const EXIT_PASSED: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_INTERNAL: i32 = 2;

/// Run test `index` in a fresh copy of the current executable and wait for it.
pub fn spawn(index: usize, case: &TestCase) -> KtestResult<ExitStatus> {
    let exe = env::current_exe().map_err(KtestError::CurrentExe)?;
    debug!(test = case.name(), index, exe = %exe.display(), "spawning isolated test");

    let mut child = Command::new(&exe)
        .args(env::args_os().skip(1))
        .env(CHILD_ENV, index.to_string())
        .env(CHILD_NAME_ENV, case.name())
        .spawn()
        .map_err(|source| KtestError::Spawn {
            name: case.name().to_string(),
            source,
        })?;

    let status = child.wait().map_err(|source| KtestError::Wait {
        name: case.name().to_string(),
        source,
    })?;
    debug!(test = case.name(), %status, "isolated test finished");
    Ok(status)
}

/// Map a child's exit status to a test outcome
pub fn classify(status: ExitStatus) -> TestOutcome {
    if status.success() {
        return TestOutcome::Passed;
    }
    if let Some(code) = status.code() {
        return TestOutcome::Failed(Failure::ExitCode(code));
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return TestOutcome::Failed(Failure::Signal(signal_name(signal)));
        }
    }

    TestOutcome::Failed(Failure::Internal(format!(
        "test process ended without an exit status: {status}"
    )))
}

/// Human-readable name of a POSIX signal number
pub fn signal_name(signal: i32) -> String {
    let name = match signal {
        1 => "SIGHUP",
        2 => "SIGINT",
        3 => "SIGQUIT",
        4 => "SIGILL",
        5 => "SIGTRAP",
        6 => "SIGABRT",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        7 => "SIGBUS",
        #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
        10 => "SIGBUS",
        8 => "SIGFPE",
        9 => "SIGKILL",
        11 => "SIGSEGV",
        13 => "SIGPIPE",
        14 => "SIGALRM",
        15 => "SIGTERM",
        _ => return format!("signal {signal}"),
    };
    name.to_string()
}

/// Find the test an isolation child was asked to run
pub fn resolve<'a>(tests: &'a [TestCase], directive: &ChildDirective) -> KtestResult<&'a TestCase> {
    let index: usize = directive
        .index
        .trim()
        .parse()
        .map_err(|_| KtestError::InvalidChildDirective(directive.index.clone()))?;

    let case = tests.get(index).ok_or(KtestError::UnknownChild {
        index,
        len: tests.len(),
    })?;

    if let Some(expected) = &directive.name {
        if expected != case.name() {
            return Err(KtestError::ChildMismatch {
                index,
                expected: expected.clone(),
                found: case.name().to_string(),
            });
        }
    }

    Ok(case)
}

/// Exit status a child reports for an outcome
pub fn exit_code(outcome: &TestOutcome) -> i32 {
    if outcome.is_pass() {
        EXIT_PASSED
    } else {
        EXIT_FAILED
    }
}
