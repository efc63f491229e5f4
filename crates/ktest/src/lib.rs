//! ktest - a small unit-testing library
//!
//! Tests are plain functions. They are registered, in order, into a
//! process-wide catalog and executed by a sequential runner that can isolate
//! each test in its own process so that a crash only fails that one test.
//!
//! # Example
//!
//! ```no_run
//! use ktest::{kassert_eq, kassert_true};
//!
//! fn arithmetic_holds() {
//!     kassert_eq!(2 + 2, 4);
//! }
//!
//! fn parses_numbers() -> anyhow::Result<()> {
//!     let n: i32 = "42".parse()?;
//!     kassert_true!(n > 0, "parsed {}", n);
//!     Ok(())
//! }
//!
//! ktest::ktest_main!(arithmetic_holds, parses_numbers);
//! ```
//!
//! # Environment
//!
//! - `KTEST_FORK=1` runs each test in its own child process
//! - `KTEST_EXIT=1` exits with status 1 after the report if any test failed
//! - `KTEST_NO_COLOR` / `NO_COLOR` disable colored output
//! - `KTEST_LOG=debug` enables diagnostic logs on stderr

#[macro_use]
mod macros;

pub mod assertion;
pub mod catalog;
pub mod config;
pub mod error;
pub mod isolation;
pub mod logging;
pub mod reporter;
pub mod runner;

pub use assertion::{AssertionAbort, AssertionResult};
pub use catalog::{register, Catalog, TestCase, TestReturn};
pub use config::Config;
pub use error::{KtestError, KtestResult};
pub use runner::{run_all, Failure, RunReport, Runner, TestOutcome, TestRun};
