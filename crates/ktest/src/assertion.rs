//! Assertion primitives
//!
//! Every assertion kind has an evaluator that turns the source text of its
//! operands and their values into an [`AssertionResult`]. Evaluators never
//! re-evaluate anything and never unwind; the `kassert_*!` macros hand their
//! result to [`enforce`], which reports a failure and raises the abort signal.
//!
//! # Kinds
//!
//! - `ASSERT_TRUE` / `ASSERT_FALSE` — boolean checks
//! - `ASSERT_EQ` / `ASSERT_NE` — equality via `PartialEq`
//! - `ASSERT_GT` / `ASSERT_GE` / `ASSERT_LT` / `ASSERT_LE` — ordering via `PartialOrd`
//! - `ASSERT_THROWS` — an expression evaluates to `Err` of a given error type

use colored::*;
use std::any::{type_name, Any};
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};
use std::panic::{self, Location};

/// Outcome of evaluating one assertion
///
/// The default value is a success with an empty message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    message: String,
    success: bool,
}

impl Default for AssertionResult {
    fn default() -> Self {
        Self {
            message: String::new(),
            success: true,
        }
    }
}

impl AssertionResult {
    /// Build a result from a message and a success flag
    pub fn new(message: impl Into<String>, success: bool) -> Self {
        Self {
            message: message.into(),
            success,
        }
    }

    /// A passing result with no message
    pub fn pass() -> Self {
        Self::default()
    }

    /// A failing result
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(message, false)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Unwind payload raised when an assertion fails.
///
/// Carries nothing beyond "this test failed here"; the details were already
/// written to stderr by [`enforce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssertionAbort;

impl AssertionAbort {
    /// Check whether a caught unwind payload is the abort signal
    pub fn is_abort(payload: &(dyn Any + Send)) -> bool {
        payload.is::<AssertionAbort>()
    }
}

// ============================================================================
// Boolean assertions
// ============================================================================

pub fn assert_true(text: &str, value: bool) -> AssertionResult {
    AssertionResult::new(
        format!("ASSERT_TRUE - Expected the following to be true:\n  '{text}': {value}"),
        value,
    )
}

pub fn assert_false(text: &str, value: bool) -> AssertionResult {
    AssertionResult::new(
        format!("ASSERT_FALSE - Expected the following to be false:\n  '{text}': {value}"),
        !value,
    )
}

// ============================================================================
// Equality assertions
// ============================================================================

/// `ASSERT_EQ` — `expected == actual`
pub fn assert_eq<E, A>(
    expected_text: &str,
    actual_text: &str,
    expected: &E,
    actual: &A,
) -> AssertionResult
where
    E: PartialEq<A> + Debug + ?Sized,
    A: Debug + ?Sized,
{
    AssertionResult::new(
        format!(
            "ASSERT_EQ - Expected the following to be equal:\n  '{expected_text}': {expected:?}\n  '{actual_text}': {actual:?}"
        ),
        expected.eq(actual),
    )
}

/// `ASSERT_NE` — `expected != actual`
pub fn assert_ne<E, A>(
    expected_text: &str,
    actual_text: &str,
    expected: &E,
    actual: &A,
) -> AssertionResult
where
    E: PartialEq<A> + Debug + ?Sized,
    A: Debug + ?Sized,
{
    AssertionResult::new(
        format!(
            "ASSERT_NE - Expected the following to be not equal:\n  '{expected_text}': {expected:?}\n  '{actual_text}': {actual:?}"
        ),
        expected.ne(actual),
    )
}

// ============================================================================
// Ordering assertions
// ============================================================================

fn ordering<A, B>(
    kind: &str,
    relation: &str,
    a_text: &str,
    b_text: &str,
    a: &A,
    b: &B,
    holds: bool,
) -> AssertionResult
where
    A: Debug + ?Sized,
    B: Debug + ?Sized,
{
    AssertionResult::new(
        format!(
            "{kind} - Expected the following 'a' to be {relation} 'b':\n  a: '{a_text}': {a:?}\n  b: '{b_text}': {b:?}"
        ),
        holds,
    )
}

pub fn assert_gt<A, B>(a_text: &str, b_text: &str, a: &A, b: &B) -> AssertionResult
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    ordering("ASSERT_GT", "greater than", a_text, b_text, a, b, a.gt(b))
}

pub fn assert_ge<A, B>(a_text: &str, b_text: &str, a: &A, b: &B) -> AssertionResult
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    ordering(
        "ASSERT_GE",
        "greater than or equal to",
        a_text,
        b_text,
        a,
        b,
        a.ge(b),
    )
}

pub fn assert_lt<A, B>(a_text: &str, b_text: &str, a: &A, b: &B) -> AssertionResult
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    ordering("ASSERT_LT", "less than", a_text, b_text, a, b, a.lt(b))
}

pub fn assert_le<A, B>(a_text: &str, b_text: &str, a: &A, b: &B) -> AssertionResult
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    ordering(
        "ASSERT_LE",
        "less than or equal to",
        a_text,
        b_text,
        a,
        b,
        a.le(b),
    )
}

// ============================================================================
// Error assertions
// ============================================================================

/// A raised error, seen through whichever wrapper carried it
enum Raised<'a> {
    Concrete(&'a dyn Any),
    Anyhow(&'a anyhow::Error),
    Boxed(&'a (dyn StdError + 'static)),
}

impl<'a> Raised<'a> {
    fn inspect<E: 'static>(err: &'a E) -> Self {
        let any = err as &dyn Any;
        if let Some(err) = any.downcast_ref::<anyhow::Error>() {
            Raised::Anyhow(err)
        } else if let Some(err) = any.downcast_ref::<Box<dyn StdError + Send + Sync>>() {
            Raised::Boxed(&**err)
        } else if let Some(err) = any.downcast_ref::<Box<dyn StdError>>() {
            Raised::Boxed(&**err)
        } else {
            Raised::Concrete(any)
        }
    }

    fn is<K: StdError + Send + Sync + 'static>(&self) -> bool {
        match self {
            Raised::Concrete(err) => err.is::<K>(),
            Raised::Anyhow(err) => err.is::<K>(),
            Raised::Boxed(err) => err.is::<K>(),
        }
    }

    /// `Debug` of the innermost error, which names its kind for wrapped errors
    fn root_debug(&self) -> Option<String> {
        match self {
            Raised::Concrete(_) => None,
            Raised::Anyhow(err) => Some(format!("{:?}", err.root_cause())),
            Raised::Boxed(err) => {
                let mut root: &(dyn StdError + 'static) = *err;
                while let Some(source) = root.source() {
                    root = source;
                }
                Some(format!("{root:?}"))
            }
        }
    }
}

/// `ASSERT_THROWS` — `outcome` is an `Err` whose error is a `K`.
///
/// Three outcomes are distinguished: the expected error (pass), some other
/// error (fail, naming the raised type and its description), and `Ok` (fail).
/// Errors carried in `anyhow::Error` or `Box<dyn Error>` are matched by
/// downcasting, and a mismatch reports the innermost error they wrap.
pub fn assert_throws<K, T, E>(kind_text: &str, code_text: &str, outcome: Result<T, E>) -> AssertionResult
where
    K: StdError + Send + Sync + 'static,
    E: Debug + Display + 'static,
{
    let raised = match outcome {
        Ok(_) => {
            return AssertionResult::fail(format!(
                "ASSERT_THROWS - Expected the error '{kind_text}' to be raised by the following code:\n  {code_text}\nbut no error was raised."
            ))
        }
        Err(err) => err,
    };

    let inspected = Raised::inspect(&raised);
    if inspected.is::<K>() {
        return AssertionResult::pass();
    }

    let raised_kind = type_name::<E>();
    let detail = inspected.root_debug().unwrap_or_else(|| format!("{raised:?}"));
    AssertionResult::fail(format!(
        "ASSERT_THROWS - Expected the error '{kind_text}' to be raised by the following code:\n  {code_text}\nbut a different error was raised: {raised_kind}(\"{raised}\")\n  raised: {detail}"
    ))
}

// ============================================================================
// Enforcement
// ============================================================================

/// Report a failed assertion and abort the current test.
///
/// Passing results return immediately. A failing result is written to stderr
/// together with the caller's location and the optional context, then the
/// abort signal is raised. Use the `kassert_*!` macros rather than calling
/// this directly.
#[track_caller]
pub fn enforce(result: AssertionResult, context: Option<fmt::Arguments<'_>>) {
    if result.is_success() {
        return;
    }

    let location = Location::caller();
    eprintln!(
        "{}:{}: {}",
        location.file(),
        location.line(),
        "Assertion Failure".red().bold()
    );
    eprintln!("{}", result.message());
    if let Some(context) = context {
        eprintln!("    {context}");
    }
    tracing::debug!(
        file = location.file(),
        line = location.line(),
        "assertion failed, aborting test"
    );

    raise_abort()
}

/// Raise the abort signal.
///
/// Uses `resume_unwind` so that the panic hook does not print a second report.
pub fn raise_abort() -> ! {
    panic::resume_unwind(Box::new(AssertionAbort))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::io;
    use std::num::ParseIntError;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[derive(Debug)]
    struct Timeout;

    impl Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "operation timed out")
        }
    }

    impl std::error::Error for Timeout {}

    fn parse(s: &str) -> Result<i32, ParseIntError> {
        s.parse()
    }

    #[test]
    fn test_default_result_is_success() {
        let result = AssertionResult::default();
        assert!(result.is_success());
        assert_eq!(result.message(), "");
    }

    #[test]
    fn test_true_message() {
        let result = assert_true("false", false);
        assert!(!result.is_success());
        assert_eq!(
            result.message(),
            "ASSERT_TRUE - Expected the following to be true:\n  'false': false"
        );
    }

    #[test]
    fn test_false_passes_on_false() {
        assert!(assert_false("1 > 2", 1 > 2).is_success());
        assert!(!assert_false("2 > 1", 2 > 1).is_success());
    }

    #[test]
    fn test_eq_message_shows_both_operands() {
        let result = super::assert_eq("2 + 2", "five", &(2 + 2), &5);
        assert!(!result.is_success());
        assert_eq!(
            result.message(),
            "ASSERT_EQ - Expected the following to be equal:\n  '2 + 2': 4\n  'five': 5"
        );
    }

    #[test]
    fn test_eq_across_types() {
        let owned = String::from("abc");
        assert!(super::assert_eq("owned", "\"abc\"", &owned, &"abc").is_success());
        assert!(super::assert_eq("\"abc\"", "owned", "abc", owned.as_str()).is_success());
    }

    #[test]
    fn test_ne() {
        assert!(assert_ne("1", "2", &1, &2).is_success());
        let result = assert_ne("x", "y", &3, &3);
        assert!(!result.is_success());
        assert!(result.message().starts_with("ASSERT_NE - "));
    }

    #[rstest]
    #[case(2, 1, true, true, false, false)]
    #[case(1, 1, false, true, false, true)]
    #[case(1, 2, false, false, true, true)]
    fn test_ordering_predicates(
        #[case] a: i32,
        #[case] b: i32,
        #[case] gt: bool,
        #[case] ge: bool,
        #[case] lt: bool,
        #[case] le: bool,
    ) {
        assert_eq!(assert_gt("a", "b", &a, &b).is_success(), gt);
        assert_eq!(assert_ge("a", "b", &a, &b).is_success(), ge);
        assert_eq!(assert_lt("a", "b", &a, &b).is_success(), lt);
        assert_eq!(assert_le("a", "b", &a, &b).is_success(), le);
    }

    #[rstest]
    #[case::gt(assert_gt("x", "y", &1, &2), "ASSERT_GT", "greater than 'b'")]
    #[case::ge(assert_ge("x", "y", &1, &2), "ASSERT_GE", "greater than or equal to 'b'")]
    #[case::lt(assert_lt("x", "y", &2, &1), "ASSERT_LT", "less than 'b'")]
    #[case::le(assert_le("x", "y", &2, &1), "ASSERT_LE", "less than or equal to 'b'")]
    fn test_ordering_labels(
        #[case] result: AssertionResult,
        #[case] kind: &str,
        #[case] relation: &str,
    ) {
        assert!(!result.is_success());
        assert!(result.message().starts_with(kind));
        assert!(result.message().contains(relation));
        assert!(result.message().contains("\n  a: 'x': "));
        assert!(result.message().contains("\n  b: 'y': "));
    }

    #[test]
    fn test_nan_is_not_ordered() {
        assert!(!assert_ge("nan", "0.0", &f64::NAN, &0.0).is_success());
        assert!(!assert_le("nan", "0.0", &f64::NAN, &0.0).is_success());
    }

    #[test]
    fn test_throws_expected_kind() {
        let result = assert_throws::<ParseIntError, _, _>("ParseIntError", "parse(\"x\")", parse("x"));
        assert!(result.is_success());
    }

    #[test]
    fn test_throws_expected_kind_through_anyhow() {
        let outcome: anyhow::Result<i32> = parse("x").map_err(anyhow::Error::from);
        let result = assert_throws::<ParseIntError, _, _>("ParseIntError", "parse", outcome);
        assert!(result.is_success());
    }

    #[test]
    fn test_throws_different_kind() {
        let result = assert_throws::<Timeout, _, _>("Timeout", "parse(\"x\")", parse("x"));
        assert!(!result.is_success());
        assert!(result.message().contains("a different error was raised"));
        assert!(result.message().contains("ParseIntError"));
        assert!(result.message().contains("invalid digit"));
    }

    #[test]
    fn test_throws_names_kind_wrapped_in_anyhow() {
        let outcome: anyhow::Result<()> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing").into());
        let result = assert_throws::<ParseIntError, _, _>("ParseIntError", "open()", outcome);
        assert!(!result.is_success());
        assert!(result.message().contains("anyhow::Error(\"missing\")"));
        assert!(result.message().contains("NotFound"));
    }

    #[test]
    fn test_throws_accepts_boxed_errors() {
        let outcome: Result<i32, Box<dyn std::error::Error + Send + Sync>> =
            parse("x").map_err(Into::into);
        let result = assert_throws::<ParseIntError, _, _>("ParseIntError", "parse", outcome);
        assert!(result.is_success());

        let outcome: Result<(), Box<dyn std::error::Error>> =
            Err(Box::new(io::Error::new(io::ErrorKind::NotFound, "missing")));
        let result = assert_throws::<ParseIntError, _, _>("ParseIntError", "open()", outcome);
        assert!(!result.is_success());
        assert!(result.message().contains("NotFound"));
    }

    #[test]
    fn test_throws_nothing_raised() {
        let result = assert_throws::<ParseIntError, _, _>("ParseIntError", "parse(\"7\")", parse("7"));
        assert!(!result.is_success());
        assert!(result.message().ends_with("but no error was raised."));
        assert!(result.message().contains("parse(\"7\")"));
    }

    #[test]
    fn test_enforce_success_returns() {
        enforce(AssertionResult::pass(), None);
    }

    #[test]
    fn test_enforce_failure_raises_abort() {
        let caught = catch_unwind(|| enforce(AssertionResult::fail("nope"), None));
        let payload = caught.expect_err("failed assertion must unwind");
        assert!(AssertionAbort::is_abort(payload.as_ref()));
    }

    #[test]
    fn test_code_after_failed_assertion_does_not_run() {
        let mut reached = false;
        let caught = catch_unwind(AssertUnwindSafe(|| {
            crate::kassert_eq!(1, 2, "context {}", 42);
            reached = true;
        }));
        assert!(caught.is_err());
        assert!(!reached);
    }

    #[test]
    fn test_passing_macros_continue() {
        let mut steps = 0;
        crate::kassert_true!(true);
        steps += 1;
        crate::kassert_false!(false);
        steps += 1;
        crate::kassert_eq!(2 + 2, 4);
        steps += 1;
        crate::kassert_ne!("a", "b");
        steps += 1;
        crate::kassert_gt!(3, 2);
        crate::kassert_ge!(3, 3);
        crate::kassert_lt!(2, 3);
        crate::kassert_le!(3, 3);
        steps += 1;
        crate::kassert_throws!(ParseIntError, parse("z"));
        steps += 1;
        assert_eq!(steps, 6);
    }

    #[test]
    fn test_operands_evaluated_once() {
        let mut calls = 0;
        let mut next = || {
            calls += 1;
            calls
        };
        crate::kassert_eq!(next(), 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_context_is_not_evaluated_when_passing() {
        let mut evaluated = false;
        crate::kassert_true!(true, "{}", {
            evaluated = true;
            1
        });
        crate::kassert_eq!(2 + 2, 4, "{}", {
            evaluated = true;
            2
        });
        crate::kassert_throws!(ParseIntError, parse("z"), "{}", {
            evaluated = true;
            3
        });
        assert!(!evaluated);
    }

    #[test]
    fn test_context_is_evaluated_when_failing() {
        let mut evaluated = false;
        let caught = catch_unwind(AssertUnwindSafe(|| {
            crate::kassert_lt!(3, 2, "{}", {
                evaluated = true;
                4
            });
        }));
        assert!(caught.is_err());
        assert!(evaluated);
    }

    #[test]
    fn test_operand_panic_is_not_an_assertion() {
        let caught = catch_unwind(|| {
            let values: Vec<i32> = Vec::new();
            crate::kassert_eq!(values[3], 0);
        });
        let payload = caught.expect_err("index out of bounds must unwind");
        assert!(!AssertionAbort::is_abort(payload.as_ref()));
    }

    proptest! {
        #[test]
        fn prop_comparisons_are_pure(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(super::assert_eq("a", "b", &a, &b), super::assert_eq("a", "b", &a, &b));
            prop_assert_eq!(assert_ne("a", "b", &a, &b), assert_ne("a", "b", &a, &b));
            prop_assert_eq!(assert_gt("a", "b", &a, &b), assert_gt("a", "b", &a, &b));
            prop_assert_eq!(assert_ge("a", "b", &a, &b), assert_ge("a", "b", &a, &b));
            prop_assert_eq!(assert_lt("a", "b", &a, &b), assert_lt("a", "b", &a, &b));
            prop_assert_eq!(assert_le("a", "b", &a, &b), assert_le("a", "b", &a, &b));
        }

        #[test]
        fn prop_eq_and_ne_disagree(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_ne!(
                super::assert_eq("a", "b", &a, &b).is_success(),
                assert_ne("a", "b", &a, &b).is_success()
            );
        }
    }
}
