//! Assertion and registration macros
//!
//! Every assertion macro evaluates each operand exactly once, captures its
//! source text with `stringify!`, and accepts optional trailing `format!`
//! arguments that are printed as context when the assertion fails. Context
//! arguments are only evaluated on failure.

#[doc(hidden)]
#[macro_export]
macro_rules! __kassert_enforce {
    ($result:expr) => {
        $crate::assertion::enforce($result, ::std::option::Option::None)
    };
    ($result:expr, $($arg:tt)+) => {{
        let result: $crate::assertion::AssertionResult = $result;
        if !result.is_success() {
            $crate::assertion::enforce(
                result,
                ::std::option::Option::Some(::std::format_args!($($arg)+)),
            );
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __kassert_binary {
    ($evaluator:ident, $a:expr, $b:expr) => {
        match (&$a, &$b) {
            (a, b) => $crate::assertion::$evaluator(
                ::std::stringify!($a),
                ::std::stringify!($b),
                a,
                b,
            ),
        }
    };
}

/// Asserts that an expression is `true`.
#[macro_export]
macro_rules! kassert_true {
    ($cond:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::assertion::assert_true(::std::stringify!($cond), $cond))
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!(
            $crate::assertion::assert_true(::std::stringify!($cond), $cond),
            $($arg)+
        )
    };
}

/// Asserts that an expression is `false`.
#[macro_export]
macro_rules! kassert_false {
    ($cond:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::assertion::assert_false(::std::stringify!($cond), $cond))
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!(
            $crate::assertion::assert_false(::std::stringify!($cond), $cond),
            $($arg)+
        )
    };
}

/// Asserts that two expressions are equal (`expected == actual`).
#[macro_export]
macro_rules! kassert_eq {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_eq, $expected, $actual))
    };
    ($expected:expr, $actual:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_eq, $expected, $actual), $($arg)+)
    };
}

/// Asserts that two expressions are not equal.
#[macro_export]
macro_rules! kassert_ne {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_ne, $expected, $actual))
    };
    ($expected:expr, $actual:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_ne, $expected, $actual), $($arg)+)
    };
}

/// Asserts `a > b`.
#[macro_export]
macro_rules! kassert_gt {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_gt, $a, $b))
    };
    ($a:expr, $b:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_gt, $a, $b), $($arg)+)
    };
}

/// Asserts `a >= b`.
#[macro_export]
macro_rules! kassert_ge {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_ge, $a, $b))
    };
    ($a:expr, $b:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_ge, $a, $b), $($arg)+)
    };
}

/// Asserts `a < b`.
#[macro_export]
macro_rules! kassert_lt {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_lt, $a, $b))
    };
    ($a:expr, $b:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_lt, $a, $b), $($arg)+)
    };
}

/// Asserts `a <= b`.
#[macro_export]
macro_rules! kassert_le {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_le, $a, $b))
    };
    ($a:expr, $b:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!($crate::__kassert_binary!(assert_le, $a, $b), $($arg)+)
    };
}

/// Asserts that an expression evaluates to `Err` holding the given error type.
///
/// ```no_run
/// use std::num::ParseIntError;
///
/// ktest::kassert_throws!(ParseIntError, "twelve".parse::<i32>());
/// ```
#[macro_export]
macro_rules! kassert_throws {
    ($kind:ty, $code:expr $(,)?) => {
        $crate::__kassert_enforce!($crate::assertion::assert_throws::<$kind, _, _>(
            ::std::stringify!($kind),
            ::std::stringify!($code),
            $code,
        ))
    };
    ($kind:ty, $code:expr, $($arg:tt)+) => {
        $crate::__kassert_enforce!(
            $crate::assertion::assert_throws::<$kind, _, _>(
                ::std::stringify!($kind),
                ::std::stringify!($code),
                $code,
            ),
            $($arg)+
        )
    };
}

/// Registers test functions in the global catalog, in the order listed.
///
/// Each test is named after its path as written.
#[macro_export]
macro_rules! register_tests {
    ($($test:path),* $(,)?) => {
        $(
            $crate::catalog::global().register(::std::stringify!($test), $test);
        )*
    };
}

/// Generates a `main` that registers the listed tests and runs them.
///
/// ```no_run
/// fn arithmetic_holds() {
///     ktest::kassert_eq!(2 + 2, 4);
/// }
///
/// ktest::ktest_main!(arithmetic_holds);
/// ```
#[macro_export]
macro_rules! ktest_main {
    ($($test:path),* $(,)?) => {
        fn main() {
            $crate::logging::init();
            $crate::register_tests!($($test),*);
            $crate::run_all();
        }
    };
}
