//! A test that kills its own process, surrounded by passing tests.

use ktest::kassert_ge;
use std::process;

fn before_crash() {
    kassert_ge!(3, 3);
}

fn aborts_process() {
    process::abort();
}

fn exits_with_three() {
    process::exit(3);
}

fn after_crash() {}

ktest::ktest_main!(before_crash, aborts_process, exits_with_three, after_crash);
