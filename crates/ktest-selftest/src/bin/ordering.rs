//! Passing tests whose names do not sort in registration order.

use ktest::kassert_ne;

fn charlie() {
    kassert_ne!("charlie", "alpha");
}

fn alpha() {}

fn bravo() {}

ktest::ktest_main!(charlie, alpha, bravo, alpha);
