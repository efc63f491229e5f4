//! A mix of passing and failing tests, one of every failure category.

use ktest::{kassert_eq, kassert_lt, kassert_throws, kassert_true};
use std::num::ParseIntError;

fn arithmetic_holds() {
    kassert_eq!(2 + 2, 4);
}

fn false_is_not_true() {
    kassert_true!(false);
    println!("unreachable: code after a failed assertion ran");
}

fn ordering_holds() {
    kassert_lt!(1, 2, "one should sort before two");
}

fn panics_outside_assertion() {
    let limits: Vec<u32> = Vec::new();
    let first = limits.first().copied();
    if first.is_none() {
        panic!("no limits configured");
    }
}

fn returns_error() -> anyhow::Result<()> {
    let port: u16 = "eighty".parse()?;
    kassert_eq!(port, 80);
    Ok(())
}

fn parse_rejects_words() {
    kassert_throws!(ParseIntError, "twelve".parse::<i32>());
}

ktest::ktest_main!(
    arithmetic_holds,
    false_is_not_true,
    ordering_holds,
    panics_outside_assertion,
    returns_error,
    parse_rejects_words,
);
