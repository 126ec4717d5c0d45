//! Argument handling of the `testapp-native` binary.

mod common;

use common::harness_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

#[test]
fn no_arguments_fails_before_activation() {
    let (mut cmd, events) = harness_cmd();
    cmd.assert()
        .code(1)
        .stderr(contains("Usage"))
        .stderr(contains("Activated").not());
    assert_eq!(std::fs::read_dir(events.path()).unwrap().count(), 0);
}

#[test]
fn single_argument_fails() {
    let (mut cmd, events) = harness_cmd();
    cmd.arg("1").assert().code(1);
    assert_eq!(std::fs::read_dir(events.path()).unwrap().count(), 0);
}

#[test]
fn help_flag_alone_is_too_few_arguments() {
    for flag in ["--help", "-V"] {
        let (mut cmd, events) = harness_cmd();
        cmd.arg(flag).assert().code(1);
        assert_eq!(std::fs::read_dir(events.path()).unwrap().count(), 0, "{flag}");
    }
}
