//! Shared helpers for `testapp-native` binary tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Upper bound for a single harness run.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

pub const PARENT_PID_VAR: &str = "CHAOSDBG_TEST_PARENT_PID";
pub const EVENT_DIR_VAR: &str = "CHAOSDBG_TEST_EVENT_DIR";

pub fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_testapp-native"))
}

/// Build a Command for the harness with a fresh event directory.
///
/// The returned temp dir guard must stay alive for the whole test.
pub fn harness_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let events = tempfile::tempdir().expect("create temp dir for events");
    let mut cmd = assert_cmd::Command::new(bin_path());
    cmd.timeout(TIMEOUT_BASIC)
        .env_remove("RUST_LOG")
        .env_remove(PARENT_PID_VAR)
        .env(EVENT_DIR_VAR, events.path());
    (cmd, events)
}

/// Path of the marker written when `event_name` is signalled.
pub fn marker(events: &Path, event_name: &str) -> PathBuf {
    events.join(format!("{event_name}.signal"))
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    condition()
}
