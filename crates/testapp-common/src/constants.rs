// Well-known names and values shared by the harness and the test runner that
// drives it. Changing any of these breaks the contract with the runner.

use std::time::Duration;
use testapp_sdk::ComponentId;

/// Environment variables read at startup.
pub mod variables {
    /// Process id of the test runner; enables the parent-lifetime guard.
    pub const PARENT_PROCESS_ID: &str = "CHAOSDBG_TEST_PARENT_PID";

    /// Directory that receives event marker files on platforms without
    /// named kernel events.
    pub const EVENT_DIRECTORY: &str = "CHAOSDBG_TEST_EVENT_DIR";
}

/// Component class identifiers.
pub mod components {
    use super::ComponentId;

    /// The example component exercised by the native test types.
    pub const EXAMPLE: ComponentId = ComponentId::from_u128(0x2c6e_9f4a_51d3_4b8e_a0f7_63c1_d84e_b295);
}

/// Thread names, visible to debuggers attached to the harness.
pub mod threads {
    pub const WORKER: &str = "testapp-worker";
    pub const PARENT_WATCHER: &str = "testapp-parent-watcher";
}

/// File extension of event marker files.
pub const EVENT_MARKER_EXTENSION: &str = "signal";

/// How often the parent watcher checks for the parent process where the
/// platform offers no waitable process handle.
pub const PARENT_POLL_INTERVAL: Duration = Duration::from_millis(100);
