// testapp-native: Native debuggee for the debugger engine tests.
//
// Activates the example component, signals the runner's event from a freshly
// spawned worker thread and exits. The runner attaches a debugger to this
// process and inspects the worker thread while it runs.

pub mod cli;
pub mod runner;

pub use cli::Args;
pub use runner::{RunRequest, Runner, TestType};
