// testapp-common: Shared services for the TestApp native harness.
// Depends on `testapp-sdk` and owns everything that touches the platform:
// component runtime setup, the built-in component registry, named events and
// the parent-process lifetime guard.

pub mod activator;
pub mod constants;
pub mod error;
pub mod exit_status;
pub mod logging;
pub mod named_event;
pub mod parent_watcher;
pub mod runtime;
pub mod settings;

// ---------------------------------------------------------------------------
// Re-exports for convenient access
// ---------------------------------------------------------------------------

pub use activator::{Activator, BuiltinComponentFactory};
pub use error::HarnessError;
pub use exit_status::ExitStatus;
pub use named_event::NamedEventComponent;
pub use parent_watcher::ParentWatcher;
pub use runtime::ComponentRuntime;
pub use settings::HarnessSettings;
