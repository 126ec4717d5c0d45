// testapp-sdk: Foundation layer for the TestApp native harness.
// This crate has ZERO dependencies on other testapp crates and provides the
// component abstractions the harness activates and drives.

pub mod component;
pub mod testing;

// Re-export commonly used items at crate root
pub use component::{ActivationError, Component, ComponentFactory, ComponentId, OperationError};
