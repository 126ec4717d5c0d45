// Component and factory abstractions.
//
// A component is an external object located by a fixed identifier that
// exposes one operation: signal an event by name. How the object is located
// and constructed is hidden behind `ComponentFactory`, so the harness can run
// against a platform backend or an in-process test double.

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Well-known identifier of a component class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(Uuid);

impl ComponentId {
    /// Build an identifier from its 128-bit GUID value.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ComponentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Registry-style braced GUID, e.g. {0b3a....}
        write!(f, "{{{}}}", self.0.hyphenated())
    }
}

/// The capability every activated component exposes.
///
/// Implementations must be `Sync`: the harness hands a shared reference to a
/// worker thread while the activating thread keeps ownership.
pub trait Component: Send + Sync {
    /// Short name used for diagnostic tracing.
    fn name(&self) -> &str;

    /// Signal the event identified by `event_name`.
    fn signal(&self, event_name: &str) -> Result<(), OperationError>;
}

/// Locates and constructs components by identifier.
pub trait ComponentFactory: Send + Sync {
    /// Create a new instance of the component registered under `id`.
    fn create(&self, id: &ComponentId) -> Result<Box<dyn Component>, ActivationError>;
}

/// The factory could not produce the requested component.
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("component {0} is not registered")]
    NotRegistered(ComponentId),

    #[error("failed to construct component {id}: {reason}")]
    Construction { id: ComponentId, reason: String },
}

/// A call on an activated component failed.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid event name '{0}'")]
    InvalidEventName(String),

    #[error("failed to signal event '{name}'")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to signal event '{name}': {reason}")]
    Failed { name: String, reason: String },
}
