// Component activation.
//
// `Activator` resolves the one component the harness drives through a
// pluggable `ComponentFactory`. Production runs use `BuiltinComponentFactory`;
// tests hand in a double from `testapp_sdk::testing`.

use crate::constants::components;
use crate::named_event::NamedEventComponent;
use crate::settings::HarnessSettings;
use std::path::PathBuf;
use std::sync::Arc;
use testapp_sdk::{ActivationError, Component, ComponentFactory, ComponentId};

/// Obtains references to a fixed component through a factory.
#[derive(Clone)]
pub struct Activator {
    factory: Arc<dyn ComponentFactory>,
    component_id: ComponentId,
}

impl Activator {
    pub fn new(factory: Arc<dyn ComponentFactory>, component_id: ComponentId) -> Self {
        Self {
            factory,
            component_id,
        }
    }

    /// An activator for the example component backed by the built-in registry.
    pub fn builtin(settings: &HarnessSettings) -> Self {
        Self::new(
            Arc::new(BuiltinComponentFactory::new(settings.event_directory())),
            components::EXAMPLE,
        )
    }

    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    /// Create a fresh component instance, owned by the caller.
    pub fn activate(&self) -> Result<Box<dyn Component>, ActivationError> {
        tracing::debug!("Activating component {}.", self.component_id);
        match self.factory.create(&self.component_id) {
            Ok(component) => {
                tracing::info!(
                    "Activated component {} ({}).",
                    self.component_id,
                    component.name()
                );
                Ok(component)
            }
            Err(e) => {
                tracing::error!("Activation of component {} failed: {}", self.component_id, e);
                Err(e)
            }
        }
    }
}

/// The components this binary knows how to construct in-process.
#[derive(Debug, Clone)]
pub struct BuiltinComponentFactory {
    event_directory: PathBuf,
}

impl BuiltinComponentFactory {
    pub fn new(event_directory: impl Into<PathBuf>) -> Self {
        Self {
            event_directory: event_directory.into(),
        }
    }
}

impl ComponentFactory for BuiltinComponentFactory {
    fn create(&self, id: &ComponentId) -> Result<Box<dyn Component>, ActivationError> {
        if *id == components::EXAMPLE {
            return Ok(Box::new(NamedEventComponent::new(self.event_directory.clone())));
        }
        Err(ActivationError::NotRegistered(*id))
    }
}
