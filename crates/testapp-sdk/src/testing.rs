//! In-process test doubles for the component abstractions.
//!
//! `RecordingFactory` stands in for the platform activation backend: every
//! component it creates appends to a shared [`SignalLog`], which tests inspect
//! after the harness has run.

use crate::component::{ActivationError, Component, ComponentFactory, ComponentId, OperationError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;

/// One observed `signal` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRecord {
    pub event_name: String,
    pub thread_id: ThreadId,
}

/// Shared, append-only log of signal calls.
#[derive(Debug, Clone, Default)]
pub struct SignalLog {
    records: Arc<Mutex<Vec<SignalRecord>>>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all recorded calls in order.
    pub fn records(&self) -> Vec<SignalRecord> {
        self.records.lock().clone()
    }

    /// Return just the event names, in call order.
    pub fn event_names(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.event_name.clone())
            .collect()
    }

    fn push(&self, event_name: &str) {
        self.records.lock().push(SignalRecord {
            event_name: event_name.to_string(),
            thread_id: std::thread::current().id(),
        });
    }
}

/// A component that records every signal into a [`SignalLog`].
#[derive(Debug)]
pub struct RecordingComponent {
    log: SignalLog,
    fail_with: Option<String>,
}

impl RecordingComponent {
    pub fn new(log: SignalLog) -> Self {
        Self {
            log,
            fail_with: None,
        }
    }

    /// A component whose `signal` records the call, then fails with `reason`.
    pub fn failing(log: SignalLog, reason: impl Into<String>) -> Self {
        Self {
            log,
            fail_with: Some(reason.into()),
        }
    }
}

impl Component for RecordingComponent {
    fn name(&self) -> &str {
        "RecordingComponent"
    }

    fn signal(&self, event_name: &str) -> Result<(), OperationError> {
        self.log.push(event_name);
        match &self.fail_with {
            Some(reason) => Err(OperationError::Failed {
                name: event_name.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// A factory that knows exactly one component id and hands out
/// [`RecordingComponent`]s for it.
#[derive(Debug)]
pub struct RecordingFactory {
    id: ComponentId,
    log: SignalLog,
    activation_failure: Option<String>,
    signal_failure: Option<String>,
    activations: AtomicUsize,
}

impl RecordingFactory {
    pub fn new(id: ComponentId, log: SignalLog) -> Self {
        Self {
            id,
            log,
            activation_failure: None,
            signal_failure: None,
            activations: AtomicUsize::new(0),
        }
    }

    /// Make every `create` call fail with `reason`.
    pub fn fail_activation(mut self, reason: impl Into<String>) -> Self {
        self.activation_failure = Some(reason.into());
        self
    }

    /// Make every created component fail its `signal` call with `reason`.
    pub fn fail_signal(mut self, reason: impl Into<String>) -> Self {
        self.signal_failure = Some(reason.into());
        self
    }

    /// Number of `create` calls made so far, successful or not.
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

impl ComponentFactory for RecordingFactory {
    fn create(&self, id: &ComponentId) -> Result<Box<dyn Component>, ActivationError> {
        self.activations.fetch_add(1, Ordering::SeqCst);

        if *id != self.id {
            return Err(ActivationError::NotRegistered(*id));
        }
        if let Some(reason) = &self.activation_failure {
            return Err(ActivationError::Construction {
                id: *id,
                reason: reason.clone(),
            });
        }

        let component = match &self.signal_failure {
            Some(reason) => RecordingComponent::failing(self.log.clone(), reason.clone()),
            None => RecordingComponent::new(self.log.clone()),
        };
        Ok(Box::new(component))
    }
}
