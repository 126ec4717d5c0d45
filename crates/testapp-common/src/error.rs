// Harness error taxonomy. Every variant ends the run; nothing is retried.

use crate::exit_status::ExitStatus;
use testapp_sdk::{ActivationError, OperationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Missing or malformed command-line arguments.
    #[error("{0}")]
    Argument(String),

    /// The process-wide component runtime could not be set up.
    #[error("failed to initialize component runtime: {0}")]
    Runtime(String),

    #[error("failed to start worker thread")]
    WorkerSpawn(#[source] std::io::Error),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("worker thread panicked")]
    WorkerPanicked,
}

impl HarnessError {
    /// The exit status reported for this failure.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            HarnessError::Argument(_) => ExitStatus::ArgumentError,
            HarnessError::Runtime(_) | HarnessError::WorkerSpawn(_) => ExitStatus::RuntimeError,
            HarnessError::Activation(_) => ExitStatus::ActivationError,
            HarnessError::Operation(_) => ExitStatus::OperationError,
            HarnessError::WorkerPanicked => ExitStatus::WorkerPanicked,
        }
    }
}
