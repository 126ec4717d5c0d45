// Process exit statuses reported to the test runner.

use std::process::ExitCode;

/// Outcome of one harness run, encoded as the process exit code.
///
/// The exit code is the only error signal the runner relies on, so every
/// failing step gets its own non-zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitStatus {
    Success = 0,
    ArgumentError = 1,
    RuntimeError = 2,
    ActivationError = 3,
    OperationError = 4,
    WorkerPanicked = 5,
}

impl ExitStatus {
    /// Create an `ExitStatus` from a process exit code.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(ExitStatus::Success),
            1 => Some(ExitStatus::ArgumentError),
            2 => Some(ExitStatus::RuntimeError),
            3 => Some(ExitStatus::ActivationError),
            4 => Some(ExitStatus::OperationError),
            5 => Some(ExitStatus::WorkerPanicked),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitStatus::Success => write!(f, "Success"),
            ExitStatus::ArgumentError => write!(f, "ArgumentError"),
            ExitStatus::RuntimeError => write!(f, "RuntimeError"),
            ExitStatus::ActivationError => write!(f, "ActivationError"),
            ExitStatus::OperationError => write!(f, "OperationError"),
            ExitStatus::WorkerPanicked => write!(f, "WorkerPanicked"),
        }
    }
}
