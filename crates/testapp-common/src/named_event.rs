// The built-in example component: signals a named, process-external event the
// test runner is waiting on.
//
// On Windows this is a manual-reset kernel event. Elsewhere the event is a
// marker file `<event dir>/<name>.signal`, created atomically and holding the
// id of the signalling process.

use std::path::PathBuf;
use testapp_sdk::{Component, OperationError};

#[derive(Debug, Clone)]
pub struct NamedEventComponent {
    #[cfg_attr(windows, allow(dead_code))]
    event_directory: PathBuf,
}

impl NamedEventComponent {
    pub fn new(event_directory: impl Into<PathBuf>) -> Self {
        Self {
            event_directory: event_directory.into(),
        }
    }
}

impl Component for NamedEventComponent {
    fn name(&self) -> &str {
        "NamedEvent"
    }

    fn signal(&self, event_name: &str) -> Result<(), OperationError> {
        validate_event_name(event_name)?;
        self.set_event(event_name)?;
        tracing::info!("Signalled event '{}'.", event_name);
        Ok(())
    }
}

fn validate_event_name(name: &str) -> Result<(), OperationError> {
    let invalid = name.is_empty() || name.contains('\0') || is_reserved(name);
    if invalid {
        return Err(OperationError::InvalidEventName(name.to_string()));
    }
    Ok(())
}

// Kernel object names may carry a `Global\` or `Local\` namespace prefix.
#[cfg(windows)]
fn is_reserved(name: &str) -> bool {
    name.ends_with('\\')
}

// The name becomes a file name inside the event directory.
#[cfg(not(windows))]
fn is_reserved(name: &str) -> bool {
    name == "." || name == ".." || name.contains('/') || name.contains('\\')
}

#[cfg(windows)]
impl NamedEventComponent {
    fn set_event(&self, event_name: &str) -> Result<(), OperationError> {
        use windows::core::{HSTRING, PCWSTR};
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::{CreateEventW, SetEvent};

        let failed = |e: windows::core::Error| OperationError::Failed {
            name: event_name.to_string(),
            reason: e.to_string(),
        };

        let wide = HSTRING::from(event_name);

        // SAFETY: `wide` is NUL terminated and outlives the call. Opens the
        // existing event if the runner already created it.
        let handle = unsafe { CreateEventW(None, true, false, PCWSTR::from_raw(wide.as_ptr())) }
            .map_err(failed)?;

        // SAFETY: `handle` was returned by `CreateEventW` above.
        let result = unsafe { SetEvent(handle) }.map_err(failed);

        // SAFETY: We own the handle and close it exactly once.
        let _ = unsafe { CloseHandle(handle) };

        result
    }
}

#[cfg(not(windows))]
impl NamedEventComponent {
    fn set_event(&self, event_name: &str) -> Result<(), OperationError> {
        use crate::constants::EVENT_MARKER_EXTENSION;
        use std::fs;

        let io_failed = |source: std::io::Error| OperationError::Io {
            name: event_name.to_string(),
            source,
        };

        let marker = self
            .event_directory
            .join(format!("{event_name}.{EVENT_MARKER_EXTENSION}"));
        let staging = self
            .event_directory
            .join(format!(".{event_name}.{}.tmp", std::process::id()));

        // Write then rename, so a waiting runner never sees a partial marker.
        fs::write(&staging, format!("{}\n", std::process::id())).map_err(io_failed)?;
        if let Err(e) = fs::rename(&staging, &marker) {
            let _ = fs::remove_file(&staging);
            return Err(io_failed(e));
        }

        tracing::debug!("Wrote event marker {}.", marker.display());
        Ok(())
    }
}
