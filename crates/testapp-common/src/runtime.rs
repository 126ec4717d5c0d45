// Process-wide component runtime.
//
// Components may only be activated once the platform component runtime is
// up. Initialization happens at most once per process, on whichever thread
// asks first, and is never torn down: the runtime lives as long as the
// process does.

use crate::error::HarnessError;
use once_cell::sync::OnceCell;

static RUNTIME: OnceCell<ComponentRuntime> = OnceCell::new();

#[cfg(test)]
static INITIALIZATIONS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Marker for an initialized component runtime.
#[derive(Debug)]
pub struct ComponentRuntime {
    _private: (),
}

impl ComponentRuntime {
    /// Initialize the runtime if that has not happened yet.
    pub fn ensure_initialized() -> Result<&'static ComponentRuntime, HarnessError> {
        RUNTIME.get_or_try_init(|| {
            platform::initialize()?;
            #[cfg(test)]
            INITIALIZATIONS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            tracing::debug!("Component runtime initialized.");
            Ok(ComponentRuntime { _private: () })
        })
    }
}

#[cfg(windows)]
mod platform {
    use crate::error::HarnessError;
    use windows::Win32::System::Com::{CoInitializeEx, COINIT_MULTITHREADED};

    /// Join the multithreaded apartment so components activated on the main
    /// thread may be called from the worker thread without marshalling.
    pub(super) fn initialize() -> Result<(), HarnessError> {
        // SAFETY: Not called from `DllMain`. The matching `CoUninitialize` is
        // intentionally never issued; the apartment lives until process exit.
        unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) }
            .ok()
            .map_err(|e| HarnessError::Runtime(e.to_string()))
    }
}

#[cfg(not(windows))]
mod platform {
    use crate::error::HarnessError;

    pub(super) fn initialize() -> Result<(), HarnessError> {
        tracing::trace!("No platform component runtime on this target.");
        Ok(())
    }
}
