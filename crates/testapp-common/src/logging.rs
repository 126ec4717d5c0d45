// Diagnostic logging setup.
//
// All diagnostics go to stderr through `tracing`; stdout is left to the test
// runner. The filter defaults to `info` and honours `RUST_LOG`.

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init() -> Result<()> {
    INSTALLED
        .get_or_try_init(|| {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_thread_names(true)
                .try_init()
                .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
        })
        .map(|_| ())
}

/// The operating-system id of the calling thread, as a debugger shows it.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn current_thread_id() -> String {
    nix::unistd::gettid().to_string()
}

/// The operating-system id of the calling thread, as a debugger shows it.
#[cfg(windows)]
pub fn current_thread_id() -> String {
    // SAFETY: No preconditions.
    unsafe { windows::Win32::System::Threading::GetCurrentThreadId() }.to_string()
}

/// Fallback for platforms without a cheap OS thread id: the runtime thread id.
#[cfg(not(any(target_os = "linux", target_os = "android", windows)))]
pub fn current_thread_id() -> String {
    format!("{:?}", std::thread::current().id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        // Another test binary may already own the global subscriber; either
        // way a second call must not fail.
        let first = init();
        if first.is_ok() {
            assert!(init().is_ok());
        }
    }

    #[test]
    fn thread_ids_differ_between_threads() {
        let main_id = current_thread_id();
        let other_id = std::thread::spawn(current_thread_id).join().unwrap();
        assert!(!main_id.is_empty());
        assert_ne!(main_id, other_id);
    }
}
