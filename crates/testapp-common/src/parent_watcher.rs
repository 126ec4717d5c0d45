// Parent-process lifetime guard.
//
// When the test runner passes its own process id in the environment, the
// harness starts a daemon thread that waits for that process to go away and
// then exits this process with status 0. The thread is never joined: its only
// cancellation is process exit. It may fire at any point, including while the
// worker is still running, and performs no cleanup besides releasing the
// parent handle.
//
// Everything here is best effort. A missing variable, an unparsable value or
// a parent that cannot be opened all leave the guard disabled.

use crate::constants::threads;
use crate::settings::HarnessSettings;
use std::thread::{self, JoinHandle};

/// A running parent watcher.
///
/// Dropping this value detaches the thread; it keeps watching regardless.
#[derive(Debug)]
pub struct ParentWatcher {
    parent_pid: u32,
    thread: JoinHandle<()>,
}

impl ParentWatcher {
    /// Start the guard if the settings name a parent process.
    ///
    /// When the parent exits, the current process exits with status 0.
    pub fn start(settings: &HarnessSettings) -> Option<Self> {
        let pid = settings.parent_process_id?;
        Self::start_with(pid, exit_current_process)
    }

    /// Watch `parent_pid` and call `on_parent_exit` once it has terminated.
    ///
    /// Returns `None` when the parent cannot be opened or the thread cannot
    /// be spawned.
    pub fn start_with<F>(parent_pid: u32, on_parent_exit: F) -> Option<Self>
    where
        F: FnOnce(u32) + Send + 'static,
    {
        let handle = match platform::ParentHandle::open(parent_pid) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::debug!("Not binding to parent process {}: {}", parent_pid, e);
                return None;
            }
        };

        let spawned = thread::Builder::new()
            .name(threads::PARENT_WATCHER.to_string())
            .spawn(move || {
                handle.wait();
                drop(handle);
                on_parent_exit(parent_pid);
            });

        match spawned {
            Ok(thread) => {
                tracing::info!("Bound lifetime to parent process {}.", parent_pid);
                Some(Self { parent_pid, thread })
            }
            Err(e) => {
                tracing::warn!("Failed to start parent watcher thread: {}", e);
                None
            }
        }
    }

    pub fn parent_pid(&self) -> u32 {
        self.parent_pid
    }

    /// Whether the watcher has already observed the parent's exit.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

fn exit_current_process(parent_pid: u32) {
    tracing::info!("Parent process {} exited; terminating.", parent_pid);
    std::process::exit(0);
}

#[cfg(unix)]
mod platform {
    use crate::constants::PARENT_POLL_INTERVAL;
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    use std::io;

    /// The parent pid, plus on Linux a pidfd that becomes readable as soon
    /// as the parent terminates, whether or not it has been reaped yet.
    pub(super) struct ParentHandle {
        pid: Pid,
        #[cfg(target_os = "linux")]
        pidfd: Option<std::os::fd::OwnedFd>,
    }

    impl ParentHandle {
        pub(super) fn open(pid: u32) -> io::Result<Self> {
            let raw = i32::try_from(pid).map_err(|_| io::Error::from(Errno::EINVAL))?;
            if raw <= 0 {
                return Err(io::Error::from(Errno::EINVAL));
            }
            let pid = Pid::from_raw(raw);
            check_alive(pid)?;

            Ok(Self {
                pid,
                #[cfg(target_os = "linux")]
                pidfd: linux::pidfd_open(pid)
                    .map_err(|e| {
                        tracing::debug!("pidfd_open({}) failed, polling instead: {}", pid, e);
                    })
                    .ok(),
            })
        }

        pub(super) fn wait(&self) {
            #[cfg(target_os = "linux")]
            if let Some(pidfd) = &self.pidfd {
                match linux::wait_readable(pidfd) {
                    Ok(()) => return,
                    Err(e) => tracing::debug!("Waiting on pidfd failed, polling instead: {}", e),
                }
            }

            // Without a pidfd an exited but unreaped parent still counts as
            // alive; the guard then fires once it is reaped.
            while check_alive(self.pid).is_ok() {
                std::thread::sleep(PARENT_POLL_INTERVAL);
            }
        }
    }

    /// `Ok` while the process exists. `EPERM` means it exists but belongs to
    /// someone else, which still counts as alive.
    fn check_alive(pid: Pid) -> Result<(), Errno> {
        match kill(pid, None) {
            Ok(()) | Err(Errno::EPERM) => Ok(()),
            Err(e) => Err(e),
        }
    }

    #[cfg(target_os = "linux")]
    mod linux {
        use nix::errno::Errno;
        use nix::unistd::Pid;
        use std::io;
        use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

        pub(super) fn pidfd_open(pid: Pid) -> io::Result<OwnedFd> {
            // SAFETY: pidfd_open(2) takes a pid and flags and returns a new
            // descriptor or -1.
            let fd = unsafe { libc::syscall(libc::SYS_pidfd_open, pid.as_raw(), 0) };
            if fd < 0 {
                return Err(io::Error::last_os_error());
            }
            // SAFETY: The kernel just handed us this descriptor; we own it.
            Ok(unsafe { OwnedFd::from_raw_fd(fd as RawFd) })
        }

        /// Block until `pidfd` is readable, i.e. the process has terminated.
        pub(super) fn wait_readable(pidfd: &OwnedFd) -> io::Result<()> {
            let mut pollfd = libc::pollfd {
                fd: pidfd.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            };
            loop {
                // SAFETY: `pollfd` is one valid entry for the whole call.
                let rc = unsafe { libc::poll(&mut pollfd, 1, -1) };
                if rc > 0 {
                    return Ok(());
                }
                if rc < 0 && Errno::last() != Errno::EINTR {
                    return Err(io::Error::last_os_error());
                }
            }
        }
    }
}

#[cfg(windows)]
mod platform {
    use std::io;
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Threading::{
        OpenProcess, WaitForSingleObject, INFINITE, PROCESS_SYNCHRONIZE,
    };

    pub(super) struct ParentHandle {
        handle: HANDLE,
    }

    // SAFETY: A process handle may be waited on and closed from any thread.
    unsafe impl Send for ParentHandle {}

    impl ParentHandle {
        pub(super) fn open(pid: u32) -> io::Result<Self> {
            // SAFETY: FFI call with no outstanding precondition.
            let handle = unsafe { OpenProcess(PROCESS_SYNCHRONIZE, false, pid) }
                .map_err(io::Error::other)?;
            Ok(Self { handle })
        }

        pub(super) fn wait(&self) {
            // SAFETY: The handle is open and owned by us.
            unsafe { WaitForSingleObject(self.handle, INFINITE) };
        }
    }

    impl Drop for ParentHandle {
        fn drop(&mut self) {
            // SAFETY: Closed exactly once, here.
            let _ = unsafe { CloseHandle(self.handle) };
        }
    }
}
