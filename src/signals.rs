//! Shutdown signals, delivered only while the loop is parked in `ppoll`.
//!
//! The signals stay blocked everywhere else, and the wait atomically swaps in
//! a mask with them unblocked. A signal therefore always surfaces as `EINTR`
//! from the wait and never lands between a readiness check and the next wait.

use std::io;
use std::mem;
use std::ptr;

use crate::{Error, Result};

pub const SHUTDOWN_SIGNALS: [libc::c_int; 3] = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP];

extern "C" fn interrupt_wait(_signal: libc::c_int) {}

/// Blocks [`SHUTDOWN_SIGNALS`] on the current thread until dropped.
pub struct ShutdownSignals {
    previous: libc::sigset_t,
    wait_mask: libc::sigset_t,
}

impl ShutdownSignals {
    pub fn install() -> Result<ShutdownSignals> {
        unsafe {
            let mut blocked: libc::sigset_t = mem::zeroed();
            libc::sigemptyset(&mut blocked);
            for &signal in &SHUTDOWN_SIGNALS {
                libc::sigaddset(&mut blocked, signal);
            }

            let mut previous: libc::sigset_t = mem::zeroed();
            let rc = libc::pthread_sigmask(libc::SIG_BLOCK, &blocked, &mut previous);
            if rc != 0 {
                return Err(Error::Signals(io::Error::from_raw_os_error(rc)));
            }
            let mut guard = ShutdownSignals {
                previous,
                wait_mask: previous,
            };

            // No SA_RESTART: the wait must return EINTR.
            let mut action: libc::sigaction = mem::zeroed();
            action.sa_sigaction = interrupt_wait as extern "C" fn(libc::c_int) as libc::sighandler_t;
            libc::sigemptyset(&mut action.sa_mask);
            action.sa_flags = 0;
            for &signal in &SHUTDOWN_SIGNALS {
                if libc::sigaction(signal, &action, ptr::null_mut()) < 0 {
                    return Err(Error::Signals(io::Error::last_os_error()));
                }
            }

            for &signal in &SHUTDOWN_SIGNALS {
                libc::sigdelset(&mut guard.wait_mask, signal);
            }
            Ok(guard)
        }
    }

    /// The mask to hand to `ppoll`: the caller's original mask with the
    /// shutdown signals unblocked.
    pub fn wait_mask(&self) -> libc::sigset_t {
        self.wait_mask
    }
}

impl Drop for ShutdownSignals {
    fn drop(&mut self) {
        unsafe {
            libc::pthread_sigmask(libc::SIG_SETMASK, &self.previous, ptr::null_mut());
        }
    }
}
