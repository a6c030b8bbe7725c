//! The evdev side: a non-blocking descriptor on the real input device and the
//! single wait the program parks in.

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::mem;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::ptr;

use evdev::InputEvent;

use crate::{Error, Result};

/// Size of one `input_event` record as the kernel hands it out.
pub const EVENT_SIZE: usize = mem::size_of::<libc::input_event>();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Data is pending on the descriptor.
    Readable,
    /// A shutdown signal arrived during the wait.
    Interrupted,
    /// The wait returned without the descriptor readable.
    Idle,
}

/// Where the loop gets input events from.
pub trait EventSource {
    fn wait_readable(&mut self) -> Result<Readiness>;
    fn read_event(&mut self) -> Option<InputEvent>;
}

pub struct SourceDevice {
    file: File,
    path: PathBuf,
    wait_mask: Option<libc::sigset_t>,
}

impl SourceDevice {
    /// Open `path` read-only and non-blocking. Whether the path is actually an
    /// evdev node is left to the kernel.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SourceDevice> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|source| Error::DeviceOpen {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(SourceDevice {
            file,
            path: path.to_path_buf(),
            wait_mask: None,
        })
    }

    /// Signal mask installed for the duration of each wait.
    pub fn with_wait_mask(mut self, mask: libc::sigset_t) -> SourceDevice {
        self.wait_mask = Some(mask);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for SourceDevice {
    /// Block with no timeout until the device is readable or a signal
    /// interrupts the wait.
    fn wait_readable(&mut self) -> Result<Readiness> {
        let mut fds = [libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        }];
        let mask = self
            .wait_mask
            .as_ref()
            .map_or(ptr::null(), |mask| mask as *const libc::sigset_t);

        let result = unsafe {
            libc::ppoll(
                fds.as_mut_ptr(),
                fds.len() as libc::nfds_t,
                ptr::null(),
                mask,
            )
        };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(Readiness::Interrupted);
            }
            return Err(Error::Multiplexer(err));
        }

        let revents = fds[0].revents;
        if result > 0 && revents & libc::POLLIN != 0 {
            Ok(Readiness::Readable)
        } else if revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            Err(Error::Multiplexer(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("{} hung up", self.path.display()),
            )))
        } else {
            Ok(Readiness::Idle)
        }
    }

    /// One read of exactly one record. Anything else is dropped.
    fn read_event(&mut self) -> Option<InputEvent> {
        let mut buf = [0u8; EVENT_SIZE];
        match self.file.read(&mut buf) {
            Ok(n) => {
                let event = decode_event(&buf[..n]);
                if event.is_none() {
                    log::debug!("discarding {}-byte read from {}", n, self.path.display());
                }
                event
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => None,
            Err(err) => {
                log::debug!("read from {} failed: {}", self.path.display(), err);
                None
            }
        }
    }
}

impl Drop for SourceDevice {
    fn drop(&mut self) {
        log::info!("closing {}", self.path.display());
    }
}

/// Interpret `bytes` as a single `input_event`, only if the length matches
/// exactly.
pub fn decode_event(bytes: &[u8]) -> Option<InputEvent> {
    if bytes.len() != EVENT_SIZE {
        return None;
    }
    let raw: libc::input_event =
        unsafe { ptr::read_unaligned(bytes.as_ptr() as *const libc::input_event) };
    Some(InputEvent::new(raw.type_, raw.code, raw.value))
}
