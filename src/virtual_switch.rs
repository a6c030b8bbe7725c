//! The uinput side: a virtual device exposing only `SW_TABLET_MODE`.

use std::io;
use std::mem;
use std::os::fd::AsRawFd;
use std::path::PathBuf;

use evdev::uinput::VirtualDevice;
use evdev::{AttributeSet, BusType, InputEvent, InputId, SwitchCode};

use crate::{Error, Result};

pub const DEVICE_NAME: &str = "Fake Intel HID switches";

/// Bus and ids reported by the virtual device.
pub fn device_id() -> InputId {
    InputId::new(BusType::BUS_HOST, 0x1234, 0x1234, 0x1234)
}

const UINPUT_PATH: &str = "/dev/uinput";

/// Somewhere synthetic events can be written one record at a time.
pub trait SwitchSink {
    fn emit(&mut self, event: InputEvent) -> Result<()>;
}

/// A created uinput device. Dropping it destroys the device and closes the
/// control descriptor.
pub struct VirtualSwitch {
    device: VirtualDevice,
}

impl VirtualSwitch {
    /// Declare `EV_SW` + `SW_TABLET_MODE`, write the descriptor and create the
    /// device. On failure the control descriptor is closed before returning.
    pub fn create(name: &str, id: InputId) -> Result<VirtualSwitch> {
        let switches = AttributeSet::<SwitchCode>::from_iter([SwitchCode::SW_TABLET_MODE]);

        let builder = VirtualDevice::builder().map_err(|source| Error::DeviceOpen {
            path: PathBuf::from(UINPUT_PATH),
            source,
        })?;
        let device = builder
            .name(name)
            .input_id(id)
            .with_switches(&switches)
            .and_then(|builder| builder.build())
            .map_err(Error::DeviceCreate)?;

        Ok(VirtualSwitch { device })
    }
}

impl SwitchSink for VirtualSwitch {
    /// Write a single `input_event`. `VirtualDevice::emit` appends its own
    /// `SYN_REPORT`, so the record is written directly to keep sync placement
    /// under the caller's control.
    fn emit(&mut self, event: InputEvent) -> Result<()> {
        let mut raw: libc::input_event = unsafe { mem::zeroed() };
        raw.type_ = event.event_type().0;
        raw.code = event.code();
        raw.value = event.value();

        let size = mem::size_of::<libc::input_event>();
        let written = unsafe {
            libc::write(
                self.device.as_raw_fd(),
                &raw as *const libc::input_event as *const libc::c_void,
                size,
            )
        };
        if written < 0 {
            return Err(Error::EmitWrite(io::Error::last_os_error()));
        }
        if written as usize != size {
            return Err(Error::EmitWrite(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write of {} of {} bytes", written, size),
            )));
        }
        Ok(())
    }
}

impl Drop for VirtualSwitch {
    fn drop(&mut self) {
        log::info!("destroying virtual device {:?}", DEVICE_NAME);
    }
}
