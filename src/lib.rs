//! Turn a key press on an evdev device into a `SW_TABLET_MODE` switch on a
//! uinput virtual device.
//!
//! Some convertibles report their fold/flip hinge as an ordinary key (often
//! `KEY_POWER` on a secondary device) instead of the tablet-mode switch that
//! desktops listen for. Each press of that key flips the virtual switch.

pub mod bridge;
pub mod config;
pub mod error;
pub mod session;
pub mod signals;
pub mod source;
pub mod virtual_switch;

pub use error::{Error, Result};
