use std::path::PathBuf;

use evdev::KeyCode;

/// Device watched when no path is given.
pub const DEFAULT_DEVICE: &str = "/dev/input/event1";

/// Key that flips tablet mode when no code is given.
pub const DEFAULT_KEY: KeyCode = KeyCode::KEY_POWER;

/// Which device to watch and which key toggles the switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerConfig {
    pub device_path: PathBuf,
    /// Compared against the event code as an `int`, so values outside the
    /// `u16` range are accepted and simply never match.
    pub key_code: i32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        TriggerConfig {
            device_path: PathBuf::from(DEFAULT_DEVICE),
            key_code: i32::from(DEFAULT_KEY.0),
        }
    }
}

impl TriggerConfig {
    /// Build from positional arguments, program name already skipped:
    /// `[source_device_path] [trigger_key_code]`. Extra arguments are ignored.
    pub fn from_args<I>(args: I) -> TriggerConfig
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = TriggerConfig::default();
        let mut args = args.into_iter();
        if let Some(path) = args.next() {
            config.device_path = PathBuf::from(path);
        }
        if let Some(code) = args.next() {
            config.key_code = parse_key_code(&code);
        }
        config
    }
}

/// Lenient integer parse: leading whitespace, optional sign, then as many
/// decimal digits as present. Garbage yields 0, overflow saturates.
pub fn parse_key_code(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
