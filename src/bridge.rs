use evdev::{EventType, InputEvent, SwitchCode, SynchronizationCode};

use crate::virtual_switch::SwitchSink;

const KEY_PRESSED: i32 = 1;

/// Flips tablet mode on each press of the trigger key. Releases and
/// autorepeats are ignored, so holding the key does not re-toggle.
pub struct ToggleBridge {
    key_code: i32,
    tablet_mode: bool,
}

impl ToggleBridge {
    pub fn new(key_code: i32) -> ToggleBridge {
        ToggleBridge {
            key_code,
            tablet_mode: false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.tablet_mode
    }

    fn is_trigger(&self, event: &InputEvent) -> bool {
        event.event_type() == EventType::KEY
            && i32::from(event.code()) == self.key_code
            && event.value() == KEY_PRESSED
    }

    /// Feed one event. On a trigger press, returns the new state after writing
    /// the switch event and its `SYN_REPORT` to `sink`.
    pub fn handle<S: SwitchSink>(&mut self, event: &InputEvent, sink: &mut S) -> Option<bool> {
        if !self.is_trigger(event) {
            return None;
        }
        self.tablet_mode = !self.tablet_mode;
        log::debug!("SW_TABLET_MODE {}", self.tablet_mode as i32);

        let frame = [
            InputEvent::new(
                EventType::SWITCH.0,
                SwitchCode::SW_TABLET_MODE.0,
                self.tablet_mode as i32,
            ),
            InputEvent::new(
                EventType::SYNCHRONIZATION.0,
                SynchronizationCode::SYN_REPORT.0,
                0,
            ),
        ];
        // A failed write is not retried: the key press is already consumed,
        // and the next press will try again.
        for event in frame {
            if let Err(err) = sink.emit(event) {
                log::warn!("{}", err);
            }
        }
        Some(self.tablet_mode)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use evdev::KeyCode;

    use super::*;
    use crate::{Error, Result};

    #[derive(Default)]
    struct Recorder {
        emitted: Vec<(EventType, u16, i32)>,
        fail_switch: bool,
    }

    impl SwitchSink for Recorder {
        fn emit(&mut self, event: InputEvent) -> Result<()> {
            self.emitted
                .push((event.event_type(), event.code(), event.value()));
            if self.fail_switch && event.event_type() == EventType::SWITCH {
                return Err(Error::EmitWrite(io::Error::from_raw_os_error(libc::EAGAIN)));
            }
            Ok(())
        }
    }

    const POWER: u16 = KeyCode::KEY_POWER.0;

    fn key(code: u16, value: i32) -> InputEvent {
        InputEvent::new(EventType::KEY.0, code, value)
    }

    fn switch(value: i32) -> (EventType, u16, i32) {
        (EventType::SWITCH, SwitchCode::SW_TABLET_MODE.0, value)
    }

    fn syn() -> (EventType, u16, i32) {
        (EventType::SYNCHRONIZATION, SynchronizationCode::SYN_REPORT.0, 0)
    }

    #[test]
    fn press_turns_tablet_mode_on() {
        let mut bridge = ToggleBridge::new(i32::from(POWER));
        let mut sink = Recorder::default();

        assert_eq!(bridge.handle(&key(POWER, 1), &mut sink), Some(true));
        assert!(bridge.is_on());
        assert_eq!(sink.emitted, vec![switch(1), syn()]);
    }

    #[test]
    fn release_after_press_changes_nothing() {
        let mut bridge = ToggleBridge::new(i32::from(POWER));
        let mut sink = Recorder::default();

        bridge.handle(&key(POWER, 1), &mut sink);
        assert_eq!(bridge.handle(&key(POWER, 0), &mut sink), None);
        assert!(bridge.is_on());
        assert_eq!(sink.emitted, vec![switch(1), syn()]);
    }

    #[test]
    fn second_press_turns_it_off() {
        let mut bridge = ToggleBridge::new(i32::from(POWER));
        let mut sink = Recorder::default();

        for value in [1, 0, 1] {
            bridge.handle(&key(POWER, value), &mut sink);
        }
        assert!(!bridge.is_on());
        assert_eq!(sink.emitted, vec![switch(1), syn(), switch(0), syn()]);
    }

    #[test]
    fn state_follows_press_parity() {
        let mut bridge = ToggleBridge::new(i32::from(POWER));
        let mut sink = Recorder::default();

        for n in 1..=9 {
            bridge.handle(&key(POWER, 1), &mut sink);
            bridge.handle(&key(POWER, 2), &mut sink);
            bridge.handle(&key(POWER, 0), &mut sink);
            assert_eq!(bridge.is_on(), n % 2 == 1);
        }

        assert_eq!(sink.emitted.len(), 18);
        for pair in sink.emitted.chunks(2) {
            assert_eq!(pair[0].0, EventType::SWITCH);
            assert_eq!(pair[1], syn());
        }
    }

    #[test]
    fn autorepeat_never_toggles() {
        let mut bridge = ToggleBridge::new(i32::from(POWER));
        let mut sink = Recorder::default();

        for _ in 0..5 {
            assert_eq!(bridge.handle(&key(POWER, 2), &mut sink), None);
        }
        assert!(!bridge.is_on());
        assert!(sink.emitted.is_empty());
    }

    #[test]
    fn other_codes_and_types_are_ignored() {
        let mut bridge = ToggleBridge::new(i32::from(POWER));
        let mut sink = Recorder::default();

        let noise = [
            key(KeyCode::KEY_VOLUMEUP.0, 1),
            InputEvent::new(EventType::SWITCH.0, POWER, 1),
            InputEvent::new(EventType::MISC.0, POWER, 1),
            InputEvent::new(EventType::SYNCHRONIZATION.0, 0, 0),
        ];
        for event in &noise {
            assert_eq!(bridge.handle(event, &mut sink), None);
        }
        assert!(!bridge.is_on());
        assert!(sink.emitted.is_empty());
    }

    #[test]
    fn out_of_range_key_code_never_matches() {
        let mut bridge = ToggleBridge::new(-1);
        let mut sink = Recorder::default();

        assert_eq!(bridge.handle(&key(u16::MAX, 1), &mut sink), None);
        assert!(sink.emitted.is_empty());
    }

    #[test]
    fn failed_switch_write_still_syncs_and_toggles() {
        let mut bridge = ToggleBridge::new(i32::from(POWER));
        let mut sink = Recorder {
            fail_switch: true,
            ..Recorder::default()
        };

        assert_eq!(bridge.handle(&key(POWER, 1), &mut sink), Some(true));
        assert_eq!(sink.emitted, vec![switch(1), syn()]);
    }
}
