//! Device lifecycle and the event loop.

use std::thread;
use std::time::Duration;

use crate::bridge::ToggleBridge;
use crate::config::TriggerConfig;
use crate::signals::ShutdownSignals;
use crate::source::{EventSource, Readiness, SourceDevice};
use crate::virtual_switch::{self, SwitchSink, VirtualSwitch};
use crate::Result;

/// Pause after a wait that returned without data.
pub const IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// Create the virtual switch, open the configured device and bridge them
/// until a shutdown signal arrives.
pub fn run(config: &TriggerConfig) -> Result<()> {
    let signals = ShutdownSignals::install()?;
    let wait_mask = signals.wait_mask();

    serve(
        || {
            let switch =
                VirtualSwitch::create(virtual_switch::DEVICE_NAME, virtual_switch::device_id())?;
            log::info!("created virtual device {:?}", virtual_switch::DEVICE_NAME);
            Ok(switch)
        },
        || {
            let source = SourceDevice::open(&config.device_path)?.with_wait_mask(wait_mask);
            log::info!(
                "listening on {} for key code {}",
                source.path().display(),
                config.key_code
            );
            Ok(source)
        },
        config.key_code,
    )
}

/// Acquire the virtual device, then the source, and pump events between them.
///
/// The source is only opened once the virtual device exists. Both are
/// released on every exit path, source first.
pub fn serve<V, S, C, O>(create_virtual: C, open_source: O, key_code: i32) -> Result<()>
where
    V: SwitchSink,
    S: EventSource,
    C: FnOnce() -> Result<V>,
    O: FnOnce() -> Result<S>,
{
    let mut switch = create_virtual()?;
    let mut source = open_source()?;
    let mut bridge = ToggleBridge::new(key_code);

    let outcome = pump(&mut source, &mut switch, &mut bridge);

    drop(source);
    drop(switch);
    outcome
}

fn pump<S, V>(source: &mut S, switch: &mut V, bridge: &mut ToggleBridge) -> Result<()>
where
    S: EventSource,
    V: SwitchSink,
{
    loop {
        match source.wait_readable()? {
            Readiness::Readable => {
                if let Some(event) = source.read_event() {
                    bridge.handle(&event, switch);
                }
            }
            Readiness::Idle => thread::sleep(IDLE_BACKOFF),
            Readiness::Interrupted => {
                log::info!("interrupted, shutting down");
                return Ok(());
            }
        }
    }
}
