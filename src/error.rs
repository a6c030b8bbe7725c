use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Either the uinput control file or the source device could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    DeviceOpen { path: PathBuf, source: io::Error },

    /// uinput rejected the capability set or the create command.
    #[error("failed to create uinput device: {0}")]
    DeviceCreate(#[source] io::Error),

    #[error("failed to write event: {0}")]
    EmitWrite(#[source] io::Error),

    #[error("error waiting for input: {0}")]
    Multiplexer(#[source] io::Error),

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),
}
