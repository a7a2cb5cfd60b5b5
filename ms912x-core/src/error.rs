//! Errors surfaced by the device façade and the transfer pipeline

use ms912x_hal::ErrorKind;

use crate::config::ConfigError;

/// Errors that can occur while driving the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A control or bulk transfer failed
    Transport(ErrorKind),
    /// No mode table entry for this timing
    UnsupportedMode { width: u16, height: u16, hz: u16 },
    /// Malformed rectangle or pixel source
    InvalidArgument,
    /// Pipeline used before the device was opened
    NotOpen,
    /// Device or pipeline used after close
    AlreadyClosed,
    /// The adapter is gone; no further operations are accepted
    DeviceLost,
    /// Frame update before any mode was programmed
    NoActiveMode,
    /// Rejected device configuration
    Config(ConfigError),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl Error {
    /// Wrap a backend error
    pub fn transport<E: ms912x_hal::Error>(err: E) -> Self {
        Error::Transport(err.kind())
    }

    /// Check whether this error means the adapter is gone
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Error::DeviceLost | Error::Transport(ErrorKind::NoDevice))
    }
}
