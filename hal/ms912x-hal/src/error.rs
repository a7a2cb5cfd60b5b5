//! Transport error classification
//!
//! Backends keep their own error types; the core only needs to know
//! which class of failure happened.

/// Class of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// The transfer did not complete in time
    Timeout,
    /// The endpoint stalled
    Stall,
    /// The device is gone (unplugged, interface lost)
    NoDevice,
    /// Any other failure
    Other,
}

/// Transport error
///
/// Implemented by every backend error type.
pub trait Error: core::fmt::Debug {
    /// Classify this error
    fn kind(&self) -> ErrorKind;
}

impl Error for ErrorKind {
    fn kind(&self) -> ErrorKind {
        *self
    }
}

impl ErrorKind {
    /// Check whether retrying can ever succeed
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::NoDevice)
    }
}
