//! Bulk OUT endpoint abstraction
//!
//! Frame data is written asynchronously so that the caller producing
//! damage never waits on USB latency.

use crate::error::Error;

/// Asynchronous bulk OUT endpoint
///
/// Implementations must not be driven by more than one task at a time;
/// the core guarantees it never issues two concurrent writes.
#[allow(async_fn_in_trait)]
pub trait BulkOut {
    /// Error type for bulk transfers
    type Error: Error;

    /// Write one transfer to the endpoint
    ///
    /// Resolves once the whole of `data` has been accepted by the device.
    /// Dropping the returned future cancels the transfer.
    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: BulkOut + ?Sized> BulkOut for &mut T {
    type Error = T::Error;

    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct Recorder {
        total: usize,
    }

    impl BulkOut for Recorder {
        type Error = ErrorKind;

        async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            if data.is_empty() {
                return Err(ErrorKind::Other);
            }
            self.total += data.len();
            Ok(())
        }
    }

    #[test]
    fn test_write_through_reference() {
        let mut recorder = Recorder { total: 0 };
        let mut by_ref = &mut recorder;
        embassy_futures::block_on(BulkOut::write(&mut by_ref, &[1, 2, 3])).unwrap();
        assert_eq!(recorder.total, 3);
    }

    #[test]
    fn test_error_kind_classification() {
        assert!(ErrorKind::NoDevice.is_fatal());
        assert!(!ErrorKind::Timeout.is_fatal());
        assert_eq!(embassy_futures::block_on(Recorder { total: 0 }.write(&[])), Err(ErrorKind::Other));
    }
}
