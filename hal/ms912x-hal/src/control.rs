//! Control endpoint abstraction
//!
//! Register access is a pair of HID class requests on the default control
//! pipe: SET_REPORT carries a request, GET_REPORT fetches the answer to a
//! read. Both are short and synchronous.

use crate::error::Error;

/// Register report transport
pub trait ControlTransport {
    /// Error type for control transfers
    type Error: Error;

    /// Send one report to the device (HID SET_REPORT)
    ///
    /// # Arguments
    /// * `report` - Encoded 8-byte register request
    fn set_report(&mut self, report: &[u8]) -> Result<(), Self::Error>;

    /// Fetch one report from the device (HID GET_REPORT)
    ///
    /// # Arguments
    /// * `report` - Buffer receiving the 8-byte response
    fn get_report(&mut self, report: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: ControlTransport + ?Sized> ControlTransport for &mut T {
    type Error = T::Error;

    fn set_report(&mut self, report: &[u8]) -> Result<(), Self::Error> {
        T::set_report(self, report)
    }

    fn get_report(&mut self, report: &mut [u8]) -> Result<(), Self::Error> {
        T::get_report(self, report)
    }
}
