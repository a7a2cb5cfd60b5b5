//! Register access over the control transport
//!
//! Every access is one synchronous report exchange. Transport errors are
//! classified and returned as [`Error::Transport`].

use ms912x_hal::ControlTransport;
use ms912x_protocol::request::read_response_value;
use ms912x_protocol::{RegisterRequest, REPORT_LEN};

use crate::error::Error;

/// Send one register request
pub fn send<C: ControlTransport>(control: &mut C, request: &RegisterRequest) -> Result<(), Error> {
    control
        .set_report(&request.to_report())
        .map_err(Error::transport)
}

/// Write a 6-byte payload to a register
pub fn write<C: ControlTransport>(control: &mut C, address: u8, payload: [u8; 6]) -> Result<(), Error> {
    send(control, &RegisterRequest::write(address, payload))
}

/// Read one byte from a register
///
/// Sends the read request, then fetches the response report.
pub fn read<C: ControlTransport>(control: &mut C, address: u16) -> Result<u8, Error> {
    send(control, &RegisterRequest::read(address))?;
    let mut response = [0u8; REPORT_LEN];
    control.get_report(&mut response).map_err(Error::transport)?;
    Ok(read_response_value(&response))
}


#[cfg(test)]
mod tests {
    use super::mock::MockControl;
    use super::*;
    use ms912x_hal::ErrorKind;
    use ms912x_protocol::register;

    #[test]
    fn test_read_exchanges_two_reports() {
        let mut control = MockControl::new();
        control.read_value = 0x42;
        assert_eq!(read(&mut control, register::STATUS), Ok(0x42));
        assert_eq!(control.requests(), vec![RegisterRequest::read(register::STATUS)]);
    }

    #[test]
    fn test_write_failure_is_classified() {
        let mut control = MockControl::failing_at(0, ErrorKind::Stall);
        assert_eq!(
            write(&mut control, register::POWER, [0; 6]),
            Err(Error::Transport(ErrorKind::Stall))
        );
        assert!(control.sent.is_empty());
    }
}
