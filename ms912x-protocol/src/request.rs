//! Register requests and the 6-byte payload frames written through them
//!
//! Report format (8 bytes, sent with HID SET_REPORT):
//! - TYPE (1 byte): 0xB5 for a read, 0xA6 for a write
//! - ADDRESS: 2 bytes big-endian for a read, 1 byte for a write
//! - DATA: reserved (read, 5 bytes) or payload (write, 6 bytes)
//!
//! Resolution and mode requests are 6-byte payloads written to
//! [`SET1`](crate::register::SET1) and [`SET2`](crate::register::SET2).

use crate::pixel::PixelFormat;

/// Size of every control report
pub const REPORT_LEN: usize = 8;

/// Size of a write payload
pub const PAYLOAD_LEN: usize = 6;

/// Report type tag for a register read
pub const READ_REQUEST_TYPE: u8 = 0xB5;

/// Report type tag for a register write
pub const WRITE_REQUEST_TYPE: u8 = 0xA6;

/// Offset of the value byte in a read response report
pub const READ_RESPONSE_DATA_OFFSET: usize = 3;

/// One encoded control report
pub type Report = [u8; REPORT_LEN];

/// A single register access, fully consumed by one control transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterRequest {
    /// Read one byte from a 16-bit register address
    Read { address: u16 },
    /// Write six bytes to an 8-bit register address
    Write {
        address: u8,
        payload: [u8; PAYLOAD_LEN],
    },
}

impl RegisterRequest {
    /// Write request with a 6-byte payload
    pub const fn write(address: u8, payload: [u8; PAYLOAD_LEN]) -> Self {
        RegisterRequest::Write { address, payload }
    }

    /// Write request whose payload is a single leading byte
    pub const fn write_byte(address: u8, value: u8) -> Self {
        RegisterRequest::Write {
            address,
            payload: [value, 0, 0, 0, 0, 0],
        }
    }

    /// Read request
    pub const fn read(address: u16) -> Self {
        RegisterRequest::Read { address }
    }

    /// Encode into a control report
    pub fn to_report(&self) -> Report {
        let mut report = [0u8; REPORT_LEN];
        match *self {
            RegisterRequest::Read { address } => {
                report[0] = READ_REQUEST_TYPE;
                report[1..3].copy_from_slice(&address.to_be_bytes());
            }
            RegisterRequest::Write { address, payload } => {
                report[0] = WRITE_REQUEST_TYPE;
                report[1] = address;
                report[2..].copy_from_slice(&payload);
            }
        }
        report
    }

    /// Parse a report back into a request
    ///
    /// Used by test transports to inspect what went out on the wire.
    pub fn from_report(report: &Report) -> Option<Self> {
        match report[0] {
            READ_REQUEST_TYPE => Some(RegisterRequest::Read {
                address: u16::from_be_bytes([report[1], report[2]]),
            }),
            WRITE_REQUEST_TYPE => {
                let mut payload = [0u8; PAYLOAD_LEN];
                payload.copy_from_slice(&report[2..]);
                Some(RegisterRequest::Write {
                    address: report[1],
                    payload,
                })
            }
            _ => None,
        }
    }
}

/// Extract the register value from a read response report
pub fn read_response_value(report: &Report) -> u8 {
    report[READ_RESPONSE_DATA_OFFSET]
}

/// Resolution request payload: width, height, pixel format code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolutionRequest {
    pub width: u16,
    pub height: u16,
    pub format: PixelFormat,
}

impl ResolutionRequest {
    pub fn to_bytes(&self) -> [u8; PAYLOAD_LEN] {
        let mut out = [0u8; PAYLOAD_LEN];
        out[0..2].copy_from_slice(&self.width.to_be_bytes());
        out[2..4].copy_from_slice(&self.height.to_be_bytes());
        out[4..6].copy_from_slice(&self.format.code().to_be_bytes());
        out
    }

    /// Decode a payload; `None` for an unknown pixel format code
    pub fn from_bytes(bytes: &[u8; PAYLOAD_LEN]) -> Option<Self> {
        Some(Self {
            width: u16::from_be_bytes([bytes[0], bytes[1]]),
            height: u16::from_be_bytes([bytes[2], bytes[3]]),
            format: PixelFormat::from_code(u16::from_be_bytes([bytes[4], bytes[5]]))?,
        })
    }
}

/// Mode request payload: device mode code, width, height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeRequest {
    pub mode_code: u16,
    pub width: u16,
    pub height: u16,
}

impl ModeRequest {
    pub fn to_bytes(&self) -> [u8; PAYLOAD_LEN] {
        let mut out = [0u8; PAYLOAD_LEN];
        out[0..2].copy_from_slice(&self.mode_code.to_be_bytes());
        out[2..4].copy_from_slice(&self.width.to_be_bytes());
        out[4..6].copy_from_slice(&self.height.to_be_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; PAYLOAD_LEN]) -> Self {
        Self {
            mode_code: u16::from_be_bytes([bytes[0], bytes[1]]),
            width: u16::from_be_bytes([bytes[2], bytes[3]]),
            height: u16::from_be_bytes([bytes[4], bytes[5]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register;

    #[test]
    fn test_read_request_layout() {
        let report = RegisterRequest::read(register::HACTIVE).to_report();
        assert_eq!(report, [0xB5, 0xF3, 0x84, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_write_request_layout() {
        let report = RegisterRequest::write(register::POWER, register::POWER_ON_PAYLOAD).to_report();
        assert_eq!(report, [0xA6, 0x07, 0x01, 0x02, 0, 0, 0, 0]);
    }

    #[test]
    fn test_write_byte_pads_with_zero() {
        let report = RegisterRequest::write_byte(register::COMMIT, 1).to_report();
        assert_eq!(report, [0xA6, 0x05, 0x01, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_report_parse_rejects_unknown_type() {
        let report = [0x00, 0x07, 0, 0, 0, 0, 0, 0];
        assert_eq!(RegisterRequest::from_report(&report), None);
    }

    #[test]
    fn test_report_parse_write() {
        let request = RegisterRequest::write(register::SET2, [1, 2, 3, 4, 5, 6]);
        assert_eq!(RegisterRequest::from_report(&request.to_report()), Some(request));
    }

    #[test]
    fn test_resolution_request_layout() {
        let request = ResolutionRequest {
            width: 1920,
            height: 1080,
            format: PixelFormat::Uyvy,
        };
        assert_eq!(request.to_bytes(), [0x07, 0x80, 0x04, 0x38, 0x22, 0x00]);
    }

    #[test]
    fn test_resolution_request_decode() {
        let request = ResolutionRequest {
            width: 1280,
            height: 720,
            format: PixelFormat::Uyvy,
        };
        let decoded = ResolutionRequest::from_bytes(&request.to_bytes()).unwrap();
        assert_eq!(decoded.width, 1280);
        assert_eq!(decoded.height, 720);
        assert_eq!(decoded.format, PixelFormat::Uyvy);
    }

    #[test]
    fn test_resolution_request_unknown_format() {
        assert_eq!(ResolutionRequest::from_bytes(&[0x05, 0x00, 0x02, 0xD0, 0x12, 0x34]), None);
    }

    #[test]
    fn test_mode_request_layout() {
        let request = ModeRequest {
            mode_code: 0x8100,
            width: 1920,
            height: 1080,
        };
        assert_eq!(request.to_bytes(), [0x81, 0x00, 0x07, 0x80, 0x04, 0x38]);
    }

    #[test]
    fn test_read_response_value() {
        let report = [0xB5, 0x00, 0x32, 0x5A, 0, 0, 0, 0];
        assert_eq!(read_response_value(&report), 0x5A);
    }
}
