//! Frame update header for the bulk endpoint
//!
//! Header format:
//! - MAGIC (2 bytes): 0xFF 0x00
//! - X (1 byte): left edge in units of 16 pixels
//! - Y (2 bytes): top edge in lines, big-endian
//! - WIDTH (1 byte): width in units of 16 pixels
//! - HEIGHT (2 bytes): height in lines, big-endian
//!
//! The header is followed immediately by the pixel payload for the
//! described rectangle. The codec quantizes nothing: callers align the
//! rectangle to 16-pixel columns first.

/// Two-byte marker starting every frame update
pub const FRAME_MAGIC: u16 = 0xFF00;

/// Encoded header size
pub const FRAME_HEADER_LEN: usize = 8;

/// Horizontal granularity of the X and WIDTH fields, in pixels
pub const COLUMN_UNIT: u16 = 16;

/// Largest single bulk transfer the device accepts
pub const MAX_TRANSFER_LENGTH: usize = 65536;

/// Errors from parsing a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Magic marker missing
    InvalidMagic,
    /// Fewer than [`FRAME_HEADER_LEN`] bytes
    Incomplete,
}

/// One frame update header, fields in wire units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameUpdateHeader {
    /// Left edge ÷ 16
    pub x_blocks: u8,
    /// Top edge in lines
    pub y: u16,
    /// Width ÷ 16
    pub width_blocks: u8,
    /// Height in lines
    pub height: u16,
}

impl FrameUpdateHeader {
    /// Build a header from a pixel rectangle whose left edge and width are
    /// already multiples of [`COLUMN_UNIT`]
    pub fn for_rect(x: u16, y: u16, width: u16, height: u16) -> Self {
        debug_assert!(x % COLUMN_UNIT == 0 && width % COLUMN_UNIT == 0);
        Self {
            x_blocks: (x / COLUMN_UNIT) as u8,
            y,
            width_blocks: (width / COLUMN_UNIT) as u8,
            height,
        }
    }

    /// Left edge in pixels
    pub fn x(&self) -> u16 {
        self.x_blocks as u16 * COLUMN_UNIT
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width_blocks as u16 * COLUMN_UNIT
    }

    /// Encode this header
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_LEN] {
        let mut out = [0u8; FRAME_HEADER_LEN];
        out[0..2].copy_from_slice(&FRAME_MAGIC.to_be_bytes());
        out[2] = self.x_blocks;
        out[3..5].copy_from_slice(&self.y.to_be_bytes());
        out[5] = self.width_blocks;
        out[6..8].copy_from_slice(&self.height.to_be_bytes());
        out
    }

    /// Encode into the start of `buffer`
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buffer: &mut [u8]) -> usize {
        buffer[..FRAME_HEADER_LEN].copy_from_slice(&self.to_bytes());
        FRAME_HEADER_LEN
    }

    /// Parse a header from the start of a transfer
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < FRAME_HEADER_LEN {
            return Err(FrameError::Incomplete);
        }
        if u16::from_be_bytes([bytes[0], bytes[1]]) != FRAME_MAGIC {
            return Err(FrameError::InvalidMagic);
        }
        Ok(Self {
            x_blocks: bytes[2],
            y: u16::from_be_bytes([bytes[3], bytes[4]]),
            width_blocks: bytes[5],
            height: u16::from_be_bytes([bytes[6], bytes[7]]),
        })
    }

    /// Size of the pixel payload following this header at 2 bytes per pixel
    pub fn payload_len(&self) -> usize {
        self.width() as usize * self.height as usize * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_header_layout() {
        let header = FrameUpdateHeader::for_rect(32, 0x0102, 1920, 1080);
        assert_eq!(header.to_bytes(), [0xFF, 0x00, 2, 0x01, 0x02, 120, 0x04, 0x38]);
    }

    #[test]
    fn test_header_encodes_given_units_verbatim() {
        let header = FrameUpdateHeader {
            x_blocks: 3,
            y: 7,
            width_blocks: 5,
            height: 9,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes[2], 3);
        assert_eq!(bytes[5], 5);
        assert_eq!(header.x(), 48);
        assert_eq!(header.width(), 80);
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        let mut bytes = FrameUpdateHeader::for_rect(0, 0, 16, 1).to_bytes();
        bytes[0] = 0x00;
        assert_eq!(FrameUpdateHeader::parse(&bytes), Err(FrameError::InvalidMagic));
    }

    #[test]
    fn test_parse_incomplete() {
        assert_eq!(FrameUpdateHeader::parse(&[0xFF, 0x00, 0]), Err(FrameError::Incomplete));
    }

    #[test]
    fn test_payload_len() {
        let header = FrameUpdateHeader::for_rect(0, 0, 800, 600);
        assert_eq!(header.payload_len(), 800 * 600 * 2);
    }

    proptest! {
        #[test]
        fn prop_header_fields_land_at_fixed_offsets(
            x in 0u8..=255,
            y in any::<u16>(),
            w in 0u8..=255,
            h in any::<u16>(),
        ) {
            let header = FrameUpdateHeader { x_blocks: x, y, width_blocks: w, height: h };
            let mut buffer = [0u8; 16];
            let len = header.encode(&mut buffer);
            prop_assert_eq!(len, FRAME_HEADER_LEN);
            prop_assert_eq!(&buffer[0..2], &[0xFF, 0x00]);
            prop_assert_eq!(buffer[2], x);
            prop_assert_eq!(u16::from_be_bytes([buffer[3], buffer[4]]), y);
            prop_assert_eq!(buffer[5], w);
            prop_assert_eq!(u16::from_be_bytes([buffer[6], buffer[7]]), h);
            prop_assert_eq!(FrameUpdateHeader::parse(&buffer), Ok(header));
        }
    }
}
