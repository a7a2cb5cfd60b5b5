//! Device-side pixel formats

/// Wire code for UYVY 4:2:2
pub const PIXFMT_UYVY: u16 = 0x2200;
/// Wire code for RGB
pub const PIXFMT_RGB: u16 = 0x1100;

/// Pixel format the adapter expects on the bulk endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// Packed YUV 4:2:2, one `U Y0 V Y1` quad per pixel pair
    Uyvy,
    /// RGB
    Rgb,
}

impl PixelFormat {
    /// Code carried in the resolution request
    pub const fn code(self) -> u16 {
        match self {
            PixelFormat::Uyvy => PIXFMT_UYVY,
            PixelFormat::Rgb => PIXFMT_RGB,
        }
    }

    /// Parse a resolution request format code
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            PIXFMT_UYVY => Some(PixelFormat::Uyvy),
            PIXFMT_RGB => Some(PixelFormat::Rgb),
            _ => None,
        }
    }

    /// Bytes per pixel on the wire
    ///
    /// Transfer buffers are sized for 2 bytes per pixel regardless of format.
    pub const fn bytes_per_pixel(self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_codes() {
        assert_eq!(PixelFormat::Uyvy.code(), 0x2200);
        assert_eq!(PixelFormat::Rgb.code(), 0x1100);
        assert_eq!(PixelFormat::from_code(0x2200), Some(PixelFormat::Uyvy));
        assert_eq!(PixelFormat::from_code(0x1100), Some(PixelFormat::Rgb));
        assert_eq!(PixelFormat::from_code(0x0000), None);
    }
}
