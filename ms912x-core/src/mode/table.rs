//! Mode table and matcher

use ms912x_protocol::frame::COLUMN_UNIT;
use ms912x_protocol::PixelFormat;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One timing the device firmware can select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeDescriptor {
    pub width: u16,
    pub height: u16,
    pub refresh_hz: u16,
    /// Opaque firmware mode code
    pub mode_code: u16,
    pub pixel_format: PixelFormat,
}

/// Lookup key: width, height and refresh rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeKey {
    pub width: u16,
    pub height: u16,
    pub hz: u16,
}

impl ModeKey {
    pub const fn new(width: u16, height: u16, hz: u16) -> Self {
        Self { width, height, hz }
    }
}

impl ModeDescriptor {
    const fn new(width: u16, height: u16, refresh_hz: u16, mode_code: u16, pixel_format: PixelFormat) -> Self {
        Self {
            width,
            height,
            refresh_hz,
            mode_code,
            pixel_format,
        }
    }

    /// Key this entry is matched on
    pub fn key(&self) -> ModeKey {
        ModeKey::new(self.width, self.height, self.refresh_hz)
    }

    /// Width rounded up to whole 16-pixel columns
    pub fn aligned_width(&self) -> u16 {
        self.width.div_ceil(COLUMN_UNIT) * COLUMN_UNIT
    }
}

use PixelFormat::Uyvy;

/// Every supported mode, in lookup order
pub const MODE_TABLE: [ModeDescriptor; 26] = [
    // Captured from the vendor driver
    ModeDescriptor::new(800, 600, 60, 0x4200, Uyvy),
    ModeDescriptor::new(1024, 768, 60, 0x4700, Uyvy),
    ModeDescriptor::new(1152, 864, 60, 0x4c00, Uyvy),
    ModeDescriptor::new(1280, 720, 60, 0x4f00, Uyvy),
    ModeDescriptor::new(1280, 800, 60, 0x5700, Uyvy),
    ModeDescriptor::new(1280, 960, 60, 0x5b00, Uyvy),
    ModeDescriptor::new(1280, 1024, 60, 0x6000, Uyvy),
    ModeDescriptor::new(1366, 768, 60, 0x6600, Uyvy),
    ModeDescriptor::new(1400, 1050, 60, 0x6700, Uyvy),
    ModeDescriptor::new(1440, 900, 60, 0x6b00, Uyvy),
    ModeDescriptor::new(1680, 1050, 60, 0x7800, Uyvy),
    ModeDescriptor::new(1920, 1080, 60, 0x8100, Uyvy),
    // Dumped from the device
    ModeDescriptor::new(720, 480, 60, 0x0200, Uyvy),
    ModeDescriptor::new(720, 576, 50, 0x1100, Uyvy),
    ModeDescriptor::new(640, 480, 60, 0x4000, Uyvy),
    ModeDescriptor::new(1024, 768, 75, 0x4900, Uyvy),
    ModeDescriptor::new(1280, 600, 60, 0x4e00, Uyvy),
    ModeDescriptor::new(1280, 768, 60, 0x5400, Uyvy),
    ModeDescriptor::new(1280, 1024, 75, 0x6100, Uyvy),
    ModeDescriptor::new(1360, 768, 60, 0x6400, Uyvy),
    ModeDescriptor::new(1600, 1200, 60, 0x7300, Uyvy),
    ModeDescriptor::new(800, 600, 75, 0x4400, Uyvy),
    ModeDescriptor::new(1280, 720, 50, 0x1300, Uyvy),
    ModeDescriptor::new(1280, 768, 75, 0x5600, Uyvy),
    ModeDescriptor::new(1920, 1080, 30, 0x2200, Uyvy),
    ModeDescriptor::new(1920, 1080, 50, 0x1f00, Uyvy),
];

/// Find the table entry for an exact timing
///
/// Returns `None` when the timing is not supported; callers reject the
/// mode rather than substituting a close one.
pub fn find_mode(width: u16, height: u16, hz: u16) -> Option<ModeDescriptor> {
    MODE_TABLE
        .iter()
        .find(|m| m.width == width && m.height == height && m.refresh_hz == hz)
        .copied()
}

/// Iterate over all supported modes
pub fn supported_modes() -> impl Iterator<Item = &'static ModeDescriptor> {
    MODE_TABLE.iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms912x_protocol::{ModeRequest, ResolutionRequest};
    use proptest::prelude::*;

    #[test]
    fn test_entries_are_unique() {
        for (i, a) in MODE_TABLE.iter().enumerate() {
            for b in &MODE_TABLE[i + 1..] {
                assert_ne!(a.key(), b.key(), "duplicate mode {:?}", a);
            }
        }
    }

    #[test]
    fn test_mode_codes_are_unique() {
        for (i, a) in MODE_TABLE.iter().enumerate() {
            for b in &MODE_TABLE[i + 1..] {
                assert_ne!(a.mode_code, b.mode_code);
            }
        }
    }

    #[test]
    fn test_find_1080p60() {
        let mode = find_mode(1920, 1080, 60).unwrap();
        assert_eq!(mode.mode_code, 0x8100);
        assert_eq!(mode.pixel_format, PixelFormat::Uyvy);
    }

    #[test]
    fn test_no_tolerance_on_refresh() {
        assert_eq!(find_mode(1920, 1080, 59), None);
        assert_eq!(find_mode(1920, 1080, 61), None);
    }

    #[test]
    fn test_refresh_variants_resolve_separately() {
        assert_eq!(find_mode(1024, 768, 60).unwrap().mode_code, 0x4700);
        assert_eq!(find_mode(1024, 768, 75).unwrap().mode_code, 0x4900);
        assert_eq!(find_mode(720, 576, 50).unwrap().mode_code, 0x1100);
    }

    #[test]
    fn test_unsupported_mode() {
        assert_eq!(find_mode(999, 999, 60), None);
    }

    #[test]
    fn test_every_entry_is_encodable() {
        for mode in supported_modes() {
            // Frame header width field is 8 bits of 16-pixel columns
            assert!(mode.aligned_width() / COLUMN_UNIT <= u8::MAX as u16);
            let res = ResolutionRequest {
                width: mode.width,
                height: mode.height,
                format: mode.pixel_format,
            };
            assert_eq!(ResolutionRequest::from_bytes(&res.to_bytes()), Some(res));
            let req = ModeRequest {
                mode_code: mode.mode_code,
                width: mode.width,
                height: mode.height,
            };
            assert_eq!(ModeRequest::from_bytes(&req.to_bytes()), req);
        }
    }

    #[test]
    fn test_aligned_width() {
        assert_eq!(find_mode(1366, 768, 60).unwrap().aligned_width(), 1376);
        assert_eq!(find_mode(1920, 1080, 60).unwrap().aligned_width(), 1920);
    }

    proptest! {
        #[test]
        fn prop_lookup_matches_table_exactly(w in 0u16..2100, h in 0u16..1300, hz in 0u16..100) {
            let expected = MODE_TABLE
                .iter()
                .find(|m| m.key() == ModeKey::new(w, h, hz))
                .copied();
            prop_assert_eq!(find_mode(w, h, hz), expected);
            if let Some(mode) = find_mode(w, h, hz) {
                prop_assert_eq!((mode.width, mode.height, mode.refresh_hz), (w, h, hz));
            }
        }

        #[test]
        fn prop_every_entry_found(idx in 0usize..MODE_TABLE.len()) {
            let entry = MODE_TABLE[idx];
            prop_assert_eq!(find_mode(entry.width, entry.height, entry.refresh_hz), Some(entry));
        }
    }
}
