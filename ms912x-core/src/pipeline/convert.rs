//! Source framebuffer access and wire-format conversion
//!
//! The host hands over XRGB8888 pixels (little-endian, bytes `B G R X`).
//! The adapter wants UYVY 4:2:2: one `U Y0 V Y1` quad per horizontal
//! pixel pair, BT.709 limited range, chroma averaged over the pair.

use ms912x_protocol::PixelFormat;

use super::rect::Rect;
use crate::error::Error;

/// Bytes per source pixel
pub const SOURCE_BYTES_PER_PIXEL: usize = 4;

/// Borrowed view of an XRGB8888 framebuffer
#[derive(Debug, Clone, Copy)]
pub struct FramebufferView<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
    pitch: usize,
}

impl<'a> FramebufferView<'a> {
    /// Wrap a framebuffer with `pitch` bytes per row
    ///
    /// Rejects empty surfaces, a pitch shorter than one row of pixels and
    /// data too short to hold every row.
    pub fn new(data: &'a [u8], width: u16, height: u16, pitch: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument);
        }
        let row_len = width as usize * SOURCE_BYTES_PER_PIXEL;
        if pitch < row_len {
            return Err(Error::InvalidArgument);
        }
        let required = pitch * (height as usize - 1) + row_len;
        if data.len() < required {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            data,
            width,
            height,
            pitch,
        })
    }

    /// Wrap a framebuffer whose rows are tightly packed
    pub fn packed(data: &'a [u8], width: u16, height: u16) -> Result<Self, Error> {
        Self::new(data, width, height, width as usize * SOURCE_BYTES_PER_PIXEL)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// `(r, g, b)` at a position; black outside the surface
    #[inline]
    fn rgb(&self, x: u16, y: u16) -> (i32, i32, i32) {
        if x >= self.width || y >= self.height {
            return (0, 0, 0);
        }
        let offset = y as usize * self.pitch + x as usize * SOURCE_BYTES_PER_PIXEL;
        let px = &self.data[offset..offset + SOURCE_BYTES_PER_PIXEL];
        (px[2] as i32, px[1] as i32, px[0] as i32)
    }
}

/// Writes the wire encoding of `rect` into `out`, returning the byte count
pub type Converter = fn(&FramebufferView<'_>, &Rect, &mut [u8]) -> usize;

/// Converter for a device pixel format, if one exists
pub fn converter(format: PixelFormat) -> Option<Converter> {
    match format {
        PixelFormat::Uyvy => Some(encode_uyvy),
        PixelFormat::Rgb => None,
    }
}

#[inline]
fn luma(r: i32, g: i32, b: i32) -> i32 {
    (16 + ((16763 * r + 32904 * g + 6391 * b) >> 16)).clamp(16, 235)
}

#[inline]
fn chroma_u(r: i32, g: i32, b: i32) -> i32 {
    (128 + ((-9676 * r - 18996 * g + 28672 * b) >> 16)).clamp(16, 240)
}

#[inline]
fn chroma_v(r: i32, g: i32, b: i32) -> i32 {
    (128 + ((28672 * r - 24009 * g - 4663 * b) >> 16)).clamp(16, 240)
}

/// Encode `rect` of `src` as UYVY
///
/// `rect.width` must be even; `out` must hold `width × height × 2` bytes.
pub fn encode_uyvy(src: &FramebufferView<'_>, rect: &Rect, out: &mut [u8]) -> usize {
    let mut o = 0;
    for y in rect.y..rect.y + rect.height {
        for x in (rect.x..rect.x + rect.width).step_by(2) {
            let (r0, g0, b0) = src.rgb(x, y);
            let (r1, g1, b1) = src.rgb(x + 1, y);
            let u = (chroma_u(r0, g0, b0) + chroma_u(r1, g1, b1)) / 2;
            let v = (chroma_v(r0, g0, b0) + chroma_v(r1, g1, b1)) / 2;
            out[o] = u as u8;
            out[o + 1] = luma(r0, g0, b0) as u8;
            out[o + 2] = v as u8;
            out[o + 3] = luma(r1, g1, b1) as u8;
            o += 4;
        }
    }
    o
}
