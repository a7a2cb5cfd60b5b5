//! Damage rectangles

use ms912x_protocol::frame::COLUMN_UNIT;

/// Axis-aligned rectangle in framebuffer pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering a whole `width` × `height` surface
    pub const fn from_extent(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }

    pub fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Smallest rectangle covering both
    ///
    /// An empty operand contributes nothing.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect {
            x,
            y,
            width: (right - x as u32).min(u16::MAX as u32) as u16,
            height: (bottom - y as u32).min(u16::MAX as u32) as u16,
        }
    }

    /// Check whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Intersect with a `width` × `height` surface anchored at the origin
    pub fn clamp_to(&self, width: u16, height: u16) -> Rect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let right = self.right().min(width as u32);
        let bottom = self.bottom().min(height as u32);
        Rect {
            x,
            y,
            width: (right - x as u32) as u16,
            height: (bottom - y as u32) as u16,
        }
    }

    /// Widen to whole 16-pixel columns, never past `limit`
    ///
    /// The left edge rounds down and the right edge rounds up. `limit` must
    /// itself be a multiple of 16.
    pub fn align_columns(&self, limit: u16) -> Rect {
        let unit = COLUMN_UNIT as u32;
        let left = self.x as u32 / unit * unit;
        let right = self.right().div_ceil(unit) * unit;
        let right = right.min(limit as u32).max(left);
        Rect {
            x: left as u16,
            y: self.y,
            width: (right - left) as u16,
            height: self.height,
        }
    }
}

/// Fold `rect` into an optional accumulated rectangle
pub fn merge(acc: Option<Rect>, rect: Rect) -> Option<Rect> {
    match acc {
        Some(acc) => Some(acc.union(&rect)),
        None if rect.is_empty() => None,
        None => Some(rect),
    }
}
