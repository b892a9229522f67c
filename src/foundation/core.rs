use crate::foundation::error::{EaselError, EaselResult};

pub use kurbo::{Point, Vec2};

/// Straight RGB8 color as stored in the canvas and persisted as `[r, g, b]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Convert unit-range floats into a color, clamping each channel.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        fn q(c: f64) -> u8 {
            if !c.is_finite() {
                return 0;
            }
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::new(q(r), q(g), q(b))
    }

    /// Channel array in `[r, g, b]` order.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Nudge each channel by a signed offset, saturating at the channel bounds.
    pub fn jitter(self, dr: i16, dg: i16, db: i16) -> Self {
        fn add(c: u8, d: i16) -> u8 {
            (i16::from(c) + d).clamp(0, 255) as u8
        }
        Self::new(add(self.r, dr), add(self.g, dg), add(self.b, db))
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        c.to_array()
    }
}

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Create a validated, non-empty size.
    pub fn new(width: u32, height: u32) -> EaselResult<Self> {
        if width == 0 || height == 0 {
            return Err(EaselError::validation("canvas width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(EaselError::validation("canvas width/height must fit in u16"));
        }
        Ok(Self { width, height })
    }

    /// Total pixel area.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Geometric center in floating canvas space.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Return `true` when the integer coordinate is inside the canvas.
    pub fn contains(self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Clamp a floating point into the drawable area `[0, w-1] x [0, h-1]`.
    pub fn clamp_point(self, p: Point) -> Point {
        let max_x = f64::from(self.width.saturating_sub(1));
        let max_y = f64::from(self.height.saturating_sub(1));
        let x = if p.x.is_finite() { p.x.clamp(0.0, max_x) } else { max_x / 2.0 };
        let y = if p.y.is_finite() { p.y.clamp(0.0, max_y) } else { max_y / 2.0 };
        Point::new(x, y)
    }

    /// Quadrant that contains the integer coordinate.
    pub fn quadrant_of(self, x: u32, y: u32) -> Quadrant {
        let right = x >= self.width / 2;
        let bottom = y >= self.height / 2;
        match (right, bottom) {
            (false, false) => Quadrant::TopLeft,
            (true, false) => Quadrant::TopRight,
            (false, true) => Quadrant::BottomLeft,
            (true, true) => Quadrant::BottomRight,
        }
    }

    /// Center point of a quadrant.
    pub fn quadrant_center(self, q: Quadrant) -> Point {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let (fx, fy) = match q {
            Quadrant::TopLeft => (0.25, 0.25),
            Quadrant::TopRight => (0.75, 0.25),
            Quadrant::BottomLeft => (0.25, 0.75),
            Quadrant::BottomRight => (0.75, 0.75),
        };
        Point::new(w * fx, h * fy)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
        }
    }
}

/// One of the four canvas quadrants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// `x < w/2`, `y < h/2`.
    TopLeft,
    /// `x >= w/2`, `y < h/2`.
    TopRight,
    /// `x < w/2`, `y >= h/2`.
    BottomLeft,
    /// `x >= w/2`, `y >= h/2`.
    BottomRight,
}

impl Quadrant {
    /// All quadrants in index order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Stable 0..4 index.
    pub fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
