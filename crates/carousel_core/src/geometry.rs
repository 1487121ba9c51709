//! Geometry primitives and deceleration projection

/// Width × height of a tile or viewport
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Horizontal frame of a tile in content coordinates.
///
/// Tiles always start at `y = 0` and span the full control height, so only
/// the x-origin is tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub const fn new(x: f32, width: f32, height: f32) -> Self {
        Self { x, width, height }
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the frame lies entirely outside `[min_x, max_x]`
    pub fn is_outside(&self, min_x: f32, max_x: f32) -> bool {
        self.min_x() > max_x || self.max_x() < min_x
    }

    pub fn translated(self, dx: f32) -> Self {
        Self {
            x: self.x + dx,
            ..self
        }
    }
}

/// Offset a fling coasts to.
///
/// `initial_velocity` is in points per millisecond and `deceleration_rate`
/// is the fraction of velocity kept each millisecond; summing the geometric
/// series `v·r + v·r² + …` gives `v·r / (1 − r)`.
///
/// A rate of 1.0 or more never stops; that is a caller bug, asserted in
/// debug builds, and the start value is returned unchanged.
pub fn project(value: f32, initial_velocity: f32, deceleration_rate: f32) -> f32 {
    if deceleration_rate >= 1.0 {
        debug_assert!(false, "deceleration rate must be below 1.0, got {deceleration_rate}");
        tracing::warn!("deceleration rate {deceleration_rate} >= 1.0, projection skipped");
        return value;
    }
    value + initial_velocity * deceleration_rate / (1.0 - deceleration_rate)
}
