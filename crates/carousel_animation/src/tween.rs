//! Fixed-duration interpolation between two values

use crate::easing::Easing;
use crate::error::{AnimationError, Result};

/// A timed transition from `from` to `to` shaped by an easing curve
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    easing: Easing,
    elapsed: f32,
}

impl Tween {
    /// `duration` is in seconds
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Result<Self> {
        if !(duration > 0.0 && duration.is_finite()) {
            return Err(AnimationError::InvalidDuration(duration));
        }
        Ok(Self {
            from,
            to,
            duration,
            easing,
            elapsed: 0.0,
        })
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }
}
