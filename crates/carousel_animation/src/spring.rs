//! Damped spring physics
//!
//! Springs are integrated with RK4 in fixed sub-steps so the result does not
//! depend on the frame rate the host ticks at.

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// Largest integration step, in seconds
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// Upper bound for [`SpringConfig::settling_duration`], in seconds
const MAX_SETTLING_DURATION: f32 = 10.0;

/// Physical parameters of a damped spring
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Soft, visibly bouncy spring used for snapping by default
    pub const fn gentle() -> Self {
        Self::new(40.0, 8.0, 1.0)
    }

    /// Critically damped-ish spring with no visible rebound
    pub const fn stiff() -> Self {
        Self::new(400.0, 40.0, 1.0)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.mass > 0.0 && self.mass.is_finite()) {
            return Err(AnimationError::InvalidMass(self.mass));
        }
        if !(self.stiffness > 0.0 && self.stiffness.is_finite()) {
            return Err(AnimationError::InvalidStiffness(self.stiffness));
        }
        if !(self.damping >= 0.0 && self.damping.is_finite()) {
            return Err(AnimationError::InvalidDamping(self.damping));
        }
        Ok(())
    }

    /// ζ = c / (2·√(k·m)); below 1.0 the spring overshoots
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Time (seconds) a unit-distance spring needs to come to rest when it
    /// starts with `initial_velocity` (in distances per second).
    pub fn settling_duration(&self, initial_velocity: f32) -> f32 {
        let mut spring = Spring::new(*self, 0.0)
            .with_velocity(initial_velocity)
            .with_rest_threshold(0.001);
        spring.set_target(1.0);

        let frame = 1.0 / 120.0;
        let mut elapsed = 0.0;
        while elapsed < MAX_SETTLING_DURATION {
            spring.step(frame);
            elapsed += frame;
            if spring.is_settled() {
                return elapsed;
            }
        }
        MAX_SETTLING_DURATION
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::gentle()
    }
}

/// A spring moving a single value toward its target
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_threshold: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            rest_threshold: 0.01,
        }
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    /// Distance and speed below which the spring counts as settled
    pub fn with_rest_threshold(mut self, threshold: f32) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.rest_threshold
    }

    /// Jump to the target and drop all velocity
    pub fn snap_to_target(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let steps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            self.rk4(h);
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        (-stiffness * (x - self.target) - damping * v) / mass
    }

    fn rk4(&mut self, h: f32) {
        let (x, v) = (self.value, self.velocity);

        let k1x = v;
        let k1v = self.acceleration(x, v);
        let k2x = v + 0.5 * h * k1v;
        let k2v = self.acceleration(x + 0.5 * h * k1x, k2x);
        let k3x = v + 0.5 * h * k2v;
        let k3v = self.acceleration(x + 0.5 * h * k2x, k3x);
        let k4x = v + h * k3v;
        let k4v = self.acceleration(x + h * k3x, k4x);

        self.value = x + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_reaches_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);
        for _ in 0..240 {
            spring.step(1.0 / 60.0);
        }
        assert!((spring.value() - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_gentle_spring_overshoots() {
        let config = SpringConfig::gentle();
        assert!(config.damping_ratio() < 1.0);

        let mut spring = Spring::new(config, 0.0);
        spring.set_target(1.0);
        let mut peak: f32 = 0.0;
        for _ in 0..240 {
            spring.step(1.0 / 60.0);
            peak = peak.max(spring.value());
        }
        assert!(peak > 1.0);
    }

    #[test]
    fn test_step_is_frame_rate_independent() {
        let mut a = Spring::new(SpringConfig::gentle(), 0.0);
        let mut b = a.clone();
        a.set_target(50.0);
        b.set_target(50.0);
        for _ in 0..60 {
            a.step(1.0 / 60.0);
        }
        for _ in 0..120 {
            b.step(1.0 / 120.0);
        }
        assert!((a.value() - b.value()).abs() < 0.05);
    }

    #[test]
    fn test_settling_duration_grows_with_softness() {
        let stiff = SpringConfig::stiff().settling_duration(0.0);
        let gentle = SpringConfig::gentle().settling_duration(0.0);
        assert!(stiff > 0.0);
        assert!(gentle > stiff);
        assert!(gentle < MAX_SETTLING_DURATION);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(SpringConfig::new(0.0, 1.0, 1.0).validate().is_err());
        assert!(SpringConfig::new(10.0, -1.0, 1.0).validate().is_err());
        assert!(SpringConfig::new(10.0, 1.0, 0.0).validate().is_err());
        assert!(SpringConfig::gentle().validate().is_ok());
    }
}
