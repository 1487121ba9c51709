//! Carousel Animation System
//!
//! Frame-stepped animation primitives used by carousel hosts to run snap
//! animations.
//!
//! # Features
//!
//! - **Easing**: Named timing functions and CSS-compatible cubic beziers
//! - **Spring Physics**: RK4-integrated damped springs with mass, stiffness, damping
//! - **Tweens**: Fixed-duration interpolation between two values
//! - **Scheduler**: Ticks all active animations and lets a host halt one mid-flight,
//!   reporting the value it was presenting at that moment

pub mod easing;
pub mod error;
pub mod scheduler;
pub mod spring;
pub mod tween;

pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use scheduler::{AnimationId, AnimationScheduler, FinishedAnimation};
pub use spring::{Spring, SpringConfig};
pub use tween::Tween;
