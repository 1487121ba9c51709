//! Animation error types

use thiserror::Error;

/// Errors raised when an animation is configured with unusable parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Duration must be strictly positive and finite
    #[error("animation duration must be positive, got {0}")]
    InvalidDuration(f32),

    /// Spring mass must be strictly positive
    #[error("spring mass must be positive, got {0}")]
    InvalidMass(f32),

    /// Spring stiffness must be strictly positive
    #[error("spring stiffness must be positive, got {0}")]
    InvalidStiffness(f32),

    /// Spring damping cannot be negative
    #[error("spring damping cannot be negative, got {0}")]
    InvalidDamping(f32),

    /// Timing function name is not one of the known curves
    #[error("unknown timing function: {0}")]
    UnknownTimingFunction(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
