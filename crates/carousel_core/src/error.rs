//! Carousel error types

use thiserror::Error;

/// Contract violations detected while validating data-source answers or
/// configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CarouselError {
    /// Data source reported fewer than zero items
    #[error("number of items can't be negative, got {0}")]
    NegativeItemCount(isize),

    /// Deceleration rate outside the open interval (0, 1)
    #[error("deceleration rate must be within (0, 1), got {0}")]
    InvalidDecelerationRate(f32),

    /// Scrollable content width is not a positive finite number
    #[error("scrollable content width must be positive, got {0}")]
    InvalidScrollableWidth(f32),

    /// Snap animation parameters are unusable
    #[error("invalid snap animation: {0}")]
    InvalidSnapAnimation(String),

    /// Timing function name could not be resolved
    #[error("unknown timing function: {0}")]
    UnknownTimingFunction(String),
}

impl From<carousel_animation::AnimationError> for CarouselError {
    fn from(err: carousel_animation::AnimationError) -> Self {
        match err {
            carousel_animation::AnimationError::UnknownTimingFunction(name) => {
                CarouselError::UnknownTimingFunction(name)
            }
            other => CarouselError::InvalidSnapAnimation(other.to_string()),
        }
    }
}

/// Result type for carousel validation
pub type Result<T> = std::result::Result<T, CarouselError>;
