//! Gesture and deceleration state
//!
//! Types describing one drag-deceleration cycle and the rules deciding which
//! recognizer may fire.

use carousel_animation::{Easing, SpringConfig};
use serde::{Deserialize, Serialize};

use crate::config::{CarouselConfig, SnapAnimation};
use crate::tiling::{NearestItem, TileIndex};

/// Direction of a finished swipe relative to the tile it started on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Ended on the start tile
    None,
    /// Ended on a lower tile index
    Left,
    /// Ended on a higher tile index
    Right,
}

impl SwipeDirection {
    pub fn between(start: TileIndex, end: TileIndex) -> Self {
        match end.cmp(&start) {
            std::cmp::Ordering::Equal => SwipeDirection::None,
            std::cmp::Ordering::Less => SwipeDirection::Left,
            std::cmp::Ordering::Greater => SwipeDirection::Right,
        }
    }
}

/// Animation the carousel runs itself through the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum SnapCurve {
    /// `duration` seconds along `easing`
    Timing { duration: f32, easing: Easing },
    /// Damped spring running for its settling duration
    Spring(SpringConfig),
}

/// How the current cycle comes to rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecelerationMode {
    /// Offset is written directly when the drag ends
    Immediate,
    /// Host runs its own deceleration. `fallback` marks a single untiled item
    /// without snapping, where no other mode applies.
    Native { fallback: bool },
    /// The carousel starts a snap animation when the drag ends
    Custom(SnapCurve),
}

impl DecelerationMode {
    /// `engine_drives` is false only for a single untiled item with snapping
    /// off
    pub fn resolve(config: &CarouselConfig, engine_drives: bool) -> Self {
        if !engine_drives {
            return DecelerationMode::Native { fallback: true };
        }
        match config.snap_animation {
            SnapAnimation::None => DecelerationMode::Immediate,
            SnapAnimation::HostDefault => DecelerationMode::Native { fallback: false },
            SnapAnimation::Curve { duration, easing } => {
                DecelerationMode::Custom(SnapCurve::Timing { duration, easing })
            }
            SnapAnimation::Spring(spring) => DecelerationMode::Custom(SnapCurve::Spring(spring)),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, DecelerationMode::Native { .. })
    }
}

/// Target recorded when a drag ends, consumed by exactly one completion path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingDeceleration {
    pub projected_offset_x: f32,
    pub nearest: NearestItem,
    /// Points per millisecond
    pub initial_velocity_x: f32,
    pub mode: DecelerationMode,
    /// Whether deceleration was enabled when the drag ended
    pub deceleration_enabled: bool,
}

/// Coarse lifecycle of the drag-deceleration cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Dragging,
    /// Host's native deceleration is running
    Decelerating,
    SnapAnimating,
}

/// Recognizers attached to the carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognizer {
    /// Fires on contact, fails on any movement
    TouchDown,
    Tap,
    /// The host surface's own drag handling
    Pan,
}

/// Priority rules between the carousel's recognizers and the host pan
pub struct GestureArbiter;

impl GestureArbiter {
    /// Touch-down only matters while a snap animation is running; a tap is
    /// ignored while anything is moving
    pub fn should_begin(recognizer: Recognizer, snap_animating: bool, host_decelerating: bool) -> bool {
        match recognizer {
            Recognizer::TouchDown => snap_animating,
            Recognizer::Tap => !snap_animating && !host_decelerating,
            Recognizer::Pan => true,
        }
    }

    pub fn recognizes_simultaneously(recognizer: Recognizer, _other: Recognizer) -> bool {
        matches!(recognizer, Recognizer::TouchDown | Recognizer::Tap)
    }

    /// Tap waits for touch-down to fail
    pub fn requires_failure_of(recognizer: Recognizer, other: Recognizer) -> bool {
        recognizer == Recognizer::Tap && other == Recognizer::TouchDown
    }
}
