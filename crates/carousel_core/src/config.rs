//! Carousel configuration

use carousel_animation::{Easing, SpringConfig};
use serde::{Deserialize, Serialize};

use crate::error::{CarouselError, Result};

/// Common deceleration rates (fraction of velocity kept per millisecond)
pub struct DecelerationRate;

impl DecelerationRate {
    pub const NORMAL: f32 = 0.998;
    pub const FAST: f32 = 0.99;
}

/// Default width of the physical scroll range
pub const DEFAULT_SCROLLABLE_CONTENT_WIDTH: f32 = 5000.0;

/// Animation used to settle on the target after a drag ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum SnapAnimation {
    /// Hard jump to the projected offset
    None,
    /// The host surface's own deceleration animation
    HostDefault,
    /// Timing curve lasting `duration` seconds
    Curve { duration: f32, easing: Easing },
    /// Damped spring; the drag velocity becomes the spring's initial velocity.
    ///
    /// A very bouncy spring after an energetic fling can overshoot past the
    /// pre-tiled area.
    Spring(SpringConfig),
}

impl SnapAnimation {
    /// Example spring parameters (mass 1, stiffness 40, damping 8)
    pub const DEFAULT_SPRING: SnapAnimation = SnapAnimation::Spring(SpringConfig::gentle());

    /// Curve built from a media timing function name such as `easeOut`
    pub fn curve_named(duration: f32, name: &str) -> Result<SnapAnimation> {
        let snap = SnapAnimation::Curve {
            duration,
            easing: Easing::from_name(name)?,
        };
        snap.validate()?;
        Ok(snap)
    }

    /// Whether the carousel itself drives the animation (as opposed to
    /// jumping or delegating to the host)
    pub fn is_custom(&self) -> bool {
        matches!(self, SnapAnimation::Curve { .. } | SnapAnimation::Spring(_))
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SnapAnimation::None | SnapAnimation::HostDefault => Ok(()),
            SnapAnimation::Curve { duration, .. } => {
                if *duration > 0.0 && duration.is_finite() {
                    Ok(())
                } else {
                    Err(CarouselError::InvalidSnapAnimation(format!(
                        "curve duration must be positive, got {duration}"
                    )))
                }
            }
            SnapAnimation::Spring(spring) => spring.validate().map_err(CarouselError::from),
        }
    }
}

impl Default for SnapAnimation {
    fn default() -> Self {
        SnapAnimation::HostDefault
    }
}

/// Behaviour when the data source holds exactly one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleItemBehavior {
    /// The single item repeats endlessly, as if there were many
    Tile,
    /// No tiling; scroll area is the item's width and the host bounces
    #[default]
    Bounce,
    /// No tiling; scroll area is the item's width and bouncing is off
    NoBounce,
}

/// Tunable behaviour of an [`InfiniteCarousel`](crate::InfiniteCarousel)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Keep moving with the drag's velocity after release
    pub deceleration_enabled: bool,
    /// Fraction of velocity kept per millisecond, within (0, 1)
    pub deceleration_rate: f32,
    /// Land exactly on the centre of the nearest item
    pub snap_enabled: bool,
    pub snap_animation: SnapAnimation,
    /// Takes effect after the next reload
    pub single_item_behavior: SingleItemBehavior,
    /// Physical scroll range that recentering keeps the offset inside.
    /// Ten screen widths is a reasonable value for violent swipes.
    pub scrollable_content_width: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            deceleration_enabled: true,
            deceleration_rate: DecelerationRate::NORMAL,
            snap_enabled: false,
            snap_animation: SnapAnimation::HostDefault,
            single_item_behavior: SingleItemBehavior::Bounce,
            scrollable_content_width: DEFAULT_SCROLLABLE_CONTENT_WIDTH,
        }
    }
}

impl CarouselConfig {
    /// Config that snaps to items with the given animation
    pub fn snapping(snap_animation: SnapAnimation) -> Self {
        Self {
            snap_enabled: true,
            snap_animation,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_deceleration_rate(self.deceleration_rate)?;
        validate_scrollable_width(self.scrollable_content_width)?;
        self.snap_animation.validate()
    }

    /// Replace every invalid field with its default, logging what was fixed
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if let Err(err) = validate_deceleration_rate(self.deceleration_rate) {
            tracing::warn!("{err}; using {}", defaults.deceleration_rate);
            self.deceleration_rate = defaults.deceleration_rate;
        }
        if let Err(err) = validate_scrollable_width(self.scrollable_content_width) {
            tracing::warn!("{err}; using {}", defaults.scrollable_content_width);
            self.scrollable_content_width = defaults.scrollable_content_width;
        }
        if let Err(err) = self.snap_animation.validate() {
            tracing::warn!("{err}; using host default snap animation");
            self.snap_animation = defaults.snap_animation;
        }
        self
    }
}

pub(crate) fn validate_deceleration_rate(rate: f32) -> Result<()> {
    if rate > 0.0 && rate < 1.0 {
        Ok(())
    } else {
        Err(CarouselError::InvalidDecelerationRate(rate))
    }
}

pub(crate) fn validate_scrollable_width(width: f32) -> Result<()> {
    if width > 0.0 && width.is_finite() {
        Ok(())
    } else {
        Err(CarouselError::InvalidScrollableWidth(width))
    }
}
