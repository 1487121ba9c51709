//! Carousel Core
//!
//! Engine of an infinitely looping horizontal carousel. A finite scroll range
//! is periodically recentered while item views are tiled along an unbounded
//! tile line, so content appears to repeat forever in both directions.
//!
//! # Features
//!
//! - **Item Cache**: Count, widths and total width snapshot of the data source
//! - **Tiling**: Materializes views for the visible window plus overhang and
//!   evicts the rest
//! - **Recentering**: Jumps the offset back to the middle without visible
//!   movement
//! - **Deceleration**: Projection, nearest-item snapping and four snap styles
//!   with exactly one completion report per drag
//! - **Host Abstraction**: Rendering, gestures and animation are supplied by a
//!   [`HostSurface`]
//!
//! # Example
//!
//! ```ignore
//! use carousel_core::{CarouselConfig, InfiniteCarousel, Size};
//!
//! let mut carousel = InfiniteCarousel::new(surface, CarouselConfig::default());
//! carousel.set_data_source(items);
//! carousel.reload_data();
//! carousel.layout(Size::new(390.0, 120.0));
//! ```

pub mod cache;
pub mod carousel;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod recenter;
pub mod source;
pub mod tiling;

pub use cache::ItemCache;
pub use carousel::InfiniteCarousel;
pub use config::{CarouselConfig, DecelerationRate, SingleItemBehavior, SnapAnimation};
pub use error::{CarouselError, Result};
pub use geometry::{project, Frame, Size};
pub use gesture::{
    DecelerationMode, GestureArbiter, PendingDeceleration, Phase, Recognizer, SnapCurve,
    SwipeDirection,
};
pub use host::{HostEvent, HostSurface, SnapAnimationId, SnapAnimationRequest};
pub use recenter::{EngineActivity, RecenterState, Throttles};
pub use source::{CarouselDataSource, CarouselDelegate};
pub use tiling::{item_index, NearestItem, Tile, TileIndex, VisibleTiles};

// Re-export the animation crate for hosts
pub use carousel_animation;
