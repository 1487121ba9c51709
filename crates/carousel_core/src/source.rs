//! Data source and delegate capabilities supplied by the application

use crate::geometry::Size;
use crate::gesture::SwipeDirection;

/// Supplies item count, widths and views.
///
/// Queried synchronously; implementations must not call back into the
/// carousel's mutating API from these methods.
pub trait CarouselDataSource<V> {
    /// Number of items. Negative values are a contract violation and are
    /// treated as zero.
    fn number_of_items(&self) -> isize;

    /// Width of the item at `index`. Must be positive; other values give
    /// undefined (but non-crashing) layouts.
    fn width_for_item(&self, index: usize) -> f32;

    /// Freshly configured view for the item at `index`, sized to `size`
    fn view_for_item(&mut self, index: usize, size: Size) -> V;
}

/// Best-effort notifications about swipes, deceleration and selection
pub trait CarouselDelegate {
    /// A drag is ending; `item_index` is where it will come to rest
    fn will_end_swipe(&mut self, _item_index: usize, _direction: SwipeDirection) {}

    /// Fired exactly once per drag-deceleration cycle
    fn did_end_decelerating(&mut self, _item_index: usize, _was_aborted: bool) {}

    fn did_select_item(&mut self, _item_index: usize) {}
}
