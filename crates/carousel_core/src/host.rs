//! Host surface capability
//!
//! The carousel never renders or animates anything itself. It issues
//! commands to a [`HostSurface`] (a scroll view, a widget toolkit, the
//! headless simulator) and receives [`HostEvent`]s back.

use serde::{Deserialize, Serialize};

use crate::geometry::{Frame, Size};
use crate::gesture::SnapCurve;

/// Handle of a snap animation started on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapAnimationId(pub u64);

/// Parameters of a snap animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapAnimationRequest {
    pub from_x: f32,
    pub to_x: f32,
    pub curve: SnapCurve,
    /// Magnitude of the drag velocity, handed to spring curves as their
    /// initial velocity
    pub initial_velocity: f32,
}

/// Notifications a host delivers through
/// [`InfiniteCarousel::handle`](crate::InfiniteCarousel::handle)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The content offset changed because of user interaction, native
    /// deceleration or a host-animated offset change
    DidScroll,
    /// Native deceleration came to rest
    DidEndDecelerating,
    /// An offset change requested with `animated = true` finished
    ScrollAnimationEnded,
    /// A snap animation ended on its own. Cancelled animations are not
    /// reported.
    SnapAnimationStopped { id: SnapAnimationId, finished: bool },
}

/// Scroll surface, view hierarchy and animation runtime driven by the
/// carousel
pub trait HostSurface {
    /// View handle produced by the data source
    type View;

    /// Model content offset
    fn content_offset_x(&self) -> f32;

    /// Move the content. Programmatic writes with `animated = false` must not
    /// be echoed back as [`HostEvent::DidScroll`].
    fn set_content_offset_x(&mut self, offset_x: f32, animated: bool);

    /// Resize the viewport and the scrollable content
    fn set_scroll_area(&mut self, viewport: Size, content_width: f32);

    /// Elastic overscroll at the content edges
    fn set_bounces(&mut self, bounces: bool);

    fn set_deceleration_rate(&mut self, rate: f32);

    /// The user is touching the surface
    fn is_tracking(&self) -> bool;

    /// Native deceleration is running
    fn is_decelerating(&self) -> bool;

    fn mount_view(&mut self, view: &Self::View, frame: Frame);

    fn move_view(&mut self, view: &Self::View, frame: Frame);

    fn unmount_view(&mut self, view: Self::View);

    /// Start animating the presented offset. The model offset is committed
    /// to `request.to_x` immediately.
    fn start_snap_animation(&mut self, request: SnapAnimationRequest) -> SnapAnimationId;

    /// Halt an animation at its in-flight value, commit that value as the
    /// model offset and return it. `None` for unknown or finished ids.
    fn cancel_snap_animation(&mut self, id: SnapAnimationId) -> Option<f32>;

    /// Offset currently on screen; differs from the model offset only while
    /// a snap animation runs
    fn presented_offset_x(&self) -> f32;
}
