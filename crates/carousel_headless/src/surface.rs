//! Simulated scroll surface
//!
//! Virtual-time implementation of [`HostSurface`]. Native deceleration decays
//! the remaining distance to its target by the deceleration rate every
//! millisecond; host-animated offsets and snap animations run on an
//! [`AnimationScheduler`].

use carousel_animation::{AnimationId, AnimationScheduler, Easing};
use carousel_core::{Frame, HostEvent, HostSurface, Size, SnapAnimationId, SnapAnimationRequest, SnapCurve};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Duration of `set_content_offset_x(_, animated = true)`
pub const SCROLL_ANIMATION_DURATION: f32 = 0.3;

/// Remaining distance below which native deceleration stops
pub const REST_DISTANCE: f32 = 0.5;

/// View handle created by fixture data sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimView {
    pub id: u64,
    pub item_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountedView {
    pub item_index: usize,
    pub frame: Frame,
}

/// Host-animated offset change. `shift` collects offset writes made while
/// it runs.
#[derive(Debug, Clone, Copy)]
struct OffsetAnimation {
    animation: AnimationId,
    shift: f32,
}

#[derive(Debug, Clone, Copy)]
struct SnapRun {
    id: SnapAnimationId,
    animation: AnimationId,
}

pub type HostEvents = SmallVec<[HostEvent; 4]>;

pub struct SimulatedSurface {
    offset_x: f32,
    viewport: Size,
    content_width: f32,
    bounces: bool,
    deceleration_rate: f32,
    tracking: bool,
    deceleration_target: Option<f32>,
    scheduler: AnimationScheduler,
    offset_animation: Option<OffsetAnimation>,
    snap: Option<SnapRun>,
    next_snap_id: u64,
    views: FxHashMap<u64, MountedView>,
    queued: HostEvents,
}

impl Default for SimulatedSurface {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            viewport: Size::ZERO,
            content_width: 0.0,
            bounces: true,
            deceleration_rate: carousel_core::DecelerationRate::NORMAL,
            tracking: false,
            deceleration_target: None,
            scheduler: AnimationScheduler::new(),
            offset_animation: None,
            snap: None,
            next_snap_id: 0,
            views: FxHashMap::default(),
            queued: HostEvents::new(),
        }
    }
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    pub fn bounces(&self) -> bool {
        self.bounces
    }

    pub fn deceleration_rate(&self) -> f32 {
        self.deceleration_rate
    }

    /// Largest offset reachable without overscroll
    pub fn max_offset_x(&self) -> f32 {
        (self.content_width - self.viewport.width).max(0.0)
    }

    pub fn mounted_views(&self) -> impl Iterator<Item = (u64, &MountedView)> {
        self.views.iter().map(|(id, view)| (*id, view))
    }

    pub fn mounted_count(&self) -> usize {
        self.views.len()
    }

    /// Items on screen, left to right, at the presented offset
    pub fn visible_items(&self) -> Vec<usize> {
        let min_x = self.presented_offset_x();
        let max_x = min_x + self.viewport.width;
        let mut visible: Vec<_> = self
            .views
            .values()
            .filter(|view| view.frame.max_x() > min_x && view.frame.min_x() < max_x)
            .collect();
        visible.sort_by(|a, b| a.frame.x.total_cmp(&b.frame.x));
        visible.into_iter().map(|view| view.item_index).collect()
    }

    /// Nothing is moving on its own
    pub fn is_idle(&self) -> bool {
        self.deceleration_target.is_none() && !self.scheduler.has_active_animations() && self.queued.is_empty()
    }

    /// A finger lands. Stops native deceleration (reported as ended) and any
    /// host-animated offset change.
    pub fn begin_touch(&mut self) {
        self.tracking = true;
        if let Some(running) = self.offset_animation.take() {
            if let Some(value) = self.scheduler.cancel(running.animation) {
                self.offset_x = value + running.shift;
            }
        }
        if self.deceleration_target.take().is_some() {
            tracing::trace!(offset_x = self.offset_x, "touch stopped deceleration");
            self.queued.push(HostEvent::DidEndDecelerating);
        }
    }

    /// Finger moved the content by `dx`
    pub fn drag_by(&mut self, dx: f32) {
        let mut offset_x = self.offset_x + dx;
        if !self.bounces {
            offset_x = offset_x.clamp(0.0, self.max_offset_x());
        }
        self.offset_x = offset_x;
        self.queued.push(HostEvent::DidScroll);
    }

    pub fn end_touch(&mut self) {
        self.tracking = false;
    }

    /// Finger lifted; decelerate towards `target_x` (clamped to the content).
    /// Returns whether deceleration started.
    pub fn release(&mut self, target_x: f32) -> bool {
        let target_x = target_x.clamp(0.0, self.max_offset_x());
        if (target_x - self.offset_x).abs() <= REST_DISTANCE {
            return false;
        }
        self.deceleration_target = Some(target_x);
        true
    }

    /// Events produced outside [`SimulatedSurface::tick`]
    pub fn take_events(&mut self) -> HostEvents {
        std::mem::take(&mut self.queued)
    }

    /// Advance virtual time by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> HostEvents {
        let mut events = self.take_events();

        if let Some(target_x) = self.deceleration_target {
            let remaining = (target_x - self.offset_x) * self.deceleration_rate.powf(dt * 1000.0);
            if remaining.abs() < REST_DISTANCE {
                self.offset_x = target_x;
                self.deceleration_target = None;
                events.push(HostEvent::DidScroll);
                events.push(HostEvent::DidEndDecelerating);
            } else {
                self.offset_x = target_x - remaining;
                events.push(HostEvent::DidScroll);
            }
        }

        let finished = self.scheduler.tick(dt);
        if let Some(running) = self.offset_animation {
            if let Some(value) = self.scheduler.value(running.animation) {
                self.offset_x = value + running.shift;
                events.push(HostEvent::DidScroll);
            }
        }
        for done in finished {
            if let Some(running) = self.offset_animation.filter(|running| running.animation == done.id) {
                self.offset_animation = None;
                self.offset_x = done.value + running.shift;
                events.push(HostEvent::DidScroll);
                events.push(HostEvent::ScrollAnimationEnded);
            } else if let Some(run) = self.snap.filter(|run| run.animation == done.id) {
                self.snap = None;
                events.push(HostEvent::SnapAnimationStopped {
                    id: run.id,
                    finished: true,
                });
            }
        }
        events
    }

}

impl HostSurface for SimulatedSurface {
    type View = SimView;

    fn content_offset_x(&self) -> f32 {
        self.offset_x
    }

    /// Non-animated writes translate a running deceleration or offset
    /// animation by the same distance, so recentering mid-flight keeps the
    /// motion going.
    fn set_content_offset_x(&mut self, offset_x: f32, animated: bool) {
        if !animated {
            let delta = offset_x - self.offset_x;
            if let Some(target_x) = self.deceleration_target.as_mut() {
                *target_x += delta;
            }
            if let Some(running) = self.offset_animation.as_mut() {
                running.shift += delta;
            }
            self.offset_x = offset_x;
            return;
        }
        if let Some(running) = self.offset_animation.take() {
            self.scheduler.cancel(running.animation);
        }
        match self.scheduler.add_tween(
            self.offset_x,
            offset_x,
            SCROLL_ANIMATION_DURATION,
            Easing::SYSTEM_EASE_IN_EASE_OUT,
        ) {
            Ok(animation) => self.offset_animation = Some(OffsetAnimation { animation, shift: 0.0 }),
            Err(err) => {
                tracing::warn!("{err}; jumping to {offset_x}");
                self.offset_x = offset_x;
            }
        }
    }

    fn set_scroll_area(&mut self, viewport: Size, content_width: f32) {
        self.viewport = viewport;
        self.content_width = content_width;
    }

    fn set_bounces(&mut self, bounces: bool) {
        self.bounces = bounces;
    }

    fn set_deceleration_rate(&mut self, rate: f32) {
        self.deceleration_rate = rate;
    }

    fn is_tracking(&self) -> bool {
        self.tracking
    }

    fn is_decelerating(&self) -> bool {
        self.deceleration_target.is_some()
    }

    fn mount_view(&mut self, view: &SimView, frame: Frame) {
        let mounted = MountedView {
            item_index: view.item_index,
            frame,
        };
        if self.views.insert(view.id, mounted).is_some() {
            tracing::warn!(id = view.id, "view mounted twice");
        }
    }

    fn move_view(&mut self, view: &SimView, frame: Frame) {
        match self.views.get_mut(&view.id) {
            Some(mounted) => mounted.frame = frame,
            None => tracing::warn!(id = view.id, "moved a view that is not mounted"),
        }
    }

    fn unmount_view(&mut self, view: SimView) {
        if self.views.remove(&view.id).is_none() {
            tracing::warn!(id = view.id, "unmounted a view that is not mounted");
        }
    }

    fn start_snap_animation(&mut self, request: SnapAnimationRequest) -> SnapAnimationId {
        if let Some(previous) = self.snap.take() {
            self.scheduler.cancel(previous.animation);
        }
        self.next_snap_id += 1;
        let id = SnapAnimationId(self.next_snap_id);
        let started = match request.curve {
            SnapCurve::Timing { duration, easing } => {
                self.scheduler
                    .add_tween(request.from_x, request.to_x, duration, easing)
            }
            // the drag speed is handed over as is, like a platform spring would take it
            SnapCurve::Spring(config) => self.scheduler.add_spring(
                request.from_x,
                request.to_x,
                config,
                request.initial_velocity,
            ),
        };
        match started {
            Ok(animation) => self.snap = Some(SnapRun { id, animation }),
            Err(err) => {
                tracing::warn!("{err}; snap lands immediately");
                self.queued.push(HostEvent::SnapAnimationStopped { id, finished: true });
            }
        }
        self.offset_x = request.to_x;
        id
    }

    fn cancel_snap_animation(&mut self, id: SnapAnimationId) -> Option<f32> {
        let run = self.snap.filter(|run| run.id == id)?;
        self.snap = None;
        let presented = self.scheduler.cancel(run.animation)?;
        self.offset_x = presented;
        Some(presented)
    }

    fn presented_offset_x(&self) -> f32 {
        self.snap
            .and_then(|run| self.scheduler.value(run.animation))
            .unwrap_or(self.offset_x)
    }
}
