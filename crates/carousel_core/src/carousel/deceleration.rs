//! Drag lifecycle, deceleration and snap animations
//!
//! Each drag opens a cycle. When the drag ends a [`PendingDeceleration`] is
//! recorded, and exactly one of the completion paths below takes it and
//! reports `did_end_decelerating`: the immediate jump, the host's native
//! deceleration ending, the snap animation stopping, or the next drag
//! aborting it.

use super::InfiniteCarousel;
use crate::geometry::project;
use crate::gesture::{DecelerationMode, PendingDeceleration, Phase, SnapCurve, SwipeDirection};
use crate::host::{HostSurface, SnapAnimationId, SnapAnimationRequest};

impl<H: HostSurface> InfiniteCarousel<H> {
    /// The user started dragging
    pub fn will_begin_dragging(&mut self) {
        // a running snap reports its own abort and commits the presented
        // offset, so the start tile is the one on screen
        self.stop_snap_animation();

        let visible = self.nearest_center_item(self.host.content_offset_x());
        self.drag_start_tile = visible.map(|item| item.tile_index);

        if let Some(previous) = self.pending.take() {
            if previous.deceleration_enabled && previous.mode.is_native() {
                if let Some(visible) = visible {
                    self.emit_did_end_decelerating(visible.item_index, true);
                }
            }
        }
        // will-end took a hold but the drag never ended
        self.recenter.release_snap_hold();

        self.phase = Phase::Dragging;
        tracing::debug!(start_tile = ?self.drag_start_tile, "drag began");
        self.recenter_if_needed(false, true);
    }

    /// The user lifted the finger with `velocity_x` (points per
    /// millisecond). Returns the offset the host should decelerate towards;
    /// returning the current offset keeps the host from animating.
    pub fn will_end_dragging(&mut self, velocity_x: f32, proposed_target_x: f32) -> f32 {
        let offset_x = self.host.content_offset_x();
        let deceleration_enabled = self.config.deceleration_enabled;
        let mut projected_x = offset_x;
        if deceleration_enabled {
            projected_x = project(offset_x, velocity_x, self.config.deceleration_rate);
            self.retile(Some(projected_x), false);
        }

        let Some(nearest) = self.nearest_center_item(projected_x) else {
            return proposed_target_x;
        };
        if let Some(start_tile) = self.drag_start_tile {
            let direction = SwipeDirection::between(start_tile, nearest.tile_index);
            self.emit_will_end_swipe(nearest.item_index, direction);
        }
        if self.config.snap_enabled {
            projected_x = nearest.anchor_offset_x;
        }

        let mode = DecelerationMode::resolve(&self.config, self.engine_drives_snap());
        let outbound_x = match mode {
            DecelerationMode::Immediate => offset_x,
            DecelerationMode::Native { .. } => projected_x,
            DecelerationMode::Custom(_) => {
                self.recenter.acquire_snap_hold();
                offset_x
            }
        };
        self.pending = Some(PendingDeceleration {
            projected_offset_x: projected_x,
            nearest,
            initial_velocity_x: velocity_x,
            mode,
            deceleration_enabled,
        });
        tracing::debug!(
            velocity_x,
            projected_x,
            outbound_x,
            ?mode,
            tile = nearest.tile_index,
            "drag will end"
        );
        outbound_x
    }

    /// The drag ended; `will_decelerate` tells whether the host keeps moving
    pub fn did_end_dragging(&mut self, will_decelerate: bool) {
        let Some(pending) = self.pending else {
            self.phase = Phase::Idle;
            return;
        };

        if !pending.deceleration_enabled {
            self.pending = None;
            self.recenter.release_snap_hold();
            self.phase = Phase::Idle;
            self.emit_did_end_decelerating(pending.nearest.item_index, false);
            return;
        }

        match pending.mode {
            DecelerationMode::Immediate => {
                self.pending = None;
                self.phase = Phase::Idle;
                self.write_offset(pending.projected_offset_x);
                self.emit_did_end_decelerating(pending.nearest.item_index, false);
            }
            DecelerationMode::Native { .. } if !will_decelerate => {
                self.pending = None;
                self.phase = Phase::Idle;
                let item_index = self
                    .nearest_center_item(self.host.content_offset_x())
                    .map_or(pending.nearest.item_index, |nearest| nearest.item_index);
                self.emit_did_end_decelerating(item_index, false);
            }
            DecelerationMode::Native { .. } => {
                self.phase = Phase::Decelerating;
            }
            DecelerationMode::Custom(curve) => {
                self.start_snap_animation(&pending, curve);
            }
        }
    }

    /// The host's native deceleration came to rest
    pub fn did_end_decelerating(&mut self) {
        let Some(pending) = self.pending else {
            return;
        };
        if !pending.deceleration_enabled {
            return;
        }
        let DecelerationMode::Native { fallback } = pending.mode else {
            return;
        };

        self.pending = None;
        self.phase = Phase::Idle;
        // a bounce interrupted by a new touch ends while tracking
        let was_aborted = fallback && self.host.is_tracking();
        if let Some(nearest) = self.nearest_center_item(self.host.content_offset_x()) {
            self.emit_did_end_decelerating(nearest.item_index, was_aborted);
        }
    }

    fn start_snap_animation(&mut self, pending: &PendingDeceleration, curve: SnapCurve) {
        self.stop_snap_animation();

        let request = SnapAnimationRequest {
            from_x: self.host.content_offset_x(),
            to_x: pending.projected_offset_x,
            curve,
            initial_velocity: pending.initial_velocity_x.abs(),
        };
        let id = self.host.start_snap_animation(request);
        self.active_snap = Some(id);
        self.phase = Phase::SnapAnimating;
        tracing::debug!(?id, from_x = request.from_x, to_x = request.to_x, "snap animation started");
    }

    /// Halt a running snap animation at its presented offset and report the
    /// cycle as aborted
    pub(super) fn stop_snap_animation(&mut self) {
        let Some(id) = self.active_snap else {
            return;
        };
        let settled_x = self
            .host
            .cancel_snap_animation(id)
            .unwrap_or_else(|| self.host.presented_offset_x());
        self.finish_snap_animation(id, settled_x, false);
    }

    /// Close the cycle owned by snap animation `id`, which came to rest at
    /// `settled_x`. Stale ids are ignored.
    pub(super) fn finish_snap_animation(&mut self, id: SnapAnimationId, settled_x: f32, finished: bool) {
        if self.active_snap != Some(id) {
            tracing::trace!(?id, "ignoring stale snap animation");
            return;
        }
        self.active_snap = None;
        self.recenter.release_snap_hold();
        if self.phase == Phase::SnapAnimating {
            self.phase = Phase::Idle;
        }

        let pending = self.pending.take();
        if pending.is_some_and(|pending| pending.deceleration_enabled) {
            // spring overshoot can settle away from the projected tile
            if let Some(nearest) = self.nearest_center_item(settled_x) {
                self.emit_did_end_decelerating(nearest.item_index, !finished);
            }
        }
        self.retile(None, true);
    }
}
