//! The infinite carousel control
//!
//! [`InfiniteCarousel`] owns the item cache, the materialized tiles and the
//! recenter bookkeeping, and drives a [`HostSurface`]. Layout, reload and
//! the public API live here; drag and deceleration handling is in
//! `deceleration.rs`.

mod deceleration;

#[cfg(test)]
mod test_support;

use crate::cache::ItemCache;
use crate::config::{
    validate_deceleration_rate, validate_scrollable_width, CarouselConfig, SingleItemBehavior,
    SnapAnimation,
};
use crate::geometry::{Frame, Size};
use crate::gesture::{GestureArbiter, PendingDeceleration, Phase, Recognizer, SwipeDirection};
use crate::host::{HostEvent, HostSurface, SnapAnimationId};
use crate::recenter::{EngineActivity, RecenterState, Throttles};
use crate::source::{CarouselDataSource, CarouselDelegate};
use crate::tiling::{NearestItem, Tile, TileIndex, TileWalk, TileWindow, VisibleTiles};

/// Horizontally scrolling control whose items repeat forever in both
/// directions
pub struct InfiniteCarousel<H: HostSurface> {
    host: H,
    data_source: Option<Box<dyn CarouselDataSource<H::View>>>,
    delegate: Option<Box<dyn CarouselDelegate>>,
    config: CarouselConfig,
    cache: ItemCache,
    tiles: VisibleTiles<H::View>,
    recenter: RecenterState,
    throttles: Throttles,
    bounds: Size,
    last_layout_size: Size,
    content_width: f32,
    drag_start_tile: Option<TileIndex>,
    pending: Option<PendingDeceleration>,
    active_snap: Option<SnapAnimationId>,
    phase: Phase,
}

impl<H: HostSurface> InfiniteCarousel<H> {
    /// Invalid config values are replaced by their defaults
    pub fn new(host: H, config: CarouselConfig) -> Self {
        let config = config.sanitized();
        let mut carousel = Self {
            host,
            data_source: None,
            delegate: None,
            config,
            cache: ItemCache::empty(),
            tiles: VisibleTiles::new(),
            recenter: RecenterState::new(),
            throttles: Throttles::default(),
            bounds: Size::ZERO,
            last_layout_size: Size::ZERO,
            content_width: config.scrollable_content_width,
            drag_start_tile: None,
            pending: None,
            active_snap: None,
            phase: Phase::Idle,
        };
        carousel.host.set_deceleration_rate(config.deceleration_rate);
        carousel.apply_bounce();
        carousel
            .host
            .set_scroll_area(Size::ZERO, carousel.content_width);
        carousel
    }

    /// Takes effect on the next [`InfiniteCarousel::reload_data`]
    pub fn set_data_source(&mut self, source: impl CarouselDataSource<H::View> + 'static) {
        self.data_source = Some(Box::new(source));
    }

    pub fn set_delegate(&mut self, delegate: impl CarouselDelegate + 'static) {
        self.delegate = Some(Box::new(delegate));
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct access for drivers that tick the host. Moving the offset
    /// through it bypasses the carousel's scroll handling.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn cache(&self) -> &ItemCache {
        &self.cache
    }

    pub fn item_count(&self) -> usize {
        self.cache.count()
    }

    pub fn tiles(&self) -> &VisibleTiles<H::View> {
        &self.tiles
    }

    pub fn recenter_state(&self) -> &RecenterState {
        &self.recenter
    }

    pub fn throttles(&self) -> Throttles {
        self.throttles
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn activity(&self) -> EngineActivity {
        self.recenter.activity()
    }

    pub fn pending_deceleration(&self) -> Option<&PendingDeceleration> {
        self.pending.as_ref()
    }

    pub fn is_snap_animating(&self) -> bool {
        self.active_snap.is_some()
    }

    // --- Configuration ---

    pub fn set_deceleration_enabled(&mut self, enabled: bool) {
        self.config.deceleration_enabled = enabled;
    }

    pub fn set_deceleration_rate(&mut self, rate: f32) {
        let rate = match validate_deceleration_rate(rate) {
            Ok(()) => rate,
            Err(err) => {
                let fallback = CarouselConfig::default().deceleration_rate;
                tracing::warn!("{err}; using {fallback}");
                fallback
            }
        };
        self.config.deceleration_rate = rate;
        self.host.set_deceleration_rate(rate);
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.config.snap_enabled = enabled;
    }

    pub fn set_snap_animation(&mut self, snap_animation: SnapAnimation) {
        match snap_animation.validate() {
            Ok(()) => self.config.snap_animation = snap_animation,
            Err(err) => {
                tracing::warn!("{err}; keeping {:?}", self.config.snap_animation);
            }
        }
    }

    /// Width of the physical scroll range. Recentering keeps the offset
    /// inside it, so it should comfortably exceed the longest fling.
    /// A reload is recommended afterwards.
    pub fn set_scrollable_content_width(&mut self, width: f32) {
        if let Err(err) = validate_scrollable_width(width) {
            tracing::warn!("{err}; keeping {}", self.config.scrollable_content_width);
            return;
        }
        self.config.scrollable_content_width = width;
        self.set_needs_layout();
    }

    /// Requires a reload to take effect
    pub fn set_single_item_behavior(&mut self, behavior: SingleItemBehavior) {
        self.config.single_item_behavior = behavior;
        self.apply_bounce();
        self.set_needs_layout();
    }

    /// Replace the whole configuration; invalid values become defaults
    pub fn set_config(&mut self, config: CarouselConfig) {
        self.config = config.sanitized();
        self.host.set_deceleration_rate(self.config.deceleration_rate);
        self.apply_bounce();
        self.set_needs_layout();
    }

    fn apply_bounce(&mut self) {
        let bounces = self.config.single_item_behavior == SingleItemBehavior::Bounce;
        self.host.set_bounces(bounces);
    }

    // --- Layout and reload ---

    /// Forget the last laid-out size so the next layout pass runs fully
    pub fn set_needs_layout(&mut self) {
        self.last_layout_size = Size::ZERO;
    }

    /// Run a layout pass with the current bounds
    pub fn layout_if_needed(&mut self) {
        self.layout(self.bounds);
    }

    /// Layout pass for a viewport of `size`. Skipped when the size did not
    /// change since the previous pass.
    pub fn layout(&mut self, size: Size) {
        if size == self.last_layout_size {
            return;
        }
        let previous = self.last_layout_size;
        self.bounds = size;
        self.update_scroll_area();

        if size.width != previous.width {
            self.throttles = Throttles::for_width(size.width);
            self.recenter_if_needed(false, false);
            self.retile(None, false);
            self.setup_single_item();
        }
        if size.height != previous.height {
            self.resize_tiles(size.height);
        }
        self.last_layout_size = size;
        tracing::trace!(width = size.width, height = size.height, "layout");
    }

    /// Rebuild everything from the data source. Must be called after any
    /// data source change.
    pub fn reload_data(&mut self) {
        self.stop_snap_animation();

        for (_, tile) in self.tiles.drain() {
            self.host.unmount_view(tile.view);
        }
        self.recenter.reset();
        self.cache = match self.data_source.as_deref() {
            Some(source) => ItemCache::from_data_source(source),
            None => ItemCache::empty(),
        };

        self.update_scroll_area();
        self.recenter_if_needed(false, false);
        self.retile(None, false);
        self.setup_single_item();
    }

    fn is_untiled_single_item(&self) -> bool {
        self.cache.count() == 1 && self.config.single_item_behavior != SingleItemBehavior::Tile
    }

    fn tiling_applies(&self) -> bool {
        !self.cache.is_empty() && !self.is_untiled_single_item()
    }

    fn recenter_applies(&self) -> bool {
        self.cache.count() > 1 || self.config.single_item_behavior == SingleItemBehavior::Tile
    }

    /// Whether the carousel picks the deceleration mode itself instead of
    /// falling back to the host's
    fn engine_drives_snap(&self) -> bool {
        self.recenter_applies() || self.config.snap_enabled
    }

    fn update_scroll_area(&mut self) {
        self.content_width = if self.is_untiled_single_item() {
            self.bounds.width.max(self.cache.total_width())
        } else {
            self.config.scrollable_content_width
        };
        self.host.set_scroll_area(self.bounds, self.content_width);
    }

    fn resize_tiles(&mut self, height: f32) {
        for (_, tile) in self.tiles.iter_mut() {
            tile.frame.height = height;
            self.host.move_view(&tile.view, tile.frame);
        }
    }

    /// Exactly one centred view when a single item is not tiled
    fn setup_single_item(&mut self) {
        if !self.is_untiled_single_item() {
            return;
        }
        let Some(width) = self.cache.width(0) else {
            return;
        };
        let frame = Frame::new((self.content_width - width) / 2.0, width, self.bounds.height);
        if let Some(tile) = self.tiles.get_mut(0) {
            tile.frame = frame;
            self.host.move_view(&tile.view, frame);
            return;
        }
        let Some(source) = self.data_source.as_mut() else {
            return;
        };
        let view = source.view_for_item(0, frame.size());
        self.host.mount_view(&view, frame);
        self.tiles.insert(
            0,
            Tile {
                view,
                frame,
                item_index: 0,
            },
        );
    }

    // --- Tiling and recentering ---

    /// Materialize the tiles covering the visible window plus overhang,
    /// widened to include `target_offset_x`, and evict the rest
    fn retile(&mut self, target_offset_x: Option<f32>, throttle: bool) {
        if !self.tiling_applies() || !self.recenter.can_tile() {
            return;
        }
        let Some(source) = self.data_source.as_mut() else {
            return;
        };
        let offset_x = self.host.content_offset_x();
        if throttle && self.recenter.is_tile_throttled(offset_x, self.throttles.tile) {
            return;
        }

        let window = TileWindow::around(
            offset_x,
            offset_x + self.bounds.width,
            target_offset_x,
            self.throttles.overhang,
        );
        self.recenter.begin_tiling();

        let evicted = self.tiles.evict_outside(window);
        let evicted_count = evicted.len();
        for (_, tile) in evicted {
            self.host.unmount_view(tile.view);
        }

        let zero_item_start_x = f64::from(self.config.scrollable_content_width / 2.0)
            + f64::from(self.cache.zero_item_offset().unwrap_or(0.0))
            + self.recenter.accumulator_x;
        let mut added = 0usize;
        match TileWalk::new(&self.cache, zero_item_start_x, window, self.bounds.height) {
            Some(walk) => {
                let walk = walk.with_tile_base(self.recenter.tile_base);
                for planned in walk {
                    if self.tiles.contains(planned.tile_index) {
                        continue;
                    }
                    let view = source.view_for_item(planned.item_index, planned.frame.size());
                    self.host.mount_view(&view, planned.frame);
                    self.tiles.insert(
                        planned.tile_index,
                        Tile {
                            view,
                            frame: planned.frame,
                            item_index: planned.item_index,
                        },
                    );
                    added += 1;
                }
            }
            None => {
                tracing::warn!(
                    total_width = self.cache.total_width(),
                    "item widths do not add up to a positive width, nothing tiled"
                );
            }
        }

        self.recenter.end_tiling(offset_x);
        tracing::trace!(
            offset_x,
            added,
            evicted = evicted_count,
            visible = self.tiles.len(),
            "retiled"
        );
    }

    /// Jump the offset back to the middle of the scroll range. With
    /// `throttle` the jump only happens once the offset drifted past the
    /// recenter distance; with `shift_tiles` every tile moves along so
    /// nothing changes on screen.
    fn recenter_if_needed(&mut self, throttle: bool, shift_tiles: bool) {
        if !self.recenter_applies() || !self.recenter.can_recenter() {
            return;
        }
        let offset_x = self.host.content_offset_x();
        let center_offset_x = (self.content_width - self.bounds.width) / 2.0;
        let shift = center_offset_x - offset_x;
        if throttle && shift.abs() <= self.throttles.recenter {
            return;
        }

        self.recenter.begin_recenter();
        self.write_offset(center_offset_x);
        self.recenter.apply_shift(shift, shift_tiles);
        self.recenter
            .wrap_accumulator(self.cache.total_width(), self.cache.count());
        if shift_tiles {
            for (_, tile) in self.tiles.iter_mut() {
                tile.frame = tile.frame.translated(shift);
                self.host.move_view(&tile.view, tile.frame);
            }
        }
        self.recenter.end_recenter();
        tracing::trace!(shift, shift_tiles, "recentered");
    }

    /// Programmatic offset write, followed by the same handling a user
    /// scroll gets
    fn write_offset(&mut self, offset_x: f32) {
        self.host.set_content_offset_x(offset_x, false);
        self.did_scroll();
    }

    /// The offset changed; retile if it moved far enough
    pub fn did_scroll(&mut self) {
        self.retile(None, true);
    }

    /// Dispatch an event reported by the host
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::DidScroll => self.did_scroll(),
            HostEvent::DidEndDecelerating => self.did_end_decelerating(),
            HostEvent::ScrollAnimationEnded => self.retile(None, false),
            HostEvent::SnapAnimationStopped { id, finished } => {
                let settled_x = self.host.presented_offset_x();
                self.finish_snap_animation(id, settled_x, finished);
            }
        }
    }

    // --- Public queries and navigation ---

    fn half_viewport_width(&self) -> f32 {
        self.bounds.width / 2.0
    }

    fn nearest_center_item(&self, target_offset_x: f32) -> Option<NearestItem> {
        self.tiles
            .nearest_center_item(target_offset_x, self.half_viewport_width())
    }

    /// Item under the visible centre line; `None` iff there are no items
    pub fn index_of_item_at_visible_center(&self) -> Option<usize> {
        self.nearest_center_item(self.host.content_offset_x())
            .map(|nearest| nearest.item_index)
    }

    /// View of the materialized tile at `tile_index`
    pub fn view_for_tile(&self, tile_index: TileIndex) -> Option<&H::View> {
        self.tiles.get(tile_index).map(|tile| &tile.view)
    }

    /// View currently showing `item_index`. Several tiles can show the same
    /// item; the one closest to the visible centre wins.
    pub fn view_for_item(&self, item_index: usize) -> Option<&H::View> {
        let center_x = self.host.content_offset_x() + self.half_viewport_width();
        self.tiles
            .iter()
            .filter(|(_, tile)| tile.item_index == item_index)
            .min_by(|(a_index, a), (b_index, b)| {
                (a.frame.mid_x() - center_x)
                    .abs()
                    .total_cmp(&(b.frame.mid_x() - center_x).abs())
                    .then_with(|| a_index.cmp(b_index))
            })
            .map(|(_, tile)| &tile.view)
    }

    /// Centre the tile at `tile_index` in the viewport. No-op unless that
    /// tile is materialized.
    pub fn set_selected_index(&mut self, tile_index: TileIndex, animated: bool) {
        let Some(tile) = self.tiles.get(tile_index) else {
            tracing::debug!(tile_index, "selected tile is not materialized");
            return;
        };
        let target_x = tile.frame.mid_x() - self.half_viewport_width();
        self.scroll_to(target_x, animated);
    }

    /// Animate to the next materialized tile, wrapping to the first one
    pub fn scroll_forward(&mut self) {
        self.step(1);
    }

    /// Animate to the previous materialized tile, wrapping to the last one
    pub fn scroll_backward(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: TileIndex) {
        if self.tiles.len() < 2 {
            return;
        }
        let Some(current) = self.nearest_center_item(self.host.content_offset_x()) else {
            return;
        };
        let candidate = current.tile_index + delta;
        let next = if self.tiles.contains(candidate) {
            Some(candidate)
        } else if delta > 0 {
            self.tiles.min_index()
        } else {
            self.tiles.max_index()
        };
        let Some(target_x) = next
            .and_then(|index| self.tiles.get(index))
            .map(|tile| tile.frame.mid_x() - self.half_viewport_width())
        else {
            return;
        };
        self.scroll_to(target_x, true);
    }

    fn scroll_to(&mut self, target_x: f32, animated: bool) {
        if animated {
            self.host.set_content_offset_x(target_x, true);
        } else {
            self.write_offset(target_x);
        }
    }

    // --- Gesture recognizers ---

    pub fn should_begin(&self, recognizer: Recognizer) -> bool {
        GestureArbiter::should_begin(recognizer, self.is_snap_animating(), self.host.is_decelerating())
    }

    /// A finger landed. Halts a running snap animation where it is; returns
    /// whether the touch-down was recognized.
    pub fn touch_down(&mut self) -> bool {
        if !self.should_begin(Recognizer::TouchDown) {
            return false;
        }
        self.stop_snap_animation();
        true
    }

    /// A tap at `viewport_x`. Selects the item whose tile centre is closest
    /// to the tap point; returns whether the tap was recognized.
    pub fn tap(&mut self, viewport_x: f32) -> bool {
        if !self.should_begin(Recognizer::Tap) {
            return false;
        }
        let content_x = viewport_x + self.host.content_offset_x();
        let Some((tile_index, tile)) = self.tiles.nearest_to(content_x) else {
            return true;
        };
        let item_index = tile.item_index;
        tracing::debug!(tile_index, item_index, "tap selected item");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_select_item(item_index);
        }
        true
    }

    // --- Delegate fan-out ---

    fn emit_will_end_swipe(&mut self, item_index: usize, direction: SwipeDirection) {
        tracing::debug!(item_index, ?direction, "will end swipe");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.will_end_swipe(item_index, direction);
        }
    }

    fn emit_did_end_decelerating(&mut self, item_index: usize, was_aborted: bool) {
        tracing::debug!(item_index, was_aborted, "did end decelerating");
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_end_decelerating(item_index, was_aborted);
        }
    }
}
