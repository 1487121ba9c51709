//! Recentering bookkeeping and reentrancy guards
//!
//! The physical scroll range is finite, so the offset is periodically jumped
//! back to the middle. [`RecenterState`] tracks how far the tile line has
//! been shifted in total, where tiling last happened, and which passes are
//! currently allowed to run.
//!
//! The shift is kept as a remainder within one cycle of item widths plus a
//! tile index base for the whole cycles, so it stays small however long the
//! carousel spins in one direction.

use crate::tiling::TileIndex;

/// Minimum overhang kept tiled on each side of the viewport
pub const MIN_OVERHANG: f32 = 500.0;

/// Distances derived from the viewport width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttles {
    /// Extra width tiled beyond each viewport edge
    pub overhang: f32,
    /// Offset change needed before a throttled retile runs
    pub tile: f32,
    /// Distance from centre needed before a throttled recenter runs
    pub recenter: f32,
}

impl Throttles {
    pub fn for_width(viewport_width: f32) -> Self {
        let overhang = MIN_OVERHANG.max(viewport_width);
        Self {
            overhang,
            tile: overhang / 5.0,
            recenter: overhang / 2.0,
        }
    }
}

impl Default for Throttles {
    fn default() -> Self {
        Self::for_width(0.0)
    }
}

/// What the engine is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineActivity {
    #[default]
    Idle,
    /// A tiling pass is adding or evicting tiles
    Tiling,
    /// The offset is being jumped back to the centre
    Recentering,
    /// A custom snap animation owns the offset
    Animating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Tiling,
    Recentering,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecenterState {
    /// Shift applied to the tile line by recenters, folded into one cycle
    /// once [`RecenterState::wrap_accumulator`] has run
    pub accumulator_x: f64,
    /// Tile index of the walk's tile 0, moved by `count` per folded cycle
    pub tile_base: TileIndex,
    /// Offset at which the last tiling pass ran, reference for the
    /// tiling throttle
    pub last_tile_offset_x: f32,
    tiling_suspend_depth: u32,
    recenter_suspend_depth: u32,
    snap_hold: bool,
    pass: Option<Pass>,
}

impl Default for RecenterState {
    fn default() -> Self {
        Self {
            accumulator_x: 0.0,
            tile_base: 0,
            last_tile_offset_x: f32::INFINITY,
            tiling_suspend_depth: 0,
            recenter_suspend_depth: 0,
            snap_hold: false,
            pass: None,
        }
    }
}

impl RecenterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all tile positions; the next throttled retile always runs
    pub fn reset(&mut self) {
        self.accumulator_x = 0.0;
        self.tile_base = 0;
        self.last_tile_offset_x = f32::INFINITY;
    }

    pub fn activity(&self) -> EngineActivity {
        match self.pass {
            Some(Pass::Tiling) => EngineActivity::Tiling,
            Some(Pass::Recentering) => EngineActivity::Recentering,
            None if self.snap_hold => EngineActivity::Animating,
            None => EngineActivity::Idle,
        }
    }

    pub fn tiling_suspend_depth(&self) -> u32 {
        self.tiling_suspend_depth
    }

    pub fn recenter_suspend_depth(&self) -> u32 {
        self.recenter_suspend_depth
    }

    pub fn can_tile(&self) -> bool {
        self.tiling_suspend_depth == 0 && self.pass.is_none()
    }

    pub fn can_recenter(&self) -> bool {
        self.recenter_suspend_depth == 0 && self.pass.is_none()
    }

    /// True when a throttled retile at `offset_x` would be skipped
    pub fn is_tile_throttled(&self, offset_x: f32, throttle: f32) -> bool {
        (self.last_tile_offset_x - offset_x).abs() <= throttle
    }

    pub(crate) fn begin_tiling(&mut self) {
        debug_assert!(self.pass.is_none(), "nested tiling pass");
        self.pass = Some(Pass::Tiling);
    }

    pub(crate) fn end_tiling(&mut self, offset_x: f32) {
        self.last_tile_offset_x = offset_x;
        self.pass = None;
    }

    /// Tiling stays suspended until [`RecenterState::end_recenter`]
    pub(crate) fn begin_recenter(&mut self) {
        debug_assert!(self.pass.is_none(), "nested recenter pass");
        self.tiling_suspend_depth += 1;
        self.pass = Some(Pass::Recentering);
    }

    /// Record a recenter by `shift`; with `shift_tiles` the tile line moves
    /// along with the offset
    pub(crate) fn apply_shift(&mut self, shift: f32, shift_tiles: bool) {
        self.last_tile_offset_x += shift;
        if shift_tiles {
            self.accumulator_x += f64::from(shift);
        }
    }

    /// Fold whole cycles of `cycle_width` out of the accumulator into the
    /// tile base. Tiles keep their indices and positions.
    pub(crate) fn wrap_accumulator(&mut self, cycle_width: f32, count: usize) {
        let cycle_width = f64::from(cycle_width);
        if !cycle_width.is_finite() || cycle_width <= 0.0 || count == 0 {
            return;
        }
        let cycles = (self.accumulator_x / cycle_width).floor();
        if cycles == 0.0 {
            return;
        }
        self.accumulator_x -= cycles * cycle_width;
        // rounding can land exactly on the upper bound
        if self.accumulator_x >= cycle_width {
            self.accumulator_x -= cycle_width;
        }
        self.tile_base = self
            .tile_base
            .saturating_sub((cycles as i64).saturating_mul(count as i64));
    }

    pub(crate) fn end_recenter(&mut self) {
        self.tiling_suspend_depth = self.tiling_suspend_depth.saturating_sub(1);
        self.pass = None;
    }

    /// Suspend tiling and recentering for a custom snap animation. A cycle
    /// holds at most once; returns false if the hold was already taken.
    pub(crate) fn acquire_snap_hold(&mut self) -> bool {
        if self.snap_hold {
            return false;
        }
        self.snap_hold = true;
        self.tiling_suspend_depth += 1;
        self.recenter_suspend_depth += 1;
        true
    }

    /// Undo [`RecenterState::acquire_snap_hold`]; no-op without a hold
    pub(crate) fn release_snap_hold(&mut self) -> bool {
        if !self.snap_hold {
            return false;
        }
        self.snap_hold = false;
        self.tiling_suspend_depth = self.tiling_suspend_depth.saturating_sub(1);
        self.recenter_suspend_depth = self.recenter_suspend_depth.saturating_sub(1);
        true
    }

    pub fn has_snap_hold(&self) -> bool {
        self.snap_hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttles_scale_with_width() {
        let narrow = Throttles::for_width(320.0);
        assert_eq!(narrow.overhang, 500.0);
        assert_eq!(narrow.tile, 100.0);
        assert_eq!(narrow.recenter, 250.0);

        let wide = Throttles::for_width(1000.0);
        assert_eq!(wide.overhang, 1000.0);
        assert_eq!(wide.tile, 200.0);
    }

    #[test]
    fn test_fresh_state_never_throttles() {
        let state = RecenterState::new();
        assert!(!state.is_tile_throttled(2500.0, 100.0));
        assert_eq!(state.activity(), EngineActivity::Idle);
    }

    #[test]
    fn test_snap_hold_is_taken_once() {
        let mut state = RecenterState::new();
        assert!(state.acquire_snap_hold());
        assert!(!state.acquire_snap_hold());
        assert_eq!(state.tiling_suspend_depth(), 1);
        assert_eq!(state.recenter_suspend_depth(), 1);
        assert_eq!(state.activity(), EngineActivity::Animating);
        assert!(!state.can_tile());
        assert!(!state.can_recenter());

        assert!(state.release_snap_hold());
        assert!(!state.release_snap_hold());
        assert_eq!(state.tiling_suspend_depth(), 0);
        assert_eq!(state.recenter_suspend_depth(), 0);
        assert!(state.can_tile());
    }

    #[test]
    fn test_recenter_pass_blocks_tiling() {
        let mut state = RecenterState::new();
        state.last_tile_offset_x = 1000.0;
        state.begin_recenter();
        assert_eq!(state.activity(), EngineActivity::Recentering);
        assert!(!state.can_tile());
        assert!(!state.can_recenter());
        state.apply_shift(250.0, true);
        state.end_recenter();

        assert!(state.can_tile());
        assert_eq!(state.last_tile_offset_x, 1250.0);
        assert_eq!(state.accumulator_x, 250.0);
    }

    #[test]
    fn test_shift_without_tiles_keeps_accumulator() {
        let mut state = RecenterState::new();
        state.last_tile_offset_x = 0.0;
        state.apply_shift(-40.0, false);
        assert_eq!(state.accumulator_x, 0.0);
        assert_eq!(state.last_tile_offset_x, -40.0);
    }

    #[test]
    fn test_reset_restores_infinite_reference() {
        let mut state = RecenterState::new();
        state.begin_tiling();
        assert_eq!(state.activity(), EngineActivity::Tiling);
        state.end_tiling(300.0);
        state.accumulator_x = 12.0;
        assert!(state.is_tile_throttled(350.0, 100.0));
        state.reset();
        assert!(!state.is_tile_throttled(350.0, 100.0));
        assert_eq!(state.accumulator_x, 0.0);
    }

    #[test]
    fn test_wrap_folds_cycles_into_tile_base() {
        let mut state = RecenterState::new();
        state.apply_shift(-700.0, true);
        state.wrap_accumulator(500.0, 5);
        assert_eq!(state.accumulator_x, 300.0);
        assert_eq!(state.tile_base, 10);

        state.apply_shift(900.0, true);
        state.wrap_accumulator(500.0, 5);
        assert_eq!(state.accumulator_x, 200.0);
        assert_eq!(state.tile_base, 0);

        state.apply_shift(-100.0, true);
        state.wrap_accumulator(500.0, 5);
        assert_eq!(state.accumulator_x, 100.0);
        assert_eq!(state.tile_base, 0);
    }

    #[test]
    fn test_wrap_ignores_unwalkable_cycle() {
        let mut state = RecenterState::new();
        state.apply_shift(-700.0, true);
        state.wrap_accumulator(0.0, 5);
        state.wrap_accumulator(500.0, 0);
        assert_eq!(state.accumulator_x, -700.0);
        assert_eq!(state.tile_base, 0);
    }
}
