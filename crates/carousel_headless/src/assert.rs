//! Assertion helpers for headless carousel runs.

use carousel_core::Phase;
use serde::{Deserialize, Serialize};

use crate::fixture::DelegateEvent;

/// Observable carousel state used for assertions and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselSnapshot {
    pub offset_x: f32,
    pub presented_offset_x: f32,
    pub viewport_width: f32,
    pub center_item: Option<usize>,
    pub phase: Phase,
    pub tile_count: usize,
    /// Content-space extent of the materialized tiles
    pub tile_span: Option<(f32, f32)>,
    pub visible_items: Vec<usize>,
    /// Events since the previous `assert_events`
    pub recent_events: Vec<DelegateEvent>,
    pub deceleration_count: usize,
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionResult::Passed)
    }
}

pub fn evaluate_center_item(expected: Option<usize>, snapshot: &CarouselSnapshot) -> AssertionResult {
    if snapshot.center_item == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "center_item_mismatch",
            format!(
                "expected centre item {expected:?}, got {:?} at offset {}",
                snapshot.center_item, snapshot.offset_x
            ),
        )
    }
}

pub fn evaluate_events(expected: &[DelegateEvent], snapshot: &CarouselSnapshot) -> AssertionResult {
    if snapshot.recent_events == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "events_mismatch",
            format!("expected events {expected:?}, got {:?}", snapshot.recent_events),
        )
    }
}

pub fn evaluate_deceleration_count(expected: usize, snapshot: &CarouselSnapshot) -> AssertionResult {
    if snapshot.deceleration_count == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "deceleration_count_mismatch",
            format!(
                "expected {expected} deceleration callbacks, got {}",
                snapshot.deceleration_count
            ),
        )
    }
}

pub fn evaluate_offset(expected: f32, tolerance: f32, snapshot: &CarouselSnapshot) -> AssertionResult {
    if (snapshot.offset_x - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "offset_mismatch",
            format!(
                "expected offset {expected} ± {tolerance}, got {}",
                snapshot.offset_x
            ),
        )
    }
}

pub fn evaluate_phase(expected: Phase, snapshot: &CarouselSnapshot) -> AssertionResult {
    if snapshot.phase == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "phase_mismatch",
            format!("expected phase {expected:?}, got {:?}", snapshot.phase),
        )
    }
}

pub fn evaluate_visible_items(expected: &[usize], snapshot: &CarouselSnapshot) -> AssertionResult {
    if snapshot.visible_items == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "visible_items_mismatch",
            format!(
                "expected visible items {expected:?}, got {:?}",
                snapshot.visible_items
            ),
        )
    }
}

/// The tile span must contain the viewport at the presented offset
pub fn evaluate_tiles_cover(snapshot: &CarouselSnapshot) -> AssertionResult {
    let Some((min_x, max_x)) = snapshot.tile_span else {
        return AssertionResult::failed("no_tiles", "no tiles are materialized".to_string());
    };
    let view_min = snapshot.presented_offset_x;
    let view_max = view_min + snapshot.viewport_width;
    if min_x <= view_min && max_x >= view_max {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "tiles_not_covering",
            format!("tiles span {min_x}..{max_x}, viewport spans {view_min}..{view_max}"),
        )
    }
}
