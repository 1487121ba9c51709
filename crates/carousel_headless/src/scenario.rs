//! Scenario definition for headless carousel runs.

use std::path::Path;

use anyhow::{Context, Result};
use carousel_core::{Phase, SnapAnimation, TileIndex};
use serde::{Deserialize, Serialize};

use crate::fixture::DelegateEvent;

/// Sequence of headless steps run against one fixture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadlessScenario {
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse scenario {}", path.display()))
    }
}

fn default_drag_frames() -> u32 {
    10
}

fn default_settle_frames() -> u32 {
    600
}

fn default_tolerance() -> f32 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Layout {
        width: f32,
        height: f32,
    },
    Reload,
    /// Finger drag moving the content offset by `distance` over `frames`
    /// frames, then lifting. `velocity` (points per millisecond) defaults to
    /// the drag's own speed.
    Drag {
        distance: f32,
        #[serde(default = "default_drag_frames")]
        frames: u32,
        #[serde(default)]
        velocity: Option<f32>,
    },
    /// Touch and lift without moving
    TouchDown,
    Tap {
        x: f32,
    },
    Tick {
        frames: u32,
    },
    Wait {
        ms: u64,
    },
    /// Run frames until nothing moves
    Settle {
        #[serde(default = "default_settle_frames")]
        max_frames: u32,
    },
    SelectTile {
        tile: TileIndex,
        #[serde(default)]
        animated: bool,
    },
    ScrollForward,
    ScrollBackward,
    SetSnapEnabled {
        enabled: bool,
    },
    SetSnapAnimation {
        animation: SnapAnimation,
    },
    SetDecelerationEnabled {
        enabled: bool,
    },
    /// `null` expects no items
    AssertCenterItem {
        item: Option<usize>,
    },
    /// Delegate events recorded since the previous `assert_events`
    AssertEvents {
        events: Vec<DelegateEvent>,
    },
    /// Total `did_end_decelerating` callbacks so far
    AssertDecelerationCount {
        count: usize,
    },
    AssertOffset {
        x: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertPhase {
        phase: Phase,
    },
    /// Items on screen, left to right
    AssertVisibleItems {
        items: Vec<usize>,
    },
    /// Materialized tiles leave no gap across the viewport
    AssertTilesCover,
}

impl ScenarioStep {
    /// Name reported when the step fails; `None` for steps that cannot fail
    pub fn assertion_name(&self) -> Option<&'static str> {
        Some(match self {
            ScenarioStep::Settle { .. } => "settle",
            ScenarioStep::AssertCenterItem { .. } => "assert_center_item",
            ScenarioStep::AssertEvents { .. } => "assert_events",
            ScenarioStep::AssertDecelerationCount { .. } => "assert_deceleration_count",
            ScenarioStep::AssertOffset { .. } => "assert_offset",
            ScenarioStep::AssertPhase { .. } => "assert_phase",
            ScenarioStep::AssertVisibleItems { .. } => "assert_visible_items",
            ScenarioStep::AssertTilesCover => "assert_tiles_cover",
            _ => return None,
        })
    }
}
