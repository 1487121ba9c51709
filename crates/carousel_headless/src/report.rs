//! Report output model for headless carousel runs.

use std::io::Write;
use std::path::{Component, Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::assert::CarouselSnapshot;
use crate::fixture::DelegateEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub final_offset_x: f32,
    pub final_center_item: Option<usize>,
    /// Every delegate callback of the run, in order
    pub events: Vec<DelegateEvent>,
}

/// Virtual time elapsed in a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunClock {
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
}

impl HeadlessReport {
    pub fn passed(clock: RunClock, snapshot: &CarouselSnapshot, events: Vec<DelegateEvent>) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            code: None,
            message: None,
            elapsed_frames: clock.elapsed_frames,
            elapsed_ms: clock.elapsed_ms,
            final_offset_x: snapshot.offset_x,
            final_center_item: snapshot.center_item,
            events,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        code: String,
        message: String,
        clock: RunClock,
        snapshot: &CarouselSnapshot,
        events: Vec<DelegateEvent>,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            code: Some(code),
            message: Some(message),
            ..Self::passed(clock, snapshot, events)
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.is_absolute() || path.has_root() {
            bail!("report path must be relative and must not start with a separator");
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!("report path cannot contain '..' or drive prefixes");
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        std::fs::write(path, payload).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::Phase;

    fn snapshot() -> CarouselSnapshot {
        CarouselSnapshot {
            offset_x: 2350.0,
            presented_offset_x: 2350.0,
            viewport_width: 300.0,
            center_item: Some(0),
            phase: Phase::Idle,
            tile_count: 14,
            tile_span: Some((1750.0, 3150.0)),
            visible_items: vec![4, 0, 1],
            recent_events: Vec::new(),
            deceleration_count: 1,
        }
    }

    #[test]
    fn test_failed_report_keeps_final_state() {
        let clock = RunClock {
            elapsed_frames: 30,
            elapsed_ms: 480,
        };
        let events = vec![DelegateEvent::DidEndDecelerating {
            item: 0,
            aborted: false,
        }];
        let report = HeadlessReport::failed(
            "assert_offset",
            3,
            "offset_mismatch".to_string(),
            "expected offset 1 ± 0.5, got 2350".to_string(),
            clock,
            &snapshot(),
            events.clone(),
        );

        assert!(!report.is_passed());
        assert_eq!(report.failed_step_index, Some(3));
        assert_eq!(report.final_center_item, Some(0));
        assert_eq!(report.events, events);
        assert_eq!(report.elapsed_ms, 480);
    }

    #[test]
    fn test_report_json_shape() {
        let report = HeadlessReport::passed(RunClock::default(), &snapshot(), Vec::new());
        let mut out = Vec::new();
        report.write_to_writer(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "passed");
        assert_eq!(value["final_offset_x"], 2350.0);
        assert!(value["failed_step_index"].is_null());
    }

    #[test]
    fn test_report_path_must_stay_relative() {
        let report = HeadlessReport::passed(RunClock::default(), &snapshot(), Vec::new());
        assert!(report.write_to_path(Path::new("/tmp/report.json")).is_err());
        assert!(report.write_to_path(Path::new("../report.json")).is_err());
    }
}
