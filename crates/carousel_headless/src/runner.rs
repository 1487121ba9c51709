//! Scenario runner that drives a carousel on the simulated surface.

use anyhow::Result;
use carousel_core::{project, HostSurface, InfiniteCarousel, Phase, Recognizer, Size, TileIndex};

use crate::assert::{
    evaluate_center_item, evaluate_deceleration_count, evaluate_events, evaluate_offset, evaluate_phase,
    evaluate_tiles_cover, evaluate_visible_items, AssertionResult, CarouselSnapshot,
};
use crate::fixture::{CarouselFixture, DelegateEvent, DelegateLog};
use crate::report::{HeadlessReport, RunClock};
use crate::scenario::{HeadlessScenario, ScenarioStep};
use crate::surface::{HostEvents, SimulatedSurface};

/// Runtime settings for headless runs.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Virtual frame length
    pub tick_ms: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self { tick_ms: 16 }
    }
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Plays the part of the platform: delivers touches, scroll events and
/// frame ticks to a carousel in the order a scroll view would.
pub struct HeadlessDriver {
    carousel: InfiniteCarousel<SimulatedSurface>,
    log: DelegateLog,
    tick_ms: u64,
    clock: RunClock,
    /// Events already matched by `assert_events`
    asserted_events: usize,
}

impl HeadlessDriver {
    pub fn new(fixture: &CarouselFixture, config: HeadlessRunConfig) -> Self {
        let (carousel, log) = fixture.build();
        Self {
            carousel,
            log,
            tick_ms: config.tick_ms.max(1),
            clock: RunClock::default(),
            asserted_events: 0,
        }
    }

    pub fn carousel(&self) -> &InfiniteCarousel<SimulatedSurface> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut InfiniteCarousel<SimulatedSurface> {
        &mut self.carousel
    }

    pub fn log(&self) -> &DelegateLog {
        &self.log
    }

    pub fn events(&self) -> Vec<DelegateEvent> {
        self.log.events()
    }

    pub fn clock(&self) -> RunClock {
        self.clock
    }

    pub fn offset_x(&self) -> f32 {
        self.carousel.host().content_offset_x()
    }

    fn dispatch(&mut self, events: HostEvents) {
        for event in events {
            self.carousel.handle(event);
        }
    }

    fn flush(&mut self) {
        let events = self.carousel.host_mut().take_events();
        self.dispatch(events);
    }

    /// Advance one frame of `ms` milliseconds
    pub fn frame(&mut self, ms: u64) {
        let events = self.carousel.host_mut().tick(ms as f32 / 1000.0);
        self.dispatch(events);
        self.clock.elapsed_frames += 1;
        self.clock.elapsed_ms += ms;
    }

    pub fn tick(&mut self, frames: u32) {
        for _ in 0..frames {
            self.frame(self.tick_ms);
        }
    }

    pub fn wait(&mut self, ms: u64) {
        let mut remaining_ms = ms;
        while remaining_ms > 0 {
            let step_ms = remaining_ms.min(self.tick_ms);
            self.frame(step_ms);
            remaining_ms -= step_ms;
        }
    }

    /// Nothing moves and no cycle is open
    pub fn is_settled(&self) -> bool {
        self.carousel.host().is_idle() && self.carousel.phase() == Phase::Idle
    }

    /// Run frames until settled; false if `max_frames` was not enough
    pub fn settle(&mut self, max_frames: u32) -> bool {
        for _ in 0..max_frames {
            if self.is_settled() {
                return true;
            }
            self.frame(self.tick_ms);
        }
        self.is_settled()
    }

    fn press(&mut self) {
        self.carousel.host_mut().begin_touch();
        self.carousel.touch_down();
    }

    /// Drag moving the content offset by `distance` over `frames` frames,
    /// then release with `velocity` (points per millisecond, defaulting to
    /// the drag's own speed)
    pub fn drag(&mut self, distance: f32, frames: u32, velocity: Option<f32>) {
        let frames = frames.max(1);
        self.press();
        self.carousel.will_begin_dragging();
        // a deceleration stopped by the touch is closed by the drag begin
        self.flush();

        let step = distance / frames as f32;
        for _ in 0..frames {
            self.carousel.host_mut().drag_by(step);
            self.flush();
            self.frame(self.tick_ms);
        }

        let velocity_x = velocity.unwrap_or(distance / (frames as u64 * self.tick_ms) as f32);
        let host = self.carousel.host();
        let proposed_x = project(host.content_offset_x(), velocity_x, host.deceleration_rate());
        let target_x = self.carousel.will_end_dragging(velocity_x, proposed_x);

        let host = self.carousel.host_mut();
        host.end_touch();
        let will_decelerate = host.release(target_x);
        self.carousel.did_end_dragging(will_decelerate);
        self.flush();
        tracing::debug!(distance, velocity_x, target_x, will_decelerate, "drag released");
    }

    /// Touch and lift without moving. Content left overscrolled bounces
    /// back.
    pub fn touch_down(&mut self) {
        self.press();
        self.flush();
        let host = self.carousel.host_mut();
        host.end_touch();
        let offset_x = host.content_offset_x();
        host.release(offset_x);
    }

    /// Tap at viewport `x`. A touch that halts a snap animation or a
    /// deceleration is not a tap.
    pub fn tap(&mut self, x: f32) -> bool {
        let recognized = self.carousel.should_begin(Recognizer::Tap);
        self.touch_down();
        recognized && self.carousel.tap(x)
    }

    pub fn select_tile(&mut self, tile: TileIndex, animated: bool) {
        self.carousel.set_selected_index(tile, animated);
        self.flush();
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        let host = self.carousel.host();
        let tile_span = self.carousel.tiles().iter().fold(None, |span, (_, tile)| {
            let (min_x, max_x) = span.unwrap_or((f32::INFINITY, f32::NEG_INFINITY));
            Some((min_x.min(tile.frame.min_x()), max_x.max(tile.frame.max_x())))
        });
        let events = self.log.events();
        CarouselSnapshot {
            offset_x: host.content_offset_x(),
            presented_offset_x: host.presented_offset_x(),
            viewport_width: host.viewport().width,
            center_item: self.carousel.index_of_item_at_visible_center(),
            phase: self.carousel.phase(),
            tile_count: self.carousel.tiles().len(),
            tile_span,
            visible_items: host.visible_items(),
            recent_events: events.get(self.asserted_events..).unwrap_or_default().to_vec(),
            deceleration_count: self.log.deceleration_count(),
        }
    }

    /// Run one scenario step
    pub fn apply(&mut self, step: &ScenarioStep) -> AssertionResult {
        match step {
            ScenarioStep::Layout { width, height } => {
                self.carousel.layout(Size::new(*width, *height));
            }
            ScenarioStep::Reload => {
                self.carousel.reload_data();
                self.flush();
            }
            ScenarioStep::Drag {
                distance,
                frames,
                velocity,
            } => self.drag(*distance, *frames, *velocity),
            ScenarioStep::TouchDown => self.touch_down(),
            ScenarioStep::Tap { x } => {
                self.tap(*x);
            }
            ScenarioStep::Tick { frames } => self.tick(*frames),
            ScenarioStep::Wait { ms } => self.wait(*ms),
            ScenarioStep::Settle { max_frames } => {
                if !self.settle(*max_frames) {
                    return AssertionResult::Failed {
                        code: "settle_timeout".to_string(),
                        message: format!(
                            "still moving after {max_frames} frames (phase {:?})",
                            self.carousel.phase()
                        ),
                    };
                }
            }
            ScenarioStep::SelectTile { tile, animated } => self.select_tile(*tile, *animated),
            ScenarioStep::ScrollForward => {
                self.carousel.scroll_forward();
                self.flush();
            }
            ScenarioStep::ScrollBackward => {
                self.carousel.scroll_backward();
                self.flush();
            }
            ScenarioStep::SetSnapEnabled { enabled } => self.carousel.set_snap_enabled(*enabled),
            ScenarioStep::SetSnapAnimation { animation } => self.carousel.set_snap_animation(*animation),
            ScenarioStep::SetDecelerationEnabled { enabled } => {
                self.carousel.set_deceleration_enabled(*enabled)
            }
            ScenarioStep::AssertCenterItem { item } => return evaluate_center_item(*item, &self.snapshot()),
            ScenarioStep::AssertEvents { events } => {
                let result = evaluate_events(events, &self.snapshot());
                self.asserted_events = self.log.len();
                return result;
            }
            ScenarioStep::AssertDecelerationCount { count } => {
                return evaluate_deceleration_count(*count, &self.snapshot())
            }
            ScenarioStep::AssertOffset { x, tolerance } => {
                return evaluate_offset(*x, *tolerance, &self.snapshot())
            }
            ScenarioStep::AssertPhase { phase } => return evaluate_phase(*phase, &self.snapshot()),
            ScenarioStep::AssertVisibleItems { items } => {
                return evaluate_visible_items(items, &self.snapshot())
            }
            ScenarioStep::AssertTilesCover => return evaluate_tiles_cover(&self.snapshot()),
        }
        AssertionResult::Passed
    }
}

/// Execute scenario JSON against `fixture`.
pub fn run_scenario_json(
    fixture: &CarouselFixture,
    input: &str,
    config: HeadlessRunConfig,
) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    Ok(run_scenario(fixture, &scenario, config))
}

/// Execute a pre-loaded scenario against `fixture`.
pub fn run_scenario(
    fixture: &CarouselFixture,
    scenario: &HeadlessScenario,
    config: HeadlessRunConfig,
) -> RunOutcome {
    let mut driver = HeadlessDriver::new(fixture, config);

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(step_index, ?step, "scenario step");
        if let AssertionResult::Failed { code, message } = driver.apply(step) {
            let report = HeadlessReport::failed(
                step.assertion_name().unwrap_or("step"),
                step_index,
                code,
                message,
                driver.clock(),
                &driver.snapshot(),
                driver.events(),
            );
            return RunOutcome::Failed { report };
        }
    }

    RunOutcome::Passed {
        report: HeadlessReport::passed(driver.clock(), &driver.snapshot(), driver.events()),
    }
}
