//! Carousel Headless
//!
//! Deterministic host for the carousel engine. A [`SimulatedSurface`] stands
//! in for a platform scroll view and runs on virtual time, so drags, flings,
//! snap animations and taps play out identically on every run.
//!
//! # Features
//!
//! - **Simulated Surface**: Native deceleration, animated offset changes and
//!   snap animations driven by `carousel_animation`
//! - **Fixtures**: TOML description of viewport, items and configuration
//! - **Scenarios**: JSON step lists mixing gestures, frame ticks and assertions
//! - **Reports**: Machine-readable JSON result of a run
//!
//! # Example
//!
//! ```ignore
//! use carousel_headless::{run_scenario_json, CarouselFixture, HeadlessRunConfig};
//!
//! let fixture = CarouselFixture::default();
//! let outcome = run_scenario_json(
//!     &fixture,
//!     r#"{"steps": [{"type": "drag", "distance": 240.0}, {"type": "settle"}]}"#,
//!     HeadlessRunConfig::default(),
//! )?;
//! assert!(!outcome.is_failed());
//! ```

pub mod assert;
pub mod fixture;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod surface;

pub use assert::{AssertionResult, CarouselSnapshot};
pub use fixture::{CarouselFixture, DelegateEvent, DelegateLog, FixtureDataSource, ItemsFixture, ViewportFixture};
pub use report::{HeadlessReport, ReportStatus, RunClock};
pub use runner::{run_scenario, run_scenario_json, HeadlessDriver, HeadlessRunConfig, RunOutcome};
pub use scenario::{HeadlessScenario, ScenarioStep};
pub use surface::{MountedView, SimView, SimulatedSurface};
