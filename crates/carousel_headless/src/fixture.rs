//! Carousel fixtures
//!
//! A fixture describes the viewport, the items and the configuration a
//! headless run starts from:
//!
//! ```toml
//! [viewport]
//! width = 390.0
//! height = 120.0
//!
//! [items]
//! widths = [120.0, 160.0, 120.0]
//!
//! [config]
//! snap_enabled = true
//!
//! [config.snap_animation]
//! style = "curve"
//! duration = 0.25
//! easing = "ease_out"
//! ```

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use carousel_core::{
    CarouselConfig, CarouselDataSource, CarouselDelegate, InfiniteCarousel, Size, SwipeDirection,
};
use serde::{Deserialize, Serialize};

use crate::surface::{SimView, SimulatedSurface};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportFixture {
    pub width: f32,
    pub height: f32,
}

impl ViewportFixture {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Item widths, listed or uniform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsFixture {
    Widths { widths: Vec<f32> },
    /// `count` may be negative to exercise the data-source contract
    Uniform { count: isize, width: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselFixture {
    pub viewport: ViewportFixture,
    pub items: ItemsFixture,
    #[serde(default)]
    pub config: CarouselConfig,
}

impl Default for CarouselFixture {
    fn default() -> Self {
        Self {
            viewport: ViewportFixture {
                width: 390.0,
                height: 120.0,
            },
            items: ItemsFixture::Widths {
                widths: vec![120.0, 160.0, 120.0, 200.0, 140.0],
            },
            config: CarouselConfig::default(),
        }
    }
}

impl CarouselFixture {
    /// Load a fixture from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize fixture")
    }

    /// Widths in item order; a negative count yields no items
    pub fn item_widths(&self) -> Vec<f32> {
        match &self.items {
            ItemsFixture::Widths { widths } => widths.clone(),
            ItemsFixture::Uniform { count, width } => vec![*width; (*count).max(0) as usize],
        }
    }

    pub fn data_source(&self) -> FixtureDataSource {
        let count = match &self.items {
            ItemsFixture::Widths { widths } => widths.len() as isize,
            ItemsFixture::Uniform { count, .. } => *count,
        };
        FixtureDataSource {
            count,
            widths: self.item_widths(),
            next_id: 0,
        }
    }

    /// Carousel on a fresh simulated surface, loaded and laid out
    pub fn build(&self) -> (InfiniteCarousel<SimulatedSurface>, DelegateLog) {
        let log = DelegateLog::default();
        let mut carousel = InfiniteCarousel::new(SimulatedSurface::new(), self.config);
        carousel.set_data_source(self.data_source());
        carousel.set_delegate(log.clone());
        carousel.reload_data();
        carousel.layout(self.viewport.size());
        (carousel, log)
    }
}

/// Data source serving [`SimView`]s with unique ids
#[derive(Debug, Clone)]
pub struct FixtureDataSource {
    count: isize,
    widths: Vec<f32>,
    next_id: u64,
}

impl CarouselDataSource<SimView> for FixtureDataSource {
    fn number_of_items(&self) -> isize {
        self.count
    }

    fn width_for_item(&self, index: usize) -> f32 {
        self.widths.get(index).copied().unwrap_or(0.0)
    }

    fn view_for_item(&mut self, index: usize, _size: Size) -> SimView {
        self.next_id += 1;
        SimView {
            id: self.next_id,
            item_index: index,
        }
    }
}

/// A delegate callback as recorded by [`DelegateLog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DelegateEvent {
    WillEndSwipe {
        item: usize,
        direction: SwipeDirection,
    },
    DidEndDecelerating {
        item: usize,
        aborted: bool,
    },
    DidSelectItem {
        item: usize,
    },
}

/// Shared record of delegate callbacks
#[derive(Debug, Clone, Default)]
pub struct DelegateLog {
    events: Rc<RefCell<Vec<DelegateEvent>>>,
}

impl DelegateLog {
    pub fn events(&self) -> Vec<DelegateEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn deceleration_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, DelegateEvent::DidEndDecelerating { .. }))
            .count()
    }

    fn push(&self, event: DelegateEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl CarouselDelegate for DelegateLog {
    fn will_end_swipe(&mut self, item_index: usize, direction: SwipeDirection) {
        self.push(DelegateEvent::WillEndSwipe {
            item: item_index,
            direction,
        });
    }

    fn did_end_decelerating(&mut self, item_index: usize, was_aborted: bool) {
        self.push(DelegateEvent::DidEndDecelerating {
            item: item_index,
            aborted: was_aborted,
        });
    }

    fn did_select_item(&mut self, item_index: usize) {
        self.push(DelegateEvent::DidSelectItem { item: item_index });
    }
}
