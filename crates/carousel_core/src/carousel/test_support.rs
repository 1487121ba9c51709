//! In-memory host, data source and delegate for the carousel unit tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::InfiniteCarousel;
use crate::config::CarouselConfig;
use crate::geometry::{Frame, Size};
use crate::gesture::SwipeDirection;
use crate::host::{HostSurface, SnapAnimationId, SnapAnimationRequest};
use crate::source::{CarouselDataSource, CarouselDelegate};

#[derive(Debug, Clone, PartialEq)]
pub struct MockView {
    pub id: u64,
    pub item_index: usize,
}

/// Host that applies every command instantly and records it
#[derive(Debug, Default)]
pub struct MockSurface {
    pub offset_x: f32,
    /// In-flight value of the running snap animation
    pub presented_x: Option<f32>,
    pub viewport: Size,
    pub content_width: f32,
    pub bounces: bool,
    pub deceleration_rate: f32,
    pub tracking: bool,
    pub decelerating: bool,
    pub mounted: FxHashMap<u64, Frame>,
    pub offset_writes: usize,
    pub animated_targets: Vec<f32>,
    pub snap_requests: Vec<SnapAnimationRequest>,
    pub active_snap: Option<SnapAnimationId>,
    next_snap_id: u64,
}

impl MockSurface {
    /// End the running snap animation normally, returning its id
    pub fn complete_snap(&mut self) -> Option<SnapAnimationId> {
        self.presented_x = None;
        self.active_snap.take()
    }
}

impl HostSurface for MockSurface {
    type View = MockView;

    fn content_offset_x(&self) -> f32 {
        self.offset_x
    }

    fn set_content_offset_x(&mut self, offset_x: f32, animated: bool) {
        self.offset_x = offset_x;
        self.offset_writes += 1;
        if animated {
            self.animated_targets.push(offset_x);
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
        self.decelerating
    }

    fn mount_view(&mut self, view: &MockView, frame: Frame) {
        let previous = self.mounted.insert(view.id, frame);
        assert!(previous.is_none(), "view {} mounted twice", view.id);
    }

    fn move_view(&mut self, view: &MockView, frame: Frame) {
        let previous = self.mounted.insert(view.id, frame);
        assert!(previous.is_some(), "moved unmounted view {}", view.id);
    }

    fn unmount_view(&mut self, view: MockView) {
        let previous = self.mounted.remove(&view.id);
        assert!(previous.is_some(), "unmounted unknown view {}", view.id);
    }

    fn start_snap_animation(&mut self, request: SnapAnimationRequest) -> SnapAnimationId {
        self.next_snap_id += 1;
        let id = SnapAnimationId(self.next_snap_id);
        self.presented_x = Some(request.from_x);
        self.offset_x = request.to_x;
        self.snap_requests.push(request);
        self.active_snap = Some(id);
        id
    }

    fn cancel_snap_animation(&mut self, id: SnapAnimationId) -> Option<f32> {
        if self.active_snap != Some(id) {
            return None;
        }
        self.active_snap = None;
        let presented = self.presented_x.take().unwrap_or(self.offset_x);
        self.offset_x = presented;
        Some(presented)
    }

    fn presented_offset_x(&self) -> f32 {
        self.presented_x.unwrap_or(self.offset_x)
    }
}

pub struct VecSource {
    pub count: isize,
    pub widths: Vec<f32>,
    pub next_id: u64,
    pub created: Rc<Cell<usize>>,
}

impl VecSource {
    pub fn new(widths: &[f32]) -> Self {
        Self {
            count: widths.len() as isize,
            widths: widths.to_vec(),
            next_id: 0,
            created: Rc::default(),
        }
    }
}

impl CarouselDataSource<MockView> for VecSource {
    fn number_of_items(&self) -> isize {
        self.count
    }

    fn width_for_item(&self, index: usize) -> f32 {
        self.widths[index]
    }

    fn view_for_item(&mut self, index: usize, _size: Size) -> MockView {
        self.next_id += 1;
        self.created.set(self.created.get() + 1);
        MockView {
            id: self.next_id,
            item_index: index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    WillEndSwipe(usize, SwipeDirection),
    DidEndDecelerating(usize, bool),
    DidSelect(usize),
}

#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Event>>>);

impl Recorder {
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn decelerations(&self) -> Vec<(usize, bool)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::DidEndDecelerating(item, aborted) => Some((*item, *aborted)),
                _ => None,
            })
            .collect()
    }
}

impl CarouselDelegate for Recorder {
    fn will_end_swipe(&mut self, item_index: usize, direction: SwipeDirection) {
        self.0.borrow_mut().push(Event::WillEndSwipe(item_index, direction));
    }

    fn did_end_decelerating(&mut self, item_index: usize, was_aborted: bool) {
        self.0
            .borrow_mut()
            .push(Event::DidEndDecelerating(item_index, was_aborted));
    }

    fn did_select_item(&mut self, item_index: usize) {
        self.0.borrow_mut().push(Event::DidSelect(item_index));
    }
}

pub struct Harness {
    pub carousel: InfiniteCarousel<MockSurface>,
    pub events: Recorder,
    pub created: Rc<Cell<usize>>,
}

impl Harness {
    /// Carousel over `widths`, reloaded and laid out at `viewport`
    pub fn new(widths: &[f32], config: CarouselConfig, viewport: Size) -> Self {
        Self::with_source(VecSource::new(widths), config, viewport)
    }

    pub fn with_source(source: VecSource, config: CarouselConfig, viewport: Size) -> Self {
        let created = source.created.clone();
        let events = Recorder::default();
        let mut carousel = InfiniteCarousel::new(MockSurface::default(), config);
        carousel.set_data_source(source);
        carousel.set_delegate(events.clone());
        carousel.reload_data();
        carousel.layout(viewport);
        Self {
            carousel,
            events,
            created,
        }
    }

    pub fn offset(&self) -> f32 {
        self.carousel.host().offset_x
    }

    /// The user moved the content to `offset_x`
    pub fn drag_to(&mut self, offset_x: f32) {
        self.carousel.host_mut().offset_x = offset_x;
        self.carousel.did_scroll();
    }

    /// Release with `velocity_x`; returns the host's target offset
    pub fn release(&mut self, velocity_x: f32) -> f32 {
        let current = self.offset();
        let target = self.carousel.will_end_dragging(velocity_x, current);
        let will_decelerate = target != current;
        self.carousel.did_end_dragging(will_decelerate);
        target
    }

    /// Tile frames sorted by tile index
    pub fn frames(&self) -> Vec<(i64, Frame)> {
        let tiles = self.carousel.tiles();
        tiles
            .sorted_indices()
            .into_iter()
            .filter_map(|index| tiles.get(index).map(|tile| (index, tile.frame)))
            .collect()
    }

    /// Screen-space position of every tile
    pub fn screen_positions(&self) -> Vec<(i64, f32)> {
        let offset = self.offset();
        self.frames()
            .into_iter()
            .map(|(index, frame)| (index, frame.x - offset))
            .collect()
    }

    /// Host mirrors every tile frame
    pub fn assert_host_in_sync(&self) {
        let host = &self.carousel.host().mounted;
        let tiles = self.carousel.tiles();
        assert_eq!(host.len(), tiles.len());
        for (_, tile) in tiles.iter() {
            assert_eq!(host.get(&tile.view.id), Some(&tile.frame));
        }
    }
}
