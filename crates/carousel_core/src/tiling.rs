//! Tiling engine
//!
//! Tiles live on an unbounded integer line. Tile `t` shows item
//! `t mod count`, and tile `tile_base`'s left edge sits at
//! `scrollable_width / 2 + zero_item_offset + recenter_accumulator`.
//! Positions of the other tiles are running sums of consecutive widths.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cache::ItemCache;
use crate::geometry::Frame;

/// Key of a tile on the infinite tile line
pub type TileIndex = i64;

/// Item shown by `tile_index`, always within `0..count`
pub fn item_index(tile_index: TileIndex, count: usize) -> usize {
    debug_assert!(count > 0, "item index requested without items");
    if count == 0 {
        return 0;
    }
    tile_index.rem_euclid(count as i64) as usize
}

/// A materialized tile: the view handed out by the data source and where it
/// was placed in content coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Tile<V> {
    pub view: V,
    pub frame: Frame,
    pub item_index: usize,
}

/// Item whose tile is closest to the visible centre for some offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestItem {
    /// Content offset that puts the tile's centre under the viewport centre
    pub anchor_offset_x: f32,
    pub tile_center_x: f32,
    pub item_index: usize,
    pub tile_index: TileIndex,
}

/// Horizontal range that must be covered by tiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileWindow {
    pub min_x: f32,
    pub max_x: f32,
}

impl TileWindow {
    /// Visible range `[visible_min_x, visible_max_x]` widened by `overhang`
    /// on both sides and stretched to include `target_x`
    pub fn around(visible_min_x: f32, visible_max_x: f32, target_x: Option<f32>, overhang: f32) -> Self {
        let (min_x, max_x) = match target_x {
            Some(target) => (visible_min_x.min(target), visible_max_x.max(target)),
            None => (visible_min_x, visible_max_x),
        };
        Self {
            min_x: min_x - overhang,
            max_x: max_x + overhang,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }
}

/// A tile that the window needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedTile {
    pub tile_index: TileIndex,
    pub item_index: usize,
    pub frame: Frame,
}

/// Walks the tiles intersecting a window from left to right.
///
/// The walk starts at the cycle containing the window's left edge, so the
/// number of skipped tiles is bounded by the item count.
pub struct TileWalk<'a> {
    widths: &'a [f32],
    tile_index: TileIndex,
    x: f32,
    max_x: f32,
    height: f32,
}

impl<'a> TileWalk<'a> {
    /// Returns `None` when `cache` has no positive total width.
    pub fn new(cache: &'a ItemCache, zero_item_start_x: f64, window: TileWindow, height: f32) -> Option<Self> {
        if !cache.is_walkable() {
            return None;
        }
        let widths = cache.widths();
        let count = widths.len();
        let total = f64::from(cache.total_width());

        // casts saturate, so runaway accumulators cannot overflow the index
        let iteration = ((f64::from(window.min_x) - zero_item_start_x) / total).floor();
        let mut tile_index = (iteration as i64).saturating_mul(count as i64);
        let mut x = (zero_item_start_x + iteration * total) as f32;

        // skip tiles left of the window
        let mut width = widths[item_index(tile_index, count)];
        for _ in 0..count {
            if x + width >= window.min_x {
                break;
            }
            x += width;
            tile_index += 1;
            width = widths[item_index(tile_index, count)];
        }

        Some(Self {
            widths,
            tile_index,
            x,
            max_x: window.max_x,
            height,
        })
    }

    /// Number the walk so the tile at `zero_item_start_x` is `base`.
    /// `base` must be a multiple of the item count.
    pub fn with_tile_base(mut self, base: TileIndex) -> Self {
        debug_assert_eq!(base.rem_euclid(self.widths.len() as i64), 0);
        self.tile_index = self.tile_index.saturating_add(base);
        self
    }
}

impl Iterator for TileWalk<'_> {
    type Item = PlannedTile;

    fn next(&mut self) -> Option<PlannedTile> {
        if self.x >= self.max_x {
            return None;
        }
        let item_index = item_index(self.tile_index, self.widths.len());
        let width = self.widths[item_index];
        let planned = PlannedTile {
            tile_index: self.tile_index,
            item_index,
            frame: Frame::new(self.x, width, self.height),
        };
        self.x += width;
        self.tile_index += 1;
        Some(planned)
    }
}

/// Materialized tiles keyed by tile index, one view per key
#[derive(Debug)]
pub struct VisibleTiles<V> {
    tiles: FxHashMap<TileIndex, Tile<V>>,
}

impl<V> Default for VisibleTiles<V> {
    fn default() -> Self {
        Self {
            tiles: FxHashMap::default(),
        }
    }
}

impl<V> VisibleTiles<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, tile_index: TileIndex) -> bool {
        self.tiles.contains_key(&tile_index)
    }

    pub fn get(&self, tile_index: TileIndex) -> Option<&Tile<V>> {
        self.tiles.get(&tile_index)
    }

    pub fn get_mut(&mut self, tile_index: TileIndex) -> Option<&mut Tile<V>> {
        self.tiles.get_mut(&tile_index)
    }

    /// Store a tile; a previous tile under the same key is returned so the
    /// caller can release its view
    pub fn insert(&mut self, tile_index: TileIndex, tile: Tile<V>) -> Option<Tile<V>> {
        self.tiles.insert(tile_index, tile)
    }

    pub fn remove(&mut self, tile_index: TileIndex) -> Option<Tile<V>> {
        self.tiles.remove(&tile_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileIndex, &Tile<V>)> {
        self.tiles.iter().map(|(index, tile)| (*index, tile))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TileIndex, &mut Tile<V>)> {
        self.tiles.iter_mut().map(|(index, tile)| (*index, tile))
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (TileIndex, Tile<V>)> + '_ {
        self.tiles.drain()
    }

    /// Tile indices in ascending order
    pub fn sorted_indices(&self) -> Vec<TileIndex> {
        let mut indices: Vec<_> = self.tiles.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    pub fn min_index(&self) -> Option<TileIndex> {
        self.tiles.keys().copied().min()
    }

    pub fn max_index(&self) -> Option<TileIndex> {
        self.tiles.keys().copied().max()
    }

    /// Remove every tile lying entirely outside `window`
    pub fn evict_outside(&mut self, window: TileWindow) -> SmallVec<[(TileIndex, Tile<V>); 8]> {
        let stale: SmallVec<[TileIndex; 8]> = self
            .tiles
            .iter()
            .filter(|(_, tile)| tile.frame.is_outside(window.min_x, window.max_x))
            .map(|(index, _)| *index)
            .collect();
        stale
            .into_iter()
            .filter_map(|index| self.tiles.remove(&index).map(|tile| (index, tile)))
            .collect()
    }

    /// Tile whose centre is closest to content x `point_x`. Ties go to the
    /// lower tile index.
    pub fn nearest_to(&self, point_x: f32) -> Option<(TileIndex, &Tile<V>)> {
        self.iter().min_by(|(a_index, a), (b_index, b)| {
            let a_distance = (a.frame.mid_x() - point_x).abs();
            let b_distance = (b.frame.mid_x() - point_x).abs();
            a_distance
                .total_cmp(&b_distance)
                .then_with(|| a_index.cmp(b_index))
        })
    }

    /// Tile nearest to the viewport centre for content offset
    /// `target_offset_x`
    pub fn nearest_center_item(&self, target_offset_x: f32, half_viewport_width: f32) -> Option<NearestItem> {
        let (tile_index, tile) = self.nearest_to(target_offset_x + half_viewport_width)?;
        let tile_center_x = tile.frame.mid_x();
        Some(NearestItem {
            anchor_offset_x: tile_center_x - half_viewport_width,
            tile_center_x,
            item_index: tile.item_index,
            tile_index,
        })
    }
}
