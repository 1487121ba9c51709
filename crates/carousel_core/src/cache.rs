//! Item cache
//!
//! Read-only snapshot of what the data source reported: item count, widths,
//! their sum, and where item 0 starts relative to the content centre. Always
//! rebuilt wholesale on reload, never patched.

use crate::error::{CarouselError, Result};
use crate::source::CarouselDataSource;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemCache {
    widths: Vec<f32>,
    total_width: f32,
}

impl ItemCache {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_widths(widths: Vec<f32>) -> Self {
        for (index, width) in widths.iter().enumerate() {
            if !(*width > 0.0) {
                tracing::warn!(index, width, "item width should be positive");
            }
        }
        let total_width = widths.iter().sum();
        Self { widths, total_width }
    }

    /// Query count and every width from `source`.
    ///
    /// A negative count trips a debug assertion and becomes zero in release
    /// builds.
    pub fn from_data_source<V>(source: &dyn CarouselDataSource<V>) -> Self {
        let count = match Self::checked_count(source.number_of_items()) {
            Ok(count) => count,
            Err(err) => {
                debug_assert!(false, "{err}");
                tracing::warn!("{err}; treating as empty");
                0
            }
        };
        let widths = (0..count).map(|index| source.width_for_item(index)).collect();
        let cache = Self::from_widths(widths);
        tracing::debug!(
            count = cache.count(),
            total_width = cache.total_width,
            "rebuilt item cache"
        );
        cache
    }

    pub fn checked_count(raw: isize) -> Result<usize> {
        usize::try_from(raw).map_err(|_| CarouselError::NegativeItemCount(raw))
    }

    pub fn count(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    pub fn width(&self, item_index: usize) -> Option<f32> {
        self.widths.get(item_index).copied()
    }

    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    /// Offset of item 0's left edge from the content centre (`-w0 / 2`),
    /// `None` without items
    pub fn zero_item_offset(&self) -> Option<f32> {
        self.widths.first().map(|w| -w / 2.0)
    }

    /// Whether a tile walk over these widths terminates
    pub(crate) fn is_walkable(&self) -> bool {
        !self.widths.is_empty() && self.total_width > 0.0 && self.total_width.is_finite()
    }
}
