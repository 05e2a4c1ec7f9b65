use alloc::vec::Vec;

use crate::{DimensionMode, Error, LayoutOrder};

/// Cumulative start offsets for a dense strip of items.
///
/// `position(i)` is the sum of the extents and spacing of every item before `i`. Spacing is
/// only placed *between* items, so the last item contributes its extent alone:
/// `total = position(n - 1) + extent(n - 1)`.
///
/// The table only stores offsets. Extents are queried through a `size_of` callback while
/// building, which in variable-dimension mode typically binds a shared measurement slot.
#[derive(Clone, Debug, Default)]
pub struct LayoutTable {
    positions: Vec<u64>,
    total: u64,
    spacing: u32,
    uniform_extent: Option<u32>,
}

impl LayoutTable {
    pub fn new(spacing: u32) -> Self {
        Self {
            positions: Vec::new(),
            total: 0,
            spacing,
            uniform_extent: None,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total content extent along the axis.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn spacing(&self) -> u32 {
        self.spacing
    }

    /// Changes the inter-item spacing. Takes effect on the next [`Self::rebuild`].
    pub fn set_spacing(&mut self, spacing: u32) {
        self.spacing = spacing;
    }

    /// The extent cached by the last fixed-dimension pass, if any.
    pub fn uniform_extent(&self) -> Option<u32> {
        self.uniform_extent
    }

    pub fn positions(&self) -> &[u64] {
        &self.positions
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.total = 0;
        self.uniform_extent = None;
    }

    /// Recomputes the table for `count` items from scratch.
    ///
    /// In [`DimensionMode::Fixed`], `size_of` is called once (for index 0) and the result is
    /// reused for every item.
    pub fn rebuild(&mut self, count: usize, mode: DimensionMode, mut size_of: impl FnMut(usize) -> u32) {
        rdebug!(count, ?mode, spacing = self.spacing, "LayoutTable::rebuild");
        self.clear();
        self.positions.reserve_exact(count);
        self.push_items(count, mode, &mut size_of);
    }

    /// Appends items `len()..count` without re-querying existing ones.
    ///
    /// The previous last item gets the spacing it was withheld now that it has a successor.
    /// Shrinking (`count < len()`) falls back to a full [`Self::rebuild`].
    pub fn extend(&mut self, count: usize, mode: DimensionMode, mut size_of: impl FnMut(usize) -> u32) {
        let len = self.len();
        if count < len {
            self.rebuild(count, mode, size_of);
            return;
        }
        if count == len {
            return;
        }
        rdebug!(from = len, to = count, ?mode, "LayoutTable::extend");
        if mode == DimensionMode::Variable {
            self.uniform_extent = None;
        }
        if len > 0 {
            self.total = self.total.saturating_add(self.spacing as u64);
        }
        self.positions.reserve_exact(count - len);
        self.push_items(count, mode, &mut size_of);
    }

    fn push_items(&mut self, count: usize, mode: DimensionMode, size_of: &mut impl FnMut(usize) -> u32) {
        let spacing = self.spacing as u64;
        for i in self.positions.len()..count {
            self.positions.push(self.total);
            let extent = match mode {
                DimensionMode::Fixed => *self.uniform_extent.get_or_insert_with(|| size_of(i)),
                DimensionMode::Variable => size_of(i),
            };
            self.total = self.total.saturating_add(extent as u64);
            if i + 1 < count {
                self.total = self.total.saturating_add(spacing);
            }
        }
    }

    pub fn try_position(&self, index: usize) -> Result<u64, Error> {
        self.positions
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Start offset of `index`.
    ///
    /// Out-of-range indexes are a caller bug: debug builds assert, release builds clamp to
    /// the end of the content.
    pub fn position(&self, index: usize) -> u64 {
        match self.try_position(index) {
            Ok(position) => position,
            Err(_) => {
                rwarn!(index, len = self.len(), "LayoutTable: index out of range");
                debug_assert!(
                    index < self.len(),
                    "LayoutTable: index out of range (i={index}, len={})",
                    self.len()
                );
                self.total
            }
        }
    }

    pub fn try_end_of(&self, index: usize) -> Result<u64, Error> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        if index + 1 == len {
            return Ok(self.total);
        }
        Ok(self.positions[index + 1].saturating_sub(self.spacing as u64))
    }

    /// End offset of `index` (excluding trailing spacing).
    pub fn end_of(&self, index: usize) -> u64 {
        match self.try_end_of(index) {
            Ok(end) => end,
            Err(_) => {
                debug_assert!(
                    index < self.len(),
                    "LayoutTable: index out of range (i={index}, len={})",
                    self.len()
                );
                self.total
            }
        }
    }

    pub fn extent_of(&self, index: usize) -> u32 {
        let extent = self.end_of(index).saturating_sub(self.position(index));
        extent.min(u32::MAX as u64) as u32
    }

    /// Start offset of `index` when the strip is laid out in reverse.
    ///
    /// Index `n - 1` starts at 0 and index 0 ends at `total`.
    pub fn mirrored_position(&self, index: usize) -> u64 {
        self.total.saturating_sub(self.end_of(index))
    }

    /// Start offset of `index` under `order`.
    pub fn placement(&self, order: LayoutOrder, index: usize) -> u64 {
        match order {
            LayoutOrder::Forward => self.position(index),
            LayoutOrder::Reverse => self.mirrored_position(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn variable_rebuild_accumulates_extents_and_spacing() {
        let extents = [10u32, 20, 5];
        let mut t = LayoutTable::new(2);
        t.rebuild(3, DimensionMode::Variable, |i| extents[i]);
        assert_eq!(t.positions(), &[0, 12, 34]);
        // No spacing after the last item.
        assert_eq!(t.total(), 39);
        assert_eq!(t.end_of(0), 10);
        assert_eq!(t.end_of(2), 39);
        assert_eq!(t.extent_of(1), 20);
    }

    #[test]
    fn fixed_rebuild_queries_once() {
        let mut calls = Vec::new();
        let mut t = LayoutTable::new(0);
        t.rebuild(4, DimensionMode::Fixed, |i| {
            calls.push(i);
            7
        });
        assert_eq!(calls, vec![0]);
        assert_eq!(t.positions(), &[0, 7, 14, 21]);
        assert_eq!(t.total(), 28);
        assert_eq!(t.uniform_extent(), Some(7));
    }

    #[test]
    fn extend_restores_withheld_spacing() {
        let mut t = LayoutTable::new(3);
        t.rebuild(2, DimensionMode::Variable, |_| 10);
        assert_eq!(t.total(), 23);

        t.extend(4, DimensionMode::Variable, |_| 10);
        assert_eq!(t.positions(), &[0, 13, 26, 39]);
        assert_eq!(t.total(), 49);
    }

    #[test]
    fn extend_in_fixed_mode_reuses_cached_extent() {
        let mut calls = 0usize;
        let mut t = LayoutTable::new(1);
        t.rebuild(2, DimensionMode::Fixed, |_| {
            calls += 1;
            4
        });
        t.extend(5, DimensionMode::Fixed, |_| {
            calls += 1;
            99
        });
        assert_eq!(calls, 1);
        assert_eq!(t.positions(), &[0, 5, 10, 15, 20]);
        assert_eq!(t.total(), 24);
    }

    #[test]
    fn extend_with_fewer_items_rebuilds() {
        let mut t = LayoutTable::new(1);
        t.rebuild(5, DimensionMode::Variable, |_| 4);
        t.extend(2, DimensionMode::Variable, |_| 6);
        assert_eq!(t.positions(), &[0, 7]);
        assert_eq!(t.total(), 13);
    }

    #[test]
    fn extend_from_empty_matches_rebuild() {
        let extents = [3u32, 1, 4, 1, 5];
        let mut a = LayoutTable::new(2);
        a.extend(5, DimensionMode::Variable, |i| extents[i]);
        let mut b = LayoutTable::new(2);
        b.rebuild(5, DimensionMode::Variable, |i| extents[i]);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.total(), b.total());
    }

    #[test]
    fn single_item_has_one_zero_entry() {
        let mut t = LayoutTable::new(8);
        t.rebuild(1, DimensionMode::Fixed, |_| 30);
        assert_eq!(t.positions(), &[0]);
        assert_eq!(t.total(), 30);
        assert_eq!(t.mirrored_position(0), 0);
    }

    #[test]
    fn out_of_range_queries_report_errors() {
        let mut t = LayoutTable::new(0);
        t.rebuild(2, DimensionMode::Fixed, |_| 5);
        assert_eq!(t.try_position(1), Ok(5));
        assert_eq!(
            t.try_position(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            t.try_end_of(9),
            Err(Error::IndexOutOfRange { index: 9, len: 2 })
        );
    }

    #[test]
    fn mirrored_positions_place_last_item_first() {
        let extents = [10u32, 20, 30];
        let mut t = LayoutTable::new(5);
        t.rebuild(3, DimensionMode::Variable, |i| extents[i]);
        // Reverse strip: item2(0..30), gap, item1(35..55), gap, item0(60..70)
        assert_eq!(t.total(), 70);
        assert_eq!(t.mirrored_position(2), 0);
        assert_eq!(t.mirrored_position(1), 35);
        assert_eq!(t.mirrored_position(0), 60);
    }

    #[test]
    fn empty_table_is_zero() {
        let mut t = LayoutTable::new(4);
        t.rebuild(0, DimensionMode::Variable, |_| 10);
        assert!(t.is_empty());
        assert_eq!(t.total(), 0);
    }
}
