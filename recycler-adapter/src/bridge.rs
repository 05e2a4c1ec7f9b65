use recycler::{Axis, LayoutOrder, LayoutTable, ViewportWindow};

use crate::{DataProvider, Slot, SlotPool};

/// A scroll position as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostOffset {
    /// Distance from the content start.
    Pixels(u64),
    /// Scrollbar position in `[0, 1]`.
    Normalized(f32),
}

/// Which end of the content a normalized position of `0.0` refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NormalizedOrigin {
    #[default]
    Start,
    /// `1.0` is the content start, as with vertical scrollbars that grow upward.
    End,
}

/// Converts host scroll positions into content space and presents windows into the pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollBridge {
    origin: NormalizedOrigin,
}

impl ScrollBridge {
    pub fn new(origin: NormalizedOrigin) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> NormalizedOrigin {
        self.origin
    }

    pub fn set_origin(&mut self, origin: NormalizedOrigin) {
        self.origin = origin;
    }

    /// Maps `offset` into `[0, total - viewport]`. Content that fits the viewport pins to 0.
    pub fn content_offset(&self, offset: HostOffset, total: u64, viewport_extent: u32) -> u64 {
        let max = total.saturating_sub(viewport_extent as u64);
        if max == 0 {
            return 0;
        }
        match offset {
            HostOffset::Pixels(px) => px.min(max),
            HostOffset::Normalized(t) => {
                let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
                let t = match self.origin {
                    NormalizedOrigin::Start => t,
                    NormalizedOrigin::End => 1.0 - t,
                };
                let px = (t as f64 * max as f64).round();
                (px as u64).min(max)
            }
        }
    }

    /// Inverse of [`Self::content_offset`] for normalized positions.
    pub fn normalized_offset(&self, content_offset: u64, total: u64, viewport_extent: u32) -> f32 {
        let max = total.saturating_sub(viewport_extent as u64);
        let t = if max == 0 {
            0.0
        } else {
            (content_offset.min(max) as f64 / max as f64) as f32
        };
        match self.origin {
            NormalizedOrigin::Start => t,
            NormalizedOrigin::End => 1.0 - t,
        }
    }

    pub fn placement_of(table: &LayoutTable, order: LayoutOrder, index: usize) -> u64 {
        table.placement(order, index)
    }

    pub fn is_outside_window(window: ViewportWindow, index: usize) -> bool {
        !window.contains(index)
    }

    /// Rebinds the active slots to `window`.
    ///
    /// All active slots are deactivated and deselected first. The first `active_len` indexes
    /// of the window in screen order are then bound, selection-synced and positioned, and the
    /// bound slots are reactivated together. Unused slots stay inactive. The bound indexes are
    /// written to `bound` in screen order.
    #[allow(clippy::too_many_arguments)]
    pub fn present<P: DataProvider>(
        &self,
        pool: &mut SlotPool<P::Slot>,
        provider: &mut P,
        table: &LayoutTable,
        window: ViewportWindow,
        order: LayoutOrder,
        axis: Axis,
        bound: &mut Vec<usize>,
    ) {
        bound.clear();
        let slots = pool.active_slots();
        for (_, slot) in &slots {
            let mut slot = slot.borrow_mut();
            slot.set_active(false);
            slot.bind_selection_visual(false);
        }
        pool.clear_bindings();

        let mut used = 0;
        for ((id, slot), index) in slots.iter().zip(window.iter_in(order)) {
            let mut slot = slot.borrow_mut();
            provider.bind_item(index, &mut slot);
            slot.bind_selection_visual(provider.is_selected(index));
            slot.set_position(axis, table.placement(order, index));
            pool.set_bound_index(*id, Some(index));
            bound.push(index);
            used += 1;
        }
        if used < window.len() {
            rtrace!(
                bound = used,
                window = window.len(),
                "ScrollBridge: window wider than pool"
            );
        }

        for (_, slot) in slots.iter().take(used) {
            slot.borrow_mut().set_active(true);
        }
    }
}
