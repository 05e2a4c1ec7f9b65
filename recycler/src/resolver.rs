use crate::{LayoutOrder, LayoutTable, ViewportWindow};

/// Extra ranks kept before the first visible rank.
const LEADING_PAD: usize = 1;
/// Extra ranks kept after the rank that crosses the viewport end.
const TRAILING_PAD: usize = 2;

/// Input for [`WindowResolver::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowRequest {
    /// Scroll offset in content space (0 = content start).
    pub offset: u64,
    pub viewport_extent: u32,
    pub order: LayoutOrder,
    /// Pool capacity from [`crate::slots_needed`]. When it covers every item the whole
    /// list is one static window.
    pub slots_needed: usize,
    /// Reports a change even when the bounds are identical (resize, data reset).
    pub force: bool,
}

impl WindowRequest {
    pub fn new(offset: u64, viewport_extent: u32, order: LayoutOrder, slots_needed: usize) -> Self {
        Self {
            offset,
            viewport_extent,
            order,
            slots_needed,
            force: false,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub window: ViewportWindow,
    /// `false` means the caller can skip rebinding entirely.
    pub changed: bool,
}

/// Maps scroll offsets to the contiguous index window that must be bound.
///
/// The resolver remembers the previous window and starts each search from it, walking
/// backward and then forward. Scroll deltas are usually small, so a resolve is O(1)
/// amortized and O(drift) in the worst case. There is no binary search.
///
/// The walk happens over *screen ranks*: rank 0 is the item at the content start. In
/// `Forward` order rank `k` is index `k`; in `Reverse` order it is index `n - 1 - k` and its
/// start is [`LayoutTable::mirrored_position`].
#[derive(Clone, Debug, Default)]
pub struct WindowResolver {
    window: ViewportWindow,
    anchor: Option<(LayoutOrder, usize)>,
}

impl WindowResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last committed window.
    pub fn window(&self) -> ViewportWindow {
        self.window
    }

    /// Forgets the previous window; the next resolve scans from the content start.
    pub fn reset(&mut self) {
        self.window = ViewportWindow::EMPTY;
        self.anchor = None;
    }

    /// Recomputes the window for `request` and commits it.
    ///
    /// `lazy_extent` is consulted for the final rank's extent when the scan reaches it
    /// (variable-dimension lists measure it on demand). Without it the table's extent is used.
    pub fn resolve(
        &mut self,
        table: &LayoutTable,
        request: WindowRequest,
        lazy_extent: Option<&mut dyn FnMut(usize) -> u32>,
    ) -> Resolution {
        let (window, anchor_rank) = self.compute(table, request, lazy_extent);
        let changed = request.force || window != self.window;
        if changed {
            rtrace!(
                first = window.first(),
                last = window.last(),
                offset = request.offset,
                force = request.force,
                "WindowResolver: window changed"
            );
        }
        self.window = window;
        self.anchor = anchor_rank.map(|rank| (request.order, rank));
        Resolution { window, changed }
    }

    fn compute(
        &self,
        table: &LayoutTable,
        request: WindowRequest,
        mut lazy_extent: Option<&mut dyn FnMut(usize) -> u32>,
    ) -> (ViewportWindow, Option<usize>) {
        let count = table.len();
        if count == 0
            || request.slots_needed == 0
            || request.viewport_extent == 0
            || table.total() == 0
        {
            return (ViewportWindow::EMPTY, None);
        }
        if request.slots_needed >= count {
            return (ViewportWindow::new(0, count - 1), Some(0));
        }

        let order = request.order;
        let ranks = Ranks {
            table,
            order,
            count,
        };
        let view = request.viewport_extent as u64;
        let offset = request.offset.min(table.total().saturating_sub(view));
        let view_end = offset.saturating_add(view);
        let last_rank = count - 1;

        let mut anchor = match self.anchor {
            Some((prev_order, rank)) if prev_order == order => rank.min(last_rank),
            _ => 0,
        };
        while anchor > 0 && ranks.start(anchor) > offset {
            anchor -= 1;
        }

        let mut start_rank = None;
        let mut end_rank = None;
        for rank in anchor..count {
            let end = if rank < last_rank {
                ranks.start(rank + 1)
            } else {
                let index = order.index_of_rank(rank, count);
                let extent = match lazy_extent.as_deref_mut() {
                    Some(measure) => measure(index),
                    None => table.extent_of(index),
                };
                ranks.start(rank).saturating_add(extent as u64)
            };

            if start_rank.is_none() {
                if end <= offset {
                    continue;
                }
                start_rank = Some(rank.saturating_sub(LEADING_PAD));
            }
            if end > view_end {
                end_rank = Some(rank.saturating_add(TRAILING_PAD));
                break;
            }
        }

        let start_rank = start_rank.unwrap_or(last_rank).min(last_rank);
        let end_rank = end_rank.unwrap_or(last_rank).clamp(start_rank, last_rank);

        let window = match order {
            LayoutOrder::Forward => ViewportWindow::new(start_rank, end_rank),
            LayoutOrder::Reverse => {
                ViewportWindow::new(last_rank - end_rank, last_rank - start_rank)
            }
        };
        (window, Some(start_rank))
    }
}

struct Ranks<'a> {
    table: &'a LayoutTable,
    order: LayoutOrder,
    count: usize,
}

impl Ranks<'_> {
    fn start(&self, rank: usize) -> u64 {
        let index = self.order.index_of_rank(rank, self.count);
        self.table.placement(self.order, index)
    }
}
