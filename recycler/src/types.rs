/// The scroll axis of a list. A list virtualizes along exactly one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Maps data indexes to screen positions.
///
/// `Reverse` mirrors the mapping so index `0` renders at the far end of the content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutOrder {
    #[default]
    Forward,
    Reverse,
}

impl LayoutOrder {
    /// Returns the data index shown at screen rank `rank` (rank 0 is the content start).
    ///
    /// The mapping is an involution, so this also converts an index back into its rank.
    pub fn index_of_rank(self, rank: usize, count: usize) -> usize {
        match self {
            Self::Forward => rank,
            Self::Reverse => count.saturating_sub(1).saturating_sub(rank),
        }
    }

    pub fn rank_of_index(self, index: usize, count: usize) -> usize {
        self.index_of_rank(index, count)
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// How item extents are obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionMode {
    /// Every item shares one extent, queried once per layout pass.
    Fixed,
    /// Each item reports its own extent, queried before each layout pass.
    #[default]
    Variable,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size along `axis`.
    pub fn extent(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

/// The inclusive range of data indexes resolved for display.
///
/// Bounds are always stored low-to-high regardless of [`LayoutOrder`]; use
/// [`ViewportWindow::iter_in`] to walk them in screen order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportWindow {
    bounds: Option<(usize, usize)>,
}

impl ViewportWindow {
    pub const EMPTY: Self = Self { bounds: None };

    pub fn new(first: usize, last: usize) -> Self {
        debug_assert!(
            first <= last,
            "ViewportWindow bounds out of order (first={first}, last={last})"
        );
        Self {
            bounds: Some((first.min(last), first.max(last))),
        }
    }

    pub fn first(&self) -> Option<usize> {
        self.bounds.map(|(first, _)| first)
    }

    pub fn last(&self) -> Option<usize> {
        self.bounds.map(|(_, last)| last)
    }

    pub fn bounds(&self) -> Option<(usize, usize)> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn len(&self) -> usize {
        self.bounds
            .map(|(first, last)| last - first + 1)
            .unwrap_or(0)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bounds
            .is_some_and(|(first, last)| first <= index && index <= last)
    }

    /// `(first, last)`, or `(-1, -1)` when empty.
    pub fn as_signed(&self) -> (isize, isize) {
        match self.bounds {
            Some((first, last)) => (first as isize, last as isize),
            None => (-1, -1),
        }
    }

    /// Maps every index `i` to `count - 1 - i`.
    pub fn complement(&self, count: usize) -> Self {
        match self.bounds {
            Some((first, last)) if last < count => Self::new(count - 1 - last, count - 1 - first),
            _ => Self::EMPTY,
        }
    }

    /// Iterates the window in screen order: ascending for `Forward`, descending for `Reverse`.
    pub fn iter_in(&self, order: LayoutOrder) -> WindowIter {
        match self.bounds {
            None => WindowIter {
                next: 0,
                remaining: 0,
                descending: false,
            },
            Some((first, last)) => match order {
                LayoutOrder::Forward => WindowIter {
                    next: first,
                    remaining: last - first + 1,
                    descending: false,
                },
                LayoutOrder::Reverse => WindowIter {
                    next: last,
                    remaining: last - first + 1,
                    descending: true,
                },
            },
        }
    }
}

/// Screen-order iterator over a [`ViewportWindow`].
#[derive(Clone, Debug)]
pub struct WindowIter {
    next: usize,
    remaining: usize,
    descending: bool,
}

impl Iterator for WindowIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next = if self.descending {
                index - 1
            } else {
                index + 1
            };
        }
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for WindowIter {}
