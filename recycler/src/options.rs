use crate::{Axis, DimensionMode, LayoutOrder};

/// Layout configuration shared by the table, sizing policy and window resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Space between adjacent items. Never applied before the first or after the last item.
    pub spacing: u32,
    pub order: LayoutOrder,
    pub dimension_mode: DimensionMode,
    /// The scroll axis. `None` until the host has determined it; nothing is laid out while
    /// it is unset.
    pub axis: Option<Axis>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            spacing: 0,
            order: LayoutOrder::Forward,
            dimension_mode: DimensionMode::Variable,
            axis: Some(Axis::Vertical),
        }
    }
}

impl LayoutOptions {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis: Some(axis),
            ..Self::default()
        }
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_order(mut self, order: LayoutOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_dimension_mode(mut self, dimension_mode: DimensionMode) -> Self {
        self.dimension_mode = dimension_mode;
        self
    }

    /// Shorthand for `with_dimension_mode(DimensionMode::Fixed)`.
    pub fn with_fixed_dimension(self) -> Self {
        self.with_dimension_mode(DimensionMode::Fixed)
    }

    pub fn with_axis(mut self, axis: Option<Axis>) -> Self {
        self.axis = axis;
        self
    }
}
