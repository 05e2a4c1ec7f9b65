use recycler::{Axis, DimensionMode, LayoutOptions, LayoutOrder};

use crate::NormalizedOrigin;

/// Settings for dwell-gated per-item updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeferredOptions {
    pub enabled: bool,
    /// How long an index must stay visible before its update starts.
    pub dwell_ms: u64,
}

impl Default for DeferredOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            dwell_ms: 1_000,
        }
    }
}

impl DeferredOptions {
    pub fn enabled(dwell_ms: u64) -> Self {
        Self {
            enabled: true,
            dwell_ms,
        }
    }
}

/// Configuration for [`crate::Engine`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineOptions {
    pub layout: LayoutOptions,
    pub deferred: DeferredOptions,
    pub normalized_origin: NormalizedOrigin,
}

impl EngineOptions {
    pub fn new(axis: Axis) -> Self {
        Self {
            layout: LayoutOptions::new(axis),
            ..Self::default()
        }
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.layout.spacing = spacing;
        self
    }

    pub fn with_order(mut self, order: LayoutOrder) -> Self {
        self.layout.order = order;
        self
    }

    pub fn with_dimension_mode(mut self, dimension_mode: DimensionMode) -> Self {
        self.layout.dimension_mode = dimension_mode;
        self
    }

    pub fn with_axis(mut self, axis: Option<Axis>) -> Self {
        self.layout.axis = axis;
        self
    }

    pub fn with_deferred(mut self, deferred: DeferredOptions) -> Self {
        self.deferred = deferred;
        self
    }

    pub fn with_normalized_origin(mut self, origin: NormalizedOrigin) -> Self {
        self.normalized_origin = origin;
        self
    }
}
