//! Headless windowing math for recycling list views.
//!
//! For slot pooling, deferred per-item updates and a host-facing engine, see the
//! `recycler-adapter` crate.
//!
//! A recycling list binds a small, fixed set of visual slots to whichever data indexes are
//! currently visible, instead of creating one view per record. This crate provides the
//! pieces that decide *which* indexes those are:
//!
//! - [`LayoutTable`]: cumulative start offsets over items of uniform or variable extent,
//!   rebuilt in full or extended in place when items are appended.
//! - [`slots_needed`]: how many slots a viewport needs for a given minimum item extent.
//! - [`WindowResolver`]: maps a scroll offset to the inclusive [`ViewportWindow`] of
//!   indexes to bind, in either [`LayoutOrder`].
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - the viewport size along the scroll axis
//! - scroll offsets in content space
//! - item extents (measured or uniform)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod layout;
mod options;
mod resolver;
mod sizing;
mod types;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use layout::LayoutTable;
pub use options::LayoutOptions;
pub use resolver::{Resolution, WindowRequest, WindowResolver};
pub use sizing::{SLOT_BUFFER, effective_min_extent, slots_needed};
pub use types::{
    Axis, DimensionMode, LayoutOrder, ViewportSize, ViewportWindow, WindowIter,
};
