//! Slot pooling and a host-facing engine for the `recycler` crate.
//!
//! The `recycler` crate is UI-agnostic and only decides which indexes are visible. This crate
//! owns what a list view needs on top of that:
//!
//! - [`SlotPool`]: a bounded set of reusable visual slots created through a host factory
//! - [`DeferredScheduler`]: per-index dwell timers gating slow updates, with cancellation
//! - [`ScrollBridge`]: host scroll positions in, rebound and positioned slots out
//! - [`Engine`]: ties them together behind a small event-driven API
//!
//! Hosts implement [`DataProvider`] for their records and [`Slot`] for their visual units.
//! This crate is framework-agnostic and single-threaded.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod bridge;
mod deferred;
mod engine;
mod options;
mod pool;
mod provider;
mod slot;


pub use bridge::{HostOffset, NormalizedOrigin, ScrollBridge};
pub use deferred::{DeferredScheduler, DeferredState, DeferredTicket};
pub use engine::Engine;
pub use options::{DeferredOptions, EngineOptions};
pub use pool::{SlotPool, SlotResolver};
pub use provider::DataProvider;
pub use slot::{Slot, SlotId, SlotRef};

pub use tokio_util::sync::CancellationToken;
