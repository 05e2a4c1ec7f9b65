use futures::FutureExt;
use futures::future::LocalBoxFuture;
use recycler::Axis;
use tokio_util::sync::CancellationToken;

use crate::{Slot, SlotResolver};

/// The data side of a recycling list.
///
/// The engine never stores records. It asks the provider to bind an index into a slot
/// whenever that index becomes visible, and to measure items when laying out.
pub trait DataProvider {
    type Slot: Slot;

    fn item_count(&self) -> usize;

    /// Fully populates `slot` with the record at `index`.
    ///
    /// In variable-dimension mode this may change the slot's reported extent.
    fn bind_item(&mut self, index: usize, slot: &mut Self::Slot);

    /// Measures an item without binding it.
    ///
    /// Returning `None` makes the engine bind the item into its measurement slot and read the
    /// slot's extent instead.
    fn measure_item(&mut self, _index: usize, _axis: Axis) -> Option<u32> {
        None
    }

    fn is_selected(&self, index: usize) -> bool;

    fn set_selected(&mut self, index: usize, selected: bool);

    /// Called when the host reports a click on the slot bound to `index`.
    fn on_item_activated(&mut self, _index: usize, _slot: &mut Self::Slot) {}

    /// Slow per-item work that only runs once `index` has stayed visible for the dwell time.
    ///
    /// The future runs on the engine's single-threaded executor and is only polled from
    /// [`crate::Engine::tick`] and [`crate::Engine::run_until_stalled`]. `cancel` fires when the
    /// index leaves the window. Resolve the slot through `slots` after every await point: the
    /// slot bound to `index` may have changed or gone. Do not hold a slot borrow across an
    /// await.
    fn run_deferred_update(
        &mut self,
        _index: usize,
        _slots: SlotResolver<Self::Slot>,
        _cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, ()> {
        async {}.boxed_local()
    }

    fn dispose(&mut self) {}
}
