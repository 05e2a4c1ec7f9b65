use std::cell::RefCell;
use std::rc::Rc;

use recycler::Axis;

/// Identity of a pooled slot, assigned in creation order.
///
/// Slot ids are independent of the data index a slot happens to be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotId(pub u64);

/// Shared handle to a pooled slot.
pub type SlotRef<S> = Rc<RefCell<S>>;

/// A reusable visual unit owned by the host.
///
/// Slots are created through the engine's factory, rebound in place as the window moves, and
/// only destroyed on teardown or when the pool shrinks.
pub trait Slot {
    /// Current size along `axis`, as last laid out for its bound content.
    fn extent(&self, axis: Axis) -> u32;

    /// Smallest size the slot can take along `axis`. Drives how many slots the pool needs.
    fn min_extent(&self, axis: Axis) -> u32;

    /// Whether the slot stretches to the viewport along `axis`.
    fn fills_viewport(&self, _axis: Axis) -> bool {
        false
    }

    fn set_active(&mut self, active: bool);

    /// Moves the slot to `position` (content space, from the content start) along `axis`.
    fn set_position(&mut self, axis: Axis, position: u64);

    fn bind_selection_visual(&mut self, selected: bool);

    fn dispose(&mut self) {}
}
