use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::{Slot, SlotId, SlotRef};

struct ActiveSlot<S> {
    id: SlotId,
    slot: SlotRef<S>,
    index: Option<usize>,
}

type ActiveSet<S> = Rc<RefCell<Vec<ActiveSlot<S>>>>;

/// A bounded pool of reusable slots.
///
/// Slots are either *active* (part of the presented set, possibly bound to a data index) or
/// *free*. New slots are only constructed when the free set is empty, so the factory runs at
/// most once per slot of capacity.
pub struct SlotPool<S> {
    factory: Box<dyn FnMut() -> S>,
    active: ActiveSet<S>,
    free: Vec<(SlotId, SlotRef<S>)>,
    capacity: usize,
    next_id: u64,
}

impl<S> core::fmt::Debug for SlotPool<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotPool")
            .field("capacity", &self.capacity)
            .field("active", &self.active.borrow().len())
            .field("free", &self.free.len())
            .finish_non_exhaustive()
    }
}

impl<S: Slot> SlotPool<S> {
    pub fn new(factory: impl FnMut() -> S + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            active: Rc::new(RefCell::new(Vec::new())),
            free: Vec::new(),
            capacity: 0,
            next_id: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active_len(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Slots currently alive, active or free.
    pub fn live_count(&self) -> usize {
        self.active_len() + self.free.len()
    }

    /// Runs the factory for a slot that the pool does not track.
    pub fn construct_detached(&mut self) -> S {
        (self.factory)()
    }

    /// Moves a slot into the active set, reusing the most recently freed one if possible.
    pub fn acquire(&mut self) -> (SlotId, SlotRef<S>) {
        let (id, slot) = match self.free.pop() {
            Some(entry) => entry,
            None => {
                let id = SlotId(self.next_id);
                self.next_id += 1;
                rtrace!(id = id.0, "SlotPool: constructing slot");
                (id, Rc::new(RefCell::new((self.factory)())))
            }
        };
        self.active.borrow_mut().push(ActiveSlot {
            id,
            slot: Rc::clone(&slot),
            index: None,
        });
        (id, slot)
    }

    /// Deactivates the slot and returns it to the free set.
    pub fn release(&mut self, id: SlotId) -> bool {
        let entry = {
            let mut active = self.active.borrow_mut();
            let Some(pos) = active.iter().position(|a| a.id == id) else {
                return false;
            };
            active.remove(pos)
        };
        entry.slot.borrow_mut().set_active(false);
        self.free.push((entry.id, entry.slot));
        true
    }

    pub fn release_all(&mut self) {
        let drained: Vec<_> = self.active.borrow_mut().drain(..).collect();
        for entry in drained {
            entry.slot.borrow_mut().set_active(false);
            self.free.push((entry.id, entry.slot));
        }
    }

    /// Grows or shrinks the active set to `capacity`.
    ///
    /// Excess active slots are released, not destroyed; [`Self::trim`] disposes surplus free
    /// slots later.
    pub fn set_capacity(&mut self, capacity: usize) {
        if capacity != self.capacity {
            rdebug!(from = self.capacity, to = capacity, "SlotPool: capacity changed");
        }
        self.capacity = capacity;
        while self.active_len() < capacity {
            self.acquire();
        }
        while self.active_len() > capacity {
            let last = self.active.borrow().last().map(|a| a.id);
            match last {
                Some(id) => {
                    self.release(id);
                }
                None => break,
            }
        }
    }

    /// Disposes free slots until the live count fits the capacity. Returns how many were
    /// disposed.
    pub fn trim(&mut self) -> usize {
        let mut disposed = 0;
        while self.live_count() > self.capacity {
            let Some((_, slot)) = self.free.pop() else {
                break;
            };
            rtrace!(capacity = self.capacity, "SlotPool: disposing surplus slot");
            slot.borrow_mut().dispose();
            disposed += 1;
        }
        disposed
    }

    /// Disposes every slot. Calling it again is a no-op.
    ///
    /// Resolvers handed out before teardown stop resolving.
    pub fn teardown(&mut self) {
        let active = std::mem::replace(&mut self.active, Rc::new(RefCell::new(Vec::new())));
        let drained: Vec<_> = active.borrow_mut().drain(..).collect();
        for entry in drained {
            entry.slot.borrow_mut().dispose();
        }
        for (_, slot) in self.free.drain(..) {
            slot.borrow_mut().dispose();
        }
        self.capacity = 0;
    }

    /// Snapshot of the active set in presentation order.
    pub fn active_slots(&self) -> Vec<(SlotId, SlotRef<S>)> {
        self.active
            .borrow()
            .iter()
            .map(|a| (a.id, Rc::clone(&a.slot)))
            .collect()
    }

    /// Records which data index the active slot `id` displays.
    pub fn set_bound_index(&mut self, id: SlotId, index: Option<usize>) {
        if let Some(entry) = self.active.borrow_mut().iter_mut().find(|a| a.id == id) {
            entry.index = index;
        }
    }

    pub fn clear_bindings(&mut self) {
        for entry in self.active.borrow_mut().iter_mut() {
            entry.index = None;
        }
    }

    pub fn bound_index(&self, id: SlotId) -> Option<usize> {
        self.active
            .borrow()
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| a.index)
    }

    pub fn bound_id(&self, index: usize) -> Option<SlotId> {
        self.active
            .borrow()
            .iter()
            .find(|a| a.index == Some(index))
            .map(|a| a.id)
    }

    /// The active slot currently bound to `index`.
    pub fn bound_slot(&self, index: usize) -> Option<SlotRef<S>> {
        find_bound(&self.active.borrow(), index)
    }

    pub fn slot(&self, id: SlotId) -> Option<SlotRef<S>> {
        self.active
            .borrow()
            .iter()
            .find(|a| a.id == id)
            .map(|a| Rc::clone(&a.slot))
    }

    pub fn resolver(&self) -> SlotResolver<S> {
        SlotResolver {
            active: Rc::downgrade(&self.active),
        }
    }
}

fn find_bound<S>(active: &[ActiveSlot<S>], index: usize) -> Option<SlotRef<S>> {
    active
        .iter()
        .find(|a| a.index == Some(index))
        .map(|a| Rc::clone(&a.slot))
}

/// Looks up the slot bound to a data index at the time of the call.
///
/// Handed to deferred updates so they never keep a slot reference that may since have been
/// rebound to another index.
pub struct SlotResolver<S> {
    active: Weak<RefCell<Vec<ActiveSlot<S>>>>,
}

impl<S> Clone for SlotResolver<S> {
    fn clone(&self) -> Self {
        Self {
            active: Weak::clone(&self.active),
        }
    }
}

impl<S> core::fmt::Debug for SlotResolver<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotResolver")
            .field("alive", &(self.active.strong_count() > 0))
            .finish()
    }
}

impl<S> SlotResolver<S> {
    /// Returns `None` when nothing is bound to `index` or the pool was torn down.
    pub fn resolve(&self, index: usize) -> Option<SlotRef<S>> {
        let active = self.active.upgrade()?;
        let active = active.try_borrow().ok()?;
        find_bound(&active, index)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use recycler::Axis;

    use super::*;

    struct Counted {
        active: bool,
        disposed: Rc<Cell<usize>>,
    }

    impl Slot for Counted {
        fn extent(&self, _axis: Axis) -> u32 {
            10
        }

        fn min_extent(&self, _axis: Axis) -> u32 {
            10
        }

        fn set_active(&mut self, active: bool) {
            self.active = active;
        }

        fn set_position(&mut self, _axis: Axis, _position: u64) {}

        fn bind_selection_visual(&mut self, _selected: bool) {}

        fn dispose(&mut self) {
            self.disposed.set(self.disposed.get() + 1);
        }
    }

    fn pool() -> (SlotPool<Counted>, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let created = Rc::new(Cell::new(0));
        let disposed = Rc::new(Cell::new(0));
        let (c, d) = (Rc::clone(&created), Rc::clone(&disposed));
        let pool = SlotPool::new(move || {
            c.set(c.get() + 1);
            Counted {
                active: true,
                disposed: Rc::clone(&d),
            }
        });
        (pool, created, disposed)
    }

    #[test]
    fn acquire_reuses_released_slots() {
        let (mut p, created, _) = pool();
        let (a, _) = p.acquire();
        let (b, _) = p.acquire();
        assert_ne!(a, b);
        assert!(p.release(a));
        assert!(!p.release(a));
        let (c, slot) = p.acquire();
        assert_eq!(c, a);
        assert!(!slot.borrow().active);
        assert_eq!(created.get(), 2);
    }

    #[test]
    fn shrinking_releases_then_trims_lazily() {
        let (mut p, created, disposed) = pool();
        p.set_capacity(4);
        assert_eq!((p.active_len(), p.free_len()), (4, 0));

        p.set_capacity(2);
        assert_eq!((p.active_len(), p.free_len()), (2, 2));
        assert_eq!(disposed.get(), 0);

        assert_eq!(p.trim(), 2);
        assert_eq!(p.live_count(), 2);
        assert_eq!(disposed.get(), 2);

        p.set_capacity(3);
        assert_eq!(created.get(), 5);
    }

    #[test]
    fn bound_slots_resolve_by_index() {
        let (mut p, _, _) = pool();
        p.set_capacity(2);
        let ids: Vec<SlotId> = p.active_slots().iter().map(|(id, _)| *id).collect();
        p.set_bound_index(ids[0], Some(7));
        p.set_bound_index(ids[1], Some(3));

        let resolver = p.resolver();
        assert!(Rc::ptr_eq(
            &resolver.resolve(7).unwrap(),
            &p.slot(ids[0]).unwrap()
        ));
        assert_eq!(p.bound_id(3), Some(ids[1]));
        assert_eq!(p.bound_index(ids[1]), Some(3));
        assert!(resolver.resolve(4).is_none());

        p.clear_bindings();
        assert!(resolver.resolve(7).is_none());
    }

    #[test]
    fn teardown_disposes_everything_once() {
        let (mut p, _, disposed) = pool();
        p.set_capacity(3);
        p.set_capacity(1);
        let resolver = p.resolver();
        let id = p.active_slots()[0].0;
        p.set_bound_index(id, Some(0));
        assert!(resolver.resolve(0).is_some());

        p.teardown();
        assert_eq!(disposed.get(), 3);
        assert_eq!(p.live_count(), 0);
        assert!(resolver.resolve(0).is_none());

        p.teardown();
        assert_eq!(disposed.get(), 3);
    }
}
