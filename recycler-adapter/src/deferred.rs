use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use tokio_util::sync::CancellationToken;

/// Where an index is in its deferred-update lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeferredState {
    /// No entry: never armed, or cancelled.
    Unarmed,
    /// Visible and waiting for the dwell time to pass.
    Pending { deadline_ms: u64 },
    /// The provider's update is in flight.
    Running,
    /// The update completed. Stays until the index leaves the window.
    Fired,
}

#[derive(Debug)]
enum Entry {
    Pending {
        deadline_ms: u64,
    },
    Running {
        token: CancellationToken,
        done: Rc<Cell<bool>>,
    },
}

/// Handle for a started update. The engine flips `done` once the provider's future returns.
#[derive(Clone, Debug)]
pub struct DeferredTicket {
    pub token: CancellationToken,
    pub done: Rc<Cell<bool>>,
}

/// Per-index dwell timers and cancellation handles.
///
/// Deadlines are checked against the adapter clock passed to [`Self::collect_due`]. There is
/// at most one entry per index.
#[derive(Debug)]
pub struct DeferredScheduler {
    dwell_ms: u64,
    entries: HashMap<usize, Entry>,
}

impl DeferredScheduler {
    pub fn new(dwell_ms: u64) -> Self {
        Self {
            dwell_ms,
            entries: HashMap::new(),
        }
    }

    pub fn dwell_ms(&self) -> u64 {
        self.dwell_ms
    }

    /// Applies to entries armed after the call.
    pub fn set_dwell_ms(&mut self, dwell_ms: u64) {
        self.dwell_ms = dwell_ms;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Starts the dwell timer for `index`. Returns `false` if it already has an entry.
    pub fn arm(&mut self, index: usize, now_ms: u64) -> bool {
        if self.entries.contains_key(&index) {
            return false;
        }
        let deadline_ms = now_ms.saturating_add(self.dwell_ms);
        rtrace!(index, deadline_ms, "DeferredScheduler: armed");
        self.entries.insert(index, Entry::Pending { deadline_ms });
        true
    }

    pub fn state(&self, index: usize) -> DeferredState {
        match self.entries.get(&index) {
            None => DeferredState::Unarmed,
            Some(Entry::Pending { deadline_ms }) => DeferredState::Pending {
                deadline_ms: *deadline_ms,
            },
            Some(Entry::Running { done, .. }) if done.get() => DeferredState::Fired,
            Some(Entry::Running { .. }) => DeferredState::Running,
        }
    }

    /// Collects pending indexes whose deadline has passed, in ascending order.
    ///
    /// Entries stay pending; the caller either [`Self::start`]s or [`Self::cancel`]s each.
    pub fn collect_due(&self, now_ms: u64, out: &mut Vec<usize>) {
        out.clear();
        out.extend(self.entries.iter().filter_map(|(&index, entry)| match entry {
            Entry::Pending { deadline_ms } if *deadline_ms <= now_ms => Some(index),
            _ => None,
        }));
        out.sort_unstable();
    }

    /// Marks `index` as running under a fresh cancellation token.
    ///
    /// A previous in-flight handle for the same index is cancelled and replaced.
    pub fn start(&mut self, index: usize) -> DeferredTicket {
        let ticket = DeferredTicket {
            token: CancellationToken::new(),
            done: Rc::new(Cell::new(false)),
        };
        let prev = self.entries.insert(
            index,
            Entry::Running {
                token: ticket.token.clone(),
                done: Rc::clone(&ticket.done),
            },
        );
        if let Some(Entry::Running { token, .. }) = prev {
            token.cancel();
        }
        rtrace!(index, "DeferredScheduler: started");
        ticket
    }

    /// Removes the entry for `index`, cancelling it if in flight.
    pub fn cancel(&mut self, index: usize) -> bool {
        match self.entries.remove(&index) {
            Some(entry) => {
                cancel_entry(index, entry);
                true
            }
            None => false,
        }
    }

    /// Cancels every entry whose index fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let dropped: Vec<usize> = self
            .entries
            .keys()
            .copied()
            .filter(|&index| !keep(index))
            .collect();
        for index in dropped {
            self.cancel(index);
        }
    }

    pub fn cancel_all(&mut self) {
        for (index, entry) in self.entries.drain() {
            cancel_entry(index, entry);
        }
    }
}

fn cancel_entry(_index: usize, entry: Entry) {
    match entry {
        Entry::Pending { .. } => {
            rtrace!(index = _index, "DeferredScheduler: disarmed before dwell");
        }
        Entry::Running { token, done } => {
            if !done.get() {
                rtrace!(index = _index, "DeferredScheduler: cancelling in-flight update");
                token.cancel();
            }
        }
    }
}
