//! The live-element registry backing a context.
//!
//! Every element registers a weak slot at construction. Slots are append-only
//! until an explicit [`Registry::compact`] pass filters out entries whose
//! element has been dropped; nothing is removed implicitly, so raw counts may
//! include stale slots until then.
//!
//! The registry powers the three identity operations: collision scanning for
//! id claims, document-wide `url(#id)` rewriting on id changes, and lookup of
//! any live element by id.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::change::Dispatch;
use crate::element::{ElementBase, ElementInfo, InstanceId};

/// The registry's view of an element: access to its shared base plus the
/// rewrite hook visiting its referenceable string properties.
pub(crate) trait RegisteredElement {
    fn base(&self) -> &ElementBase;

    fn base_mut(&mut self) -> &mut ElementBase;

    /// Rewrite every `url(#old)` reference held by this element to
    /// `url(#new)`, queueing the change notifications onto `out`. Returns the
    /// number of rewritten values.
    fn rewrite_references(&mut self, old: &str, new: &str, out: &mut Vec<Dispatch>) -> usize {
        let _ = (old, new, out);
        0
    }
}

pub(crate) type ElementCell = Rc<RefCell<dyn RegisteredElement>>;

pub(crate) type WeakElementCell = Weak<RefCell<dyn RegisteredElement>>;

struct Slot {
    instance: InstanceId,
    element: WeakElementCell,
}

pub(crate) struct Registry {
    slots: Vec<Slot>,
    generation: u64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            generation: 0,
        }
    }

    /// Add a slot for a freshly constructed element.
    pub(crate) fn register(&mut self, cell: &ElementCell) {
        let instance = cell.borrow().base().instance;
        self.slots.push(Slot {
            instance,
            element: Rc::downgrade(cell),
        });
    }

    /// Raw slot count, stale entries included.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Count of slots whose element is still alive.
    pub(crate) fn live_len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.element.strong_count() > 0)
            .count()
    }

    /// Filtering pass: drop slots whose element has been dropped.
    ///
    /// Returns the number of slots removed and bumps the generation counter.
    pub(crate) fn compact(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.element.strong_count() > 0);
        self.generation += 1;
        before - self.slots.len()
    }

    /// How many compaction passes have run.
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Clone the slot list out for iteration without holding the registry
    /// borrow across element borrows.
    pub(crate) fn snapshot(&self) -> Vec<WeakElementCell> {
        self.slots.iter().map(|slot| slot.element.clone()).collect()
    }

    /// Scan every *other* live element for one already holding `candidate`.
    pub(crate) fn find_conflict(
        &self,
        candidate: &str,
        claimant: InstanceId,
    ) -> Option<ElementInfo> {
        for slot in &self.slots {
            if slot.instance == claimant {
                continue;
            }
            let Some(cell) = slot.element.upgrade() else {
                continue;
            };
            let element = cell.borrow();
            if element.base().id == candidate {
                return Some(element.base().info());
            }
        }
        None
    }

    /// First live element holding `id`, in registration order.
    pub(crate) fn find_by_id(&self, id: &str) -> Option<ElementInfo> {
        for slot in &self.slots {
            let Some(cell) = slot.element.upgrade() else {
                continue;
            };
            let element = cell.borrow();
            if element.base().id == id {
                return Some(element.base().info());
            }
        }
        None
    }

    /// Identity triples of every live element, in registration order.
    pub(crate) fn live_infos(&self) -> Vec<ElementInfo> {
        self.slots
            .iter()
            .filter_map(|slot| slot.element.upgrade())
            .map(|cell| cell.borrow().base().info())
            .collect()
    }
}
