//! Document context: the id-collision policy, the instance counter, and the
//! live-element registry.
//!
//! A [`SvgContext`] is a cheap-clone handle injected into every element
//! constructor; elements created in the same context share one id namespace.
//! There is no hidden global state: dropping the last handle (and the
//! elements built in it) drops the registry.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;

use crate::element::{synthesize_id, ElementInfo, ElementKind, InstanceId};
use crate::error::{SvgError, SvgResult};
use crate::registry::{ElementCell, Registry};

// =============================================================================
// IdPolicy
// =============================================================================

/// What happens when an explicit id claim collides with a live element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// Collisions fail the claim; the previous id is retained.
    #[default]
    Strict,
    /// Collisions are logged and the claim proceeds.
    Lenient,
}

// =============================================================================
// SvgContext
// =============================================================================

/// Shared handle to one document context.
#[derive(Clone)]
pub struct SvgContext {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    policy: IdPolicy,
    next_instance: Cell<u64>,
    registry: RefCell<Registry>,
}

impl SvgContext {
    /// Create a context with the given id-collision policy.
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                policy,
                next_instance: Cell::new(1),
                registry: RefCell::new(Registry::new()),
            }),
        }
    }

    /// The id-collision policy this context was created with.
    #[inline]
    pub fn policy(&self) -> IdPolicy {
        self.inner.policy
    }

    /// Allocate the next instance number. Starts at 1, never reused.
    pub(crate) fn next_instance(&self) -> InstanceId {
        let raw = self.inner.next_instance.get();
        self.inner.next_instance.set(raw + 1);
        InstanceId::from_raw(raw)
    }

    /// Add a freshly constructed element to the registry.
    pub(crate) fn register(&self, cell: ElementCell) {
        self.inner.registry.borrow_mut().register(&cell);
    }

    /// Resolve the id an element may hold.
    ///
    /// A blank candidate becomes the generated `<kind>[<instance>]` id with
    /// no collision scan (generated ids are unique by construction). A
    /// non-blank candidate is scanned against every other live element and
    /// accepted, rejected, or warned through per [`IdPolicy`].
    pub(crate) fn claim_id(
        &self,
        kind: ElementKind,
        instance: InstanceId,
        candidate: &str,
    ) -> SvgResult<CompactString> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Ok(synthesize_id(kind, instance));
        }
        let conflict = self
            .inner
            .registry
            .borrow()
            .find_conflict(candidate, instance);
        if let Some(holder) = conflict {
            match self.inner.policy {
                IdPolicy::Strict => {
                    return Err(SvgError::DuplicateId {
                        id: candidate.to_string(),
                        holder: holder.instance,
                        candidate: instance,
                    });
                }
                IdPolicy::Lenient => {
                    log::warn!("duplicate element id \"{candidate}\": already held by {holder}");
                }
            }
        }
        Ok(CompactString::from(candidate))
    }

    /// Rewrite every live `url(#old)` reference in this context to
    /// `url(#new)`. Returns the number of rewritten values.
    ///
    /// The pass is a flat scan over the registry, so cyclic reference graphs
    /// terminate trivially. Each rewritten value fires the owning element's
    /// own change notification after the scan completes.
    pub(crate) fn rewrite_references(&self, old: &str, new: &str) -> usize {
        if old.is_empty() || old == new {
            return 0;
        }
        let slots = self.inner.registry.borrow().snapshot();
        let mut dispatches = Vec::new();
        let mut rewritten = 0;
        for slot in slots {
            let Some(cell) = slot.upgrade() else { continue };
            rewritten += cell.borrow_mut().rewrite_references(old, new, &mut dispatches);
        }
        for dispatch in dispatches {
            dispatch.run();
        }
        rewritten
    }

    /// Filtering pass: drop registry slots for elements that have been
    /// dropped. Returns the number removed and bumps the generation counter.
    pub fn compact(&self) -> usize {
        self.inner.registry.borrow_mut().compact()
    }

    /// Raw registry slot count. Includes slots for dropped elements until
    /// [`compact`](Self::compact) runs.
    pub fn element_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Count of elements still alive, stale slots ignored.
    pub fn live_element_count(&self) -> usize {
        self.inner.registry.borrow().live_len()
    }

    /// How many compaction passes have run in this context.
    pub fn generation(&self) -> u64 {
        self.inner.registry.borrow().generation()
    }

    /// Identity of the first live element holding `id`, if any.
    pub fn find_by_id(&self, id: &str) -> Option<ElementInfo> {
        self.inner.registry.borrow().find_by_id(id)
    }

    /// True when some live element holds `id`.
    pub fn has_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Identity triples of every live element, in registration order.
    pub fn live_elements(&self) -> Vec<ElementInfo> {
        self.inner.registry.borrow().live_infos()
    }
}

impl Default for SvgContext {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}

impl fmt::Debug for SvgContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgContext")
            .field("policy", &self.inner.policy)
            .field("elements", &self.element_count())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
