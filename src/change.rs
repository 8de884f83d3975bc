//! Change notification: typed event values, per-element listener lists, and
//! the dispatch snapshot that decouples callback invocation from element
//! borrows.
//!
//! The notification contract:
//! - every tracked-property mutation produces at most one [`ChangeEvent`],
//! - local listeners run first, then the owning document's listeners
//!   (bubbling), both receiving the same leaf [`ElementInfo`] source,
//! - listeners run with no element borrows held, so a callback may freely
//!   read or mutate the graph (including the element that fired).

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::attr::{fmt_number, MAX_DECIMALS};
use crate::element::ElementInfo;

// =============================================================================
// Value
// =============================================================================

/// A change-event payload: the old or new value of a tracked property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// String payload, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload, if this is a [`Value::Num`].
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// True when this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => f.write_str(&fmt_number(*n, MAX_DECIMALS)),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Num(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => Self::Str(s),
            None => Self::Null,
        }
    }
}

// =============================================================================
// ChangeEvent
// =============================================================================

/// A single property mutation, as seen by a listener.
///
/// `source` always identifies the element that changed, even when the event
/// is observed through a listener registered on the owning document.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Name of the tracked property that changed.
    pub property: &'static str,
    /// Value after the mutation.
    pub new_value: Value,
    /// Value before the mutation.
    pub old_value: Value,
    /// Identity of the element that changed.
    pub source: ElementInfo,
}

// =============================================================================
// Listeners
// =============================================================================

/// Handle for removing a registered change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Create from a raw value.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

pub(crate) type ListenerFn = Rc<dyn Fn(&ChangeEvent)>;

pub(crate) type ListenerList = SmallVec<[ListenerFn; 2]>;

/// Per-element ordered listener collection with monotonically assigned ids.
#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: SmallVec<[(ListenerId, ListenerFn); 2]>,
}

impl Listeners {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a callback, returning its removal handle.
    pub(crate) fn add(&mut self, f: impl Fn(&ChangeEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push((id, Rc::new(f)));
        id
    }

    /// Remove a callback by id. Returns whether it was present.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Drop all callbacks.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the callback list out, in registration order.
    ///
    /// Dispatch works on snapshots so no listener runs while a borrow of the
    /// owning element is live.
    pub(crate) fn snapshot(&self) -> ListenerList {
        self.entries.iter().map(|(_, f)| Rc::clone(f)).collect()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// A pending notification: the event plus snapshots of every callback that
/// must observe it.
///
/// Built while the mutating borrow is still held, run after it is released.
/// Local listeners run before bubbled ones; both see the same event.
#[must_use = "a dispatch does nothing until run"]
pub(crate) struct Dispatch {
    event: Option<ChangeEvent>,
    local: ListenerList,
    bubbled: ListenerList,
}

impl Dispatch {
    /// A dispatch that notifies nobody (muted element or suppressed event).
    pub(crate) fn none() -> Self {
        Self {
            event: None,
            local: ListenerList::new(),
            bubbled: ListenerList::new(),
        }
    }

    pub(crate) fn new(event: ChangeEvent, local: ListenerList, bubbled: ListenerList) -> Self {
        Self {
            event: Some(event),
            local,
            bubbled,
        }
    }

    /// True when running this dispatch would invoke no callback.
    pub(crate) fn is_empty(&self) -> bool {
        self.event.is_none() || (self.local.is_empty() && self.bubbled.is_empty())
    }

    /// Invoke every captured callback, local first, then bubbled.
    pub(crate) fn run(self) {
        let Some(event) = self.event else { return };
        for f in &self.local {
            f(&event);
        }
        for f in &self.bubbled {
            f(&event);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::element::{ElementKind, InstanceId};

    fn info() -> ElementInfo {
        ElementInfo {
            kind: ElementKind::Rect,
            instance: InstanceId::from_raw(1),
            id: "rect[1]".into(),
        }
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from("red"), Value::Str("red".to_string()));
        assert_eq!(Value::from(3.0), Value::Num(3.0));
        assert_eq!(Value::from(4usize), Value::Num(4.0));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(
            Value::from(Some("x".to_string())),
            Value::Str("x".to_string())
        );
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::from("red").as_str(), Some("red"));
        assert_eq!(Value::from(2.5).as_str(), None);
        assert_eq!(Value::from(2.5).as_num(), Some(2.5));
        assert!(Value::Null.is_null());
        assert!(!Value::from(false).is_null());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("url(#g1)").to_string(), "url(#g1)");
        assert_eq!(Value::from(33.333333).to_string(), "33.333");
        assert_eq!(Value::from(50.0).to_string(), "50");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_listener_ids_are_monotonic() {
        let mut listeners = Listeners::new();
        let a = listeners.add(|_| {});
        let b = listeners.add(|_| {});
        assert!(a < b);
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_listener_remove() {
        let mut listeners = Listeners::new();
        let a = listeners.add(|_| {});
        let b = listeners.add(|_| {});
        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        assert_eq!(listeners.len(), 1);
        assert!(listeners.remove(b));
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_listener_clear() {
        let mut listeners = Listeners::new();
        listeners.add(|_| {});
        listeners.add(|_| {});
        listeners.clear();
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_dispatch_runs_local_before_bubbled() {
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let mut local = Listeners::new();
        let seen = Rc::clone(&order);
        local.add(move |event| {
            assert_eq!(event.property, "fill");
            seen.borrow_mut().push("local");
        });

        let mut bubbled = Listeners::new();
        let seen = Rc::clone(&order);
        bubbled.add(move |event| {
            assert_eq!(event.source.id, "rect[1]");
            seen.borrow_mut().push("bubbled");
        });

        let event = ChangeEvent {
            property: "fill",
            new_value: Value::from("red"),
            old_value: Value::from("#beeeef"),
            source: info(),
        };
        Dispatch::new(event, local.snapshot(), bubbled.snapshot()).run();

        assert_eq!(*order.borrow(), vec!["local", "bubbled"]);
    }

    #[test]
    fn test_dispatch_none_is_empty() {
        let dispatch = Dispatch::none();
        assert!(dispatch.is_empty());
        dispatch.run();
    }
}
