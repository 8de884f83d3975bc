//! Shared element identity and behavior.
//!
//! Every node in the document graph (shapes, definitions, the viewbox, the
//! document itself) is a cheap-clone handle around `Rc<RefCell<Inner>>`,
//! and every `Inner` composes an [`ElementBase`]: context handle, kind,
//! monotonic instance number, unique id, listener list, bubbling and muting
//! flags, and a weak back-reference to the owning document.
//!
//! The macros at the bottom stamp the identical public surface (id, listener
//! registration, muting) onto each handle type.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use compact_str::{format_compact, CompactString};

use crate::asset::AssetInner;
use crate::attr::{matches_url_ref, url_ref, ExtraAttrs};
use crate::change::{ChangeEvent, Dispatch, ListenerList, Listeners, Value};
use crate::context::SvgContext;

// =============================================================================
// InstanceId
// =============================================================================

/// Monotonic per-context element number, assigned at creation, never reused.
///
/// Instance equality is the identity witness used by change events: two
/// [`ElementInfo`]s with equal instances describe the same live element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
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

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ElementKind
// =============================================================================

/// The closed set of element types the document model knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Path,
    ViewBox,
    Gradient,
    Image,
    Mask,
    Generic,
    Asset,
}

impl ElementKind {
    /// Lowercase kind name, used for generated ids and diagnostics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Path => "path",
            Self::ViewBox => "viewbox",
            Self::Gradient => "gradient",
            Self::Image => "image",
            Self::Mask => "mask",
            Self::Generic => "definition",
            Self::Asset => "asset",
        }
    }

    /// True for the shape kinds (the variants of a geometry).
    pub const fn is_shape(&self) -> bool {
        matches!(
            self,
            Self::Rect
                | Self::Circle
                | Self::Ellipse
                | Self::Line
                | Self::Polyline
                | Self::Polygon
                | Self::Path
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generated id for an element created without an explicit one:
/// `<kind>[<instance>]`, e.g. `rect[7]`.
pub(crate) fn synthesize_id(kind: ElementKind, instance: InstanceId) -> CompactString {
    format_compact!("{}[{}]", kind.as_str(), instance.as_raw())
}

// =============================================================================
// ElementInfo
// =============================================================================

/// Identity triple of a live element: kind, instance number, current id.
///
/// Carried by change events as the leaf source, and returned by id lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub kind: ElementKind,
    pub instance: InstanceId,
    pub id: CompactString,
}

impl fmt::Display for ElementInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\" (#{})", self.kind, self.id, self.instance)
    }
}

// =============================================================================
// ElementBase
// =============================================================================

/// The state every element inner composes.
pub(crate) struct ElementBase {
    pub(crate) ctx: SvgContext,
    pub(crate) kind: ElementKind,
    pub(crate) instance: InstanceId,
    pub(crate) id: CompactString,
    pub(crate) listeners: Listeners,
    pub(crate) bubble_on_change: bool,
    pub(crate) muted: bool,
    pub(crate) parent: Option<Weak<RefCell<AssetInner>>>,
}

impl ElementBase {
    /// Allocate an instance number and claim an id.
    ///
    /// Construction never fails: a rejected explicit id is logged and the
    /// generated id is kept instead.
    pub(crate) fn new(ctx: &SvgContext, kind: ElementKind, id: Option<&str>) -> Self {
        let instance = ctx.next_instance();
        let id = match ctx.claim_id(kind, instance, id.unwrap_or_default()) {
            Ok(id) => id,
            Err(err) => {
                log::error!("{err}; keeping the generated id");
                synthesize_id(kind, instance)
            }
        };
        Self {
            ctx: ctx.clone(),
            kind,
            instance,
            id,
            listeners: Listeners::new(),
            bubble_on_change: true,
            muted: false,
            parent: None,
        }
    }

    pub(crate) fn info(&self) -> ElementInfo {
        ElementInfo {
            kind: self.kind,
            instance: self.instance,
            id: self.id.clone(),
        }
    }

    /// Upgrade the parent back-reference, if any.
    pub(crate) fn parent_upgrade(&self) -> Option<Rc<RefCell<AssetInner>>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Build the notification for a completed mutation of `property`.
    ///
    /// Returns an empty dispatch when the element is muted. Bubbled listeners
    /// are snapshotted from the parent document unless bubbling is off or the
    /// parent is itself muted. The caller runs the dispatch after releasing
    /// every borrow taken for the mutation.
    pub(crate) fn change(&self, property: &'static str, old_value: Value, new_value: Value) -> Dispatch {
        if self.muted {
            return Dispatch::none();
        }
        let local = self.listeners.snapshot();
        let bubbled = match (self.bubble_on_change, self.parent_upgrade()) {
            (true, Some(parent)) => {
                let parent = parent.borrow();
                if parent.base.muted {
                    ListenerList::new()
                } else {
                    parent.base.listeners.snapshot()
                }
            }
            _ => ListenerList::new(),
        };
        let event = ChangeEvent {
            property,
            new_value,
            old_value,
            source: self.info(),
        };
        Dispatch::new(event, local, bubbled)
    }
}

/// Rewrite `url(#old)` values among caller-supplied extra attributes,
/// queueing one `"attributes"` change per rewritten value.
pub(crate) fn rewrite_extra_refs(
    base: &ElementBase,
    extra: &mut ExtraAttrs,
    old: &str,
    new: &str,
    out: &mut Vec<Dispatch>,
) -> usize {
    let mut rewritten = 0;
    for (_, value) in extra.iter_mut() {
        if matches_url_ref(value, old) {
            let old_value = std::mem::replace(value, url_ref(new));
            out.push(base.change("attributes", old_value.into(), value.clone().into()));
            rewritten += 1;
        }
    }
    rewritten
}

// =============================================================================
// SvgNode
// =============================================================================

/// The serialization surface shared by every renderable element.
///
/// `html` returns `None` for an element that cannot render (a generic
/// definition with no tag); the failure is logged at the element and the
/// document skips the entry instead of aborting.
pub trait SvgNode {
    /// Identity triple of this element.
    fn info(&self) -> ElementInfo;

    /// This element's attributes, serialized.
    fn data(&self) -> String;

    /// Full markup for this element, or `None` when it cannot render.
    fn html(&self) -> Option<String>;

    /// Element kind.
    fn kind(&self) -> ElementKind {
        self.info().kind
    }

    /// Instance number.
    fn instance(&self) -> InstanceId {
        self.info().instance
    }

    /// Current id.
    fn id(&self) -> CompactString {
        self.info().id
    }

    /// `url(#id)` reference to this element.
    fn id_url(&self) -> String {
        url_ref(&self.info().id)
    }
}

// =============================================================================
// Element API macros
// =============================================================================

/// Stamp the common handle surface onto an element type whose inner exposes a
/// `base: ElementBase` field.
macro_rules! impl_element_api {
    ($ty:ident) => {
        impl $ty {
            /// Current element id.
            pub fn id(&self) -> compact_str::CompactString {
                self.inner.borrow().base.id.clone()
            }

            /// `url(#id)` reference to this element.
            pub fn id_url(&self) -> String {
                $crate::attr::url_ref(&self.inner.borrow().base.id)
            }

            /// Instance number, assigned at creation, never reused.
            pub fn instance(&self) -> $crate::element::InstanceId {
                self.inner.borrow().base.instance
            }

            /// Element kind.
            pub fn kind(&self) -> $crate::element::ElementKind {
                self.inner.borrow().base.kind
            }

            /// Identity triple of this element.
            pub fn info(&self) -> $crate::element::ElementInfo {
                self.inner.borrow().base.info()
            }

            /// Handle to the context this element is registered in.
            pub fn context(&self) -> $crate::context::SvgContext {
                self.inner.borrow().base.ctx.clone()
            }

            /// Change this element's id.
            ///
            /// A blank candidate generates a fresh `<kind>[<instance>]` id.
            /// Under [`IdPolicy::Strict`](crate::context::IdPolicy) a
            /// collision with another live element fails and leaves both ids
            /// unchanged; under `Lenient` it is logged and allowed. On
            /// success every live `url(#old)` reference in the context is
            /// rewritten to the new id (each rewrite firing that element's
            /// own change event), then this element fires an `"id"` change.
            pub fn set_id(&self, id: impl AsRef<str>) -> $crate::error::SvgResult<()> {
                let candidate = id.as_ref();
                let (ctx, kind, instance, old) = {
                    let inner = self.inner.borrow();
                    (
                        inner.base.ctx.clone(),
                        inner.base.kind,
                        inner.base.instance,
                        inner.base.id.clone(),
                    )
                };
                if candidate == old {
                    return Ok(());
                }
                let new_id = ctx.claim_id(kind, instance, candidate)?;
                if new_id == old {
                    return Ok(());
                }
                {
                    self.inner.borrow_mut().base.id = new_id.clone();
                }
                ctx.rewrite_references(&old, &new_id);
                let dispatch = {
                    let inner = self.inner.borrow();
                    inner.base.change(
                        "id",
                        $crate::change::Value::Str(old.into()),
                        $crate::change::Value::Str(new_id.into()),
                    )
                };
                dispatch.run();
                Ok(())
            }

            /// Register a change listener, returning its removal handle.
            pub fn on_change(
                &self,
                f: impl Fn(&$crate::change::ChangeEvent) + 'static,
            ) -> $crate::change::ListenerId {
                self.inner.borrow_mut().base.listeners.add(f)
            }

            /// Remove a listener. Returns whether it was registered.
            pub fn remove_listener(&self, id: $crate::change::ListenerId) -> bool {
                self.inner.borrow_mut().base.listeners.remove(id)
            }

            /// Drop all listeners registered on this element.
            pub fn clear_listeners(&self) {
                self.inner.borrow_mut().base.listeners.clear()
            }

            /// Whether changes bubble to the owning document's listeners.
            pub fn bubble_on_change(&self) -> bool {
                self.inner.borrow().base.bubble_on_change
            }

            /// Enable or disable bubbling. Not a tracked property.
            pub fn set_bubble_on_change(&self, bubble: bool) {
                self.inner.borrow_mut().base.bubble_on_change = bubble;
            }

            /// Whether notifications are currently suppressed.
            pub fn muted(&self) -> bool {
                self.inner.borrow().base.muted
            }

            /// Suppress or restore notifications.
            ///
            /// While muted, mutations still apply but fire no events; compound
            /// setters use this to batch writes behind a single notification.
            pub fn set_muted(&self, muted: bool) {
                self.inner.borrow_mut().base.muted = muted;
            }

        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.inner.try_borrow() {
                    Ok(inner) => write!(
                        f,
                        concat!(stringify!($ty), "({})"),
                        inner.base.info()
                    ),
                    Err(_) => f.write_str(concat!(stringify!($ty), "(<borrowed>)")),
                }
            }
        }

        /// Handle equality: two handles are equal when they refer to the same
        /// live element.
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                std::rc::Rc::ptr_eq(&self.inner, &other.inner)
            }
        }

        impl Eq for $ty {}
    };
}

/// Route the [`SvgNode`] trait through a type's inherent
/// `info`/`data`/`html` methods.
macro_rules! impl_svg_node {
    ($ty:ident) => {
        impl $crate::element::SvgNode for $ty {
            fn info(&self) -> $crate::element::ElementInfo {
                $ty::info(self)
            }

            fn data(&self) -> String {
                $ty::data(self)
            }

            fn html(&self) -> Option<String> {
                $ty::html(self)
            }
        }
    };
}

/// Stamp caller-supplied extra-attribute accessors onto an element type whose
/// inner exposes `base` and `extra` fields. Mutations fire an `"attributes"`
/// change carrying the affected value.
macro_rules! impl_extra_attr_api {
    ($ty:ident) => {
        impl $ty {
            /// Value of a caller-supplied extra attribute.
            pub fn attr(&self, name: &str) -> Option<String> {
                use $crate::attr::AttrsExt;
                self.inner.borrow().extra.get_attr(name).map(String::from)
            }

            /// All caller-supplied extra attributes, in order.
            pub fn attrs(&self) -> $crate::attr::ExtraAttrs {
                self.inner.borrow().extra.clone()
            }

            /// Set a caller-supplied extra attribute (insert or update).
            pub fn set_attr(&self, name: impl Into<String>, value: impl Into<String>) {
                use $crate::attr::AttrsExt;
                let name = name.into();
                let value = value.into();
                let dispatch = {
                    let mut inner = self.inner.borrow_mut();
                    if inner.extra.get_attr(&name) == Some(value.as_str()) {
                        return;
                    }
                    let old = inner.extra.set_attr(name, value.clone());
                    inner.base.change(
                        "attributes",
                        $crate::change::Value::from(old),
                        $crate::change::Value::Str(value),
                    )
                };
                dispatch.run();
            }

            /// Remove a caller-supplied extra attribute.
            pub fn remove_attr(&self, name: &str) -> Option<String> {
                use $crate::attr::AttrsExt;
                let (removed, dispatch) = {
                    let mut inner = self.inner.borrow_mut();
                    let Some(old) = inner.extra.remove_attr(name) else {
                        return None;
                    };
                    let dispatch = inner.base.change(
                        "attributes",
                        $crate::change::Value::Str(old.clone()),
                        $crate::change::Value::Null,
                    );
                    (old, dispatch)
                };
                dispatch.run();
                Some(removed)
            }
        }
    };
}

/// Stamp the owner back-reference setter onto a child element type. The
/// document root has no parent and does not get one.
macro_rules! impl_parent_slot {
    ($ty:ident) => {
        impl $ty {
            pub(crate) fn set_parent(
                &self,
                parent: Option<
                    std::rc::Weak<std::cell::RefCell<$crate::asset::AssetInner>>,
                >,
            ) {
                self.inner.borrow_mut().base.parent = parent;
            }
        }
    };
}

/// Stamp `<defs>` routing accessors onto an element type whose inner exposes
/// `base` and `store_in_defs` fields.
macro_rules! impl_defs_routing_api {
    ($ty:ident) => {
        impl $ty {
            /// Whether this element serializes inside the document's `<defs>`
            /// block.
            pub fn store_in_defs(&self) -> bool {
                self.inner.borrow().store_in_defs
            }

            /// Route this element into or out of the `<defs>` block.
            pub fn set_store_in_defs(&self, store: bool) {
                let dispatch = {
                    let mut inner = self.inner.borrow_mut();
                    if inner.store_in_defs == store {
                        return;
                    }
                    inner.store_in_defs = store;
                    inner
                        .base
                        .change("store_in_defs", (!store).into(), store.into())
                };
                dispatch.run();
            }

            /// Set the `<defs>` routing during construction.
            pub fn with_store_in_defs(self, store: bool) -> Self {
                self.inner.borrow_mut().store_in_defs = store;
                self
            }

            pub(crate) fn write_store_in_defs(&self, store: bool) {
                self.inner.borrow_mut().store_in_defs = store;
            }
        }
    };
}

pub(crate) use {
    impl_defs_routing_api, impl_element_api, impl_extra_attr_api, impl_parent_slot, impl_svg_node,
};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_raw_round_trip() {
        let id = InstanceId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
        assert_eq!(id.to_string(), "42");
        assert!(InstanceId::from_raw(1) < InstanceId::from_raw(2));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ElementKind::Rect.as_str(), "rect");
        assert_eq!(ElementKind::Gradient.as_str(), "gradient");
        assert_eq!(ElementKind::Generic.as_str(), "definition");
        assert_eq!(ElementKind::Asset.as_str(), "asset");
        assert_eq!(ElementKind::ViewBox.to_string(), "viewbox");
    }

    #[test]
    fn test_kind_is_shape() {
        assert!(ElementKind::Rect.is_shape());
        assert!(ElementKind::Path.is_shape());
        assert!(!ElementKind::Gradient.is_shape());
        assert!(!ElementKind::Asset.is_shape());
        assert!(!ElementKind::ViewBox.is_shape());
    }

    #[test]
    fn test_synthesized_id_format() {
        let id = synthesize_id(ElementKind::Rect, InstanceId::from_raw(7));
        assert_eq!(id, "rect[7]");
        let id = synthesize_id(ElementKind::Generic, InstanceId::from_raw(12));
        assert_eq!(id, "definition[12]");
    }

    #[test]
    fn test_element_info_display() {
        let info = ElementInfo {
            kind: ElementKind::Gradient,
            instance: InstanceId::from_raw(3),
            id: "g1".into(),
        };
        assert_eq!(info.to_string(), "gradient \"g1\" (#3)");
    }
}
