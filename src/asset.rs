//! The document root: an `<svg>` element aggregating shapes, definitions, a
//! viewbox, namespaces, and extra attributes.
//!
//! Children are owned handles. Adding a child installs a weak back-reference
//! to this document, so the child's own change events bubble into listeners
//! registered here; removing it severs that link. Serialization partitions
//! children by their `store_in_defs` flag: flagged entries render inside one
//! `<defs>` block, the rest render as direct children, each group in
//! insertion order.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::attr::{self, AttrList, AttrsExt, ExtraAttrs};
use crate::change::Dispatch;
use crate::context::SvgContext;
use crate::defs::Definition;
use crate::element::{
    impl_element_api, impl_extra_attr_api, impl_svg_node, rewrite_extra_refs, ElementBase,
    ElementKind, InstanceId, SvgNode,
};
use crate::error::{SvgError, SvgResult};
use crate::geometry::{Geometry, Shape};
use crate::gradient::{Gradient, StopSpec};
use crate::registry::{ElementCell, RegisteredElement};
use crate::viewbox::ViewBox;

/// Namespace every document starts with.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

// =============================================================================
// GradientSpec
// =============================================================================

/// Input accepted by [`SvgAsset::set_gradient`].
#[derive(Debug, Clone, PartialEq)]
pub enum GradientSpec {
    /// Install this gradient as the document's first gradient.
    Gradient(Gradient),
    /// Restop the first gradient with these colors, creating it if absent.
    Colors(Vec<String>),
    /// Single-color form of `Colors`.
    Color(String),
    /// Clear the gradient. Deliberately unimplemented: see
    /// [`SvgAsset::set_gradient`].
    None,
}

impl From<Gradient> for GradientSpec {
    fn from(gradient: Gradient) -> Self {
        Self::Gradient(gradient)
    }
}

impl From<&str> for GradientSpec {
    fn from(color: &str) -> Self {
        Self::Color(color.to_string())
    }
}

impl From<String> for GradientSpec {
    fn from(color: String) -> Self {
        Self::Color(color)
    }
}

impl<S: Into<String>> From<Vec<S>> for GradientSpec {
    fn from(colors: Vec<S>) -> Self {
        Self::Colors(colors.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<GradientSpec>> From<Option<T>> for GradientSpec {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(spec) => spec.into(),
            None => Self::None,
        }
    }
}

// =============================================================================
// SvgAsset
// =============================================================================

/// Handle to a document.
#[derive(Clone)]
pub struct SvgAsset {
    inner: Rc<RefCell<AssetInner>>,
}

pub(crate) struct AssetInner {
    pub(crate) base: ElementBase,
    pub(crate) view_box: ViewBox,
    shapes: SmallVec<[Shape; 4]>,
    definitions: SmallVec<[Definition; 4]>,
    namespaces: Vec<(String, String)>,
    extra: ExtraAttrs,
}

impl RegisteredElement for AssetInner {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn rewrite_references(&mut self, old: &str, new: &str, out: &mut Vec<Dispatch>) -> usize {
        rewrite_extra_refs(&self.base, &mut self.extra, old, new, out)
    }
}

impl SvgAsset {
    /// Create an empty document with the default viewbox and the `xmlns`
    /// namespace.
    pub fn new(ctx: &SvgContext, id: Option<&str>) -> Self {
        let base = ElementBase::new(ctx, ElementKind::Asset, id);
        let view_box = ViewBox::new(ctx);
        let inner = Rc::new(RefCell::new(AssetInner {
            base,
            view_box,
            shapes: SmallVec::new(),
            definitions: SmallVec::new(),
            namespaces: vec![("xmlns".to_string(), SVG_NAMESPACE.to_string())],
            extra: ExtraAttrs::new(),
        }));
        let cell: ElementCell = inner.clone();
        ctx.register(cell);
        let parent = Rc::downgrade(&inner);
        inner.borrow().view_box.set_parent(Some(parent));
        Self { inner }
    }

    /// This document's viewbox.
    pub fn view_box(&self) -> ViewBox {
        self.inner.borrow().view_box.clone()
    }

    // -------------------------------------------------------------------------
    // Namespaces
    // -------------------------------------------------------------------------

    /// Declared namespaces, in order.
    pub fn namespaces(&self) -> Vec<(String, String)> {
        self.inner.borrow().namespaces.clone()
    }

    /// Declare a namespace (insert, or update an existing declaration of the
    /// same name).
    pub fn add_namespace(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.namespaces.get_attr(&name) == Some(value.as_str()) {
                return;
            }
            let old = inner.namespaces.set_attr(name, value.clone());
            inner.base.change("namespaces", old.into(), value.into())
        };
        dispatch.run();
    }

    /// Replace the namespace list.
    pub fn set_namespaces(&self, namespaces: Vec<(String, String)>) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.namespaces == namespaces {
                return;
            }
            let old_len = inner.namespaces.len();
            inner.namespaces = namespaces;
            let new_len = inner.namespaces.len();
            inner
                .base
                .change("namespaces", old_len.into(), new_len.into())
        };
        dispatch.run();
    }

    // -------------------------------------------------------------------------
    // Shapes
    // -------------------------------------------------------------------------

    /// The direct shape children, in order.
    pub fn shapes(&self) -> Vec<Shape> {
        self.inner.borrow().shapes.to_vec()
    }

    /// Number of shape children.
    pub fn shape_count(&self) -> usize {
        self.inner.borrow().shapes.len()
    }

    /// Append a shape, adopting it so its changes bubble here.
    pub fn add_shape(&self, shape: Shape) {
        let parent = Rc::downgrade(&self.inner);
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            shape.set_parent(Some(parent));
            let old_len = inner.shapes.len();
            inner.shapes.push(shape);
            inner
                .base
                .change("shapes", old_len.into(), inner.shapes.len().into())
        };
        dispatch.run();
    }

    /// Replace the whole shape list, orphaning the old children and adopting
    /// the new ones. One `"shapes"` change.
    pub fn set_shapes(&self, shapes: Vec<Shape>) {
        let parent = Rc::downgrade(&self.inner);
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.shapes.is_empty() && shapes.is_empty() {
                return;
            }
            let old_len = inner.shapes.len();
            for shape in inner.shapes.drain(..) {
                shape.set_parent(None);
            }
            for shape in &shapes {
                shape.set_parent(Some(parent.clone()));
            }
            inner.shapes = shapes.into_iter().collect();
            inner
                .base
                .change("shapes", old_len.into(), inner.shapes.len().into())
        };
        dispatch.run();
    }

    /// Remove a shape by instance number, orphaning it. `None` when no child
    /// matches.
    pub fn remove_shape(&self, instance: InstanceId) -> Option<Shape> {
        let position = {
            let inner = self.inner.borrow();
            inner.shapes.iter().position(|s| s.instance() == instance)?
        };
        self.remove_shape_at(position)
    }

    /// Remove the shape at `position`, orphaning it.
    pub fn remove_shape_at(&self, position: usize) -> Option<Shape> {
        let (removed, dispatch) = {
            let mut inner = self.inner.borrow_mut();
            if position >= inner.shapes.len() {
                return None;
            }
            let removed = inner.shapes.remove(position);
            removed.set_parent(None);
            let new_len = inner.shapes.len();
            let dispatch = inner
                .base
                .change("shapes", (new_len + 1).into(), new_len.into());
            (removed, dispatch)
        };
        dispatch.run();
        Some(removed)
    }

    /// Remove every shape, orphaning them. One `"shapes"` change; silent when
    /// already empty.
    pub fn clear_shapes(&self) {
        self.set_shapes(Vec::new());
    }

    // -------------------------------------------------------------------------
    // Definitions
    // -------------------------------------------------------------------------

    /// The definition entries, in order.
    pub fn definitions(&self) -> Vec<Definition> {
        self.inner.borrow().definitions.to_vec()
    }

    /// Number of definition entries.
    pub fn definition_count(&self) -> usize {
        self.inner.borrow().definitions.len()
    }

    /// Append a definition, adopting it so its changes bubble here.
    pub fn add_definition(&self, definition: Definition) {
        let parent = Rc::downgrade(&self.inner);
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            definition.set_parent(Some(parent));
            let old_len = inner.definitions.len();
            inner.definitions.push(definition);
            inner
                .base
                .change("definitions", old_len.into(), inner.definitions.len().into())
        };
        dispatch.run();
    }

    /// Replace the whole definition list, orphaning the old entries and
    /// adopting the new ones. One `"definitions"` change.
    pub fn set_definitions(&self, definitions: Vec<Definition>) {
        let parent = Rc::downgrade(&self.inner);
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.definitions.is_empty() && definitions.is_empty() {
                return;
            }
            let old_len = inner.definitions.len();
            for definition in inner.definitions.drain(..) {
                definition.set_parent(None);
            }
            for definition in &definitions {
                definition.set_parent(Some(parent.clone()));
            }
            inner.definitions = definitions.into_iter().collect();
            inner
                .base
                .change("definitions", old_len.into(), inner.definitions.len().into())
        };
        dispatch.run();
    }

    /// Remove a definition by instance number, orphaning it. `None` when no
    /// entry matches.
    pub fn remove_definition(&self, instance: InstanceId) -> Option<Definition> {
        let position = {
            let inner = self.inner.borrow();
            inner
                .definitions
                .iter()
                .position(|d| d.instance() == instance)?
        };
        self.remove_definition_at(position)
    }

    /// Remove the definition at `position`, orphaning it.
    pub fn remove_definition_at(&self, position: usize) -> Option<Definition> {
        let (removed, dispatch) = {
            let mut inner = self.inner.borrow_mut();
            if position >= inner.definitions.len() {
                return None;
            }
            let removed = inner.definitions.remove(position);
            removed.set_parent(None);
            let new_len = inner.definitions.len();
            let dispatch = inner
                .base
                .change("definitions", (new_len + 1).into(), new_len.into());
            (removed, dispatch)
        };
        dispatch.run();
        Some(removed)
    }

    /// Remove every definition, orphaning them. One `"definitions"` change;
    /// silent when already empty.
    pub fn clear_definitions(&self) {
        self.set_definitions(Vec::new());
    }

    // -------------------------------------------------------------------------
    // The document gradient
    // -------------------------------------------------------------------------

    /// The first gradient among the definitions, if any. Shape entries never
    /// match.
    pub fn gradient(&self) -> Option<Gradient> {
        self.inner
            .borrow()
            .definitions
            .iter()
            .find_map(|d| d.as_gradient().cloned())
    }

    /// Install or restop the document gradient.
    ///
    /// - a gradient handle replaces the first gradient in place (or is
    ///   appended when there is none),
    /// - colors (or a single color) restop the first gradient, creating a
    ///   linear one when there is none,
    /// - `None` returns [`SvgError::NotImplemented`]: clearing would strand
    ///   every `url(#id)` consumer of the gradient, so it is refused until
    ///   reference tracking can rewrite them.
    pub fn set_gradient(&self, spec: impl Into<GradientSpec>) -> SvgResult<Gradient> {
        match spec.into() {
            GradientSpec::Gradient(gradient) => {
                let parent = Rc::downgrade(&self.inner);
                let dispatch = {
                    let mut inner = self.inner.borrow_mut();
                    gradient.set_parent(Some(parent));
                    let old_len = inner.definitions.len();
                    if let Some(slot) = inner.definitions.iter_mut().find(|d| d.is_gradient()) {
                        if let Some(old) = slot.as_gradient() {
                            if old != &gradient {
                                old.set_parent(None);
                            }
                        }
                        *slot = Definition::Gradient(gradient.clone());
                    } else {
                        inner.definitions.push(Definition::Gradient(gradient.clone()));
                    }
                    inner
                        .base
                        .change("definitions", old_len.into(), inner.definitions.len().into())
                };
                dispatch.run();
                Ok(gradient)
            }
            GradientSpec::Colors(colors) => self.restop_gradient(colors),
            GradientSpec::Color(color) => self.restop_gradient(vec![color]),
            GradientSpec::None => Err(SvgError::not_implemented("clearing the document gradient")),
        }
    }

    fn restop_gradient(&self, colors: Vec<String>) -> SvgResult<Gradient> {
        if let Some(gradient) = self.gradient() {
            // The "stops" change bubbles through the gradient's parent link.
            gradient.set_stops(colors);
            Ok(gradient)
        } else {
            let ctx = self.context();
            let gradient = Gradient::new(&ctx, None, false).with_stops(colors);
            self.add_definition(Definition::Gradient(gradient.clone()));
            Ok(gradient)
        }
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    /// This document's attributes, serialized: id, viewBox, namespaces, then
    /// extra attributes.
    pub fn data(&self) -> String {
        let inner = self.inner.borrow();
        let mut attrs = AttrList::new();
        attrs.push("id", inner.base.id.as_str());
        attrs.push("viewBox", inner.view_box.attr_value());
        for (name, value) in &inner.namespaces {
            attrs.push(name.clone(), value.clone());
        }
        attrs.extend_extra(&inner.extra);
        attrs.render()
    }

    /// Full markup.
    ///
    /// `<svg {data}>`, one `<defs>` block when any child is defs-flagged
    /// (flagged definitions, then flagged shapes), direct shapes, direct
    /// definitions, `</svg>`. Children that cannot render are skipped; they
    /// log their own failure.
    pub fn html(&self) -> Option<String> {
        let inner = self.inner.borrow();
        let mut out = attr::open_tag("svg", &self.data());
        let has_defs = inner.definitions.iter().any(|d| d.store_in_defs())
            || inner.shapes.iter().any(|s| s.store_in_defs());
        if has_defs {
            out.push_str("<defs>");
            for definition in inner.definitions.iter().filter(|d| d.store_in_defs()) {
                if definition.id().trim().is_empty() {
                    log::warn!(
                        "{} has a blank id and cannot be referenced",
                        definition.info()
                    );
                }
                if let Some(markup) = definition.html() {
                    out.push_str(&markup);
                }
            }
            for shape in inner.shapes.iter().filter(|s| s.store_in_defs()) {
                if shape.id().trim().is_empty() {
                    log::warn!("{} has a blank id and cannot be referenced", shape.info());
                }
                if let Some(markup) = shape.html() {
                    out.push_str(&markup);
                }
            }
            out.push_str("</defs>");
        }
        for shape in inner.shapes.iter().filter(|s| !s.store_in_defs()) {
            if let Some(markup) = shape.html() {
                out.push_str(&markup);
            }
        }
        for definition in inner.definitions.iter().filter(|d| !d.store_in_defs()) {
            if let Some(markup) = definition.html() {
                out.push_str(&markup);
            }
        }
        out.push_str("</svg>");
        Some(out)
    }

    // -------------------------------------------------------------------------
    // Child factories
    // -------------------------------------------------------------------------

    /// Route a freshly built shape into the shapes list or, flagged for
    /// `<defs>`, into the definitions list.
    fn adopt_shape(&self, shape: &Shape, as_definition: bool) {
        if as_definition {
            shape.write_store_in_defs(true);
            self.add_definition(Definition::Shape(shape.clone()));
        } else {
            self.add_shape(shape.clone());
        }
    }

    /// Adopt a pre-built gradient into the definitions and return it.
    pub fn add_gradient(&self, gradient: Gradient) -> Gradient {
        self.add_definition(Definition::Gradient(gradient.clone()));
        gradient
    }

    /// Create a gradient with these stops, append it to the definitions, and
    /// return it.
    pub fn new_gradient<I, S>(&self, id: Option<&str>, radial: bool, stops: I) -> Gradient
    where
        I: IntoIterator<Item = S>,
        S: Into<StopSpec>,
    {
        let ctx = self.context();
        self.add_gradient(Gradient::new(&ctx, id, radial).with_stops(stops))
    }

    /// The default white-to-black ramp, appended to the definitions.
    pub fn default_gradient(&self) -> Gradient {
        let ctx = self.context();
        self.add_gradient(Gradient::default_ramp(&ctx))
    }
}

/// Per-kind shape factories: `add_*` (adopt a pre-built shape), `new_*`
/// (build from explicit fields and a fill), and `default_*` (the kind's
/// default geometry and fill). Each routes into the shapes list or, with
/// `as_definition`, into the definitions list flagged for `<defs>`.
macro_rules! impl_shape_factories {
    ($( $kind:ident => $variant:ident { $( $field:ident : $ty:ty ),+ $(,)? } ),+ $(,)?) => {
        paste::paste! {
            impl SvgAsset {
                $(
                    #[doc = concat!(
                        "Adopt a pre-built ", stringify!($kind), " and return it."
                    )]
                    pub fn [<add_ $kind>](&self, shape: Shape, as_definition: bool) -> Shape {
                        if shape.kind() != ElementKind::$variant {
                            log::warn!("{} is not a {}", shape.info(), stringify!($kind));
                        }
                        self.adopt_shape(&shape, as_definition);
                        shape
                    }

                    #[doc = concat!(
                        "Create a ", stringify!($kind),
                        ", route it into the document, and return it."
                    )]
                    pub fn [<new_ $kind>](
                        &self,
                        $( $field: $ty, )+
                        fill: impl Into<String>,
                        as_definition: bool,
                    ) -> Shape {
                        let ctx = self.context();
                        let geometry = Geometry::$variant { $( $field: $field.into() ),+ };
                        let shape = Shape::new(&ctx, geometry).with_fill(fill);
                        self.adopt_shape(&shape, as_definition);
                        shape
                    }

                    #[doc = concat!(
                        "Create a default ", stringify!($kind),
                        ", route it into the document, and return it."
                    )]
                    pub fn [<default_ $kind>](&self, as_definition: bool) -> Shape {
                        let ctx = self.context();
                        let shape = Shape::new(&ctx, Geometry::[<default_ $kind>]());
                        self.adopt_shape(&shape, as_definition);
                        shape
                    }
                )+
            }
        }
    };
}

impl_shape_factories! {
    rect => Rect { x: f64, y: f64, width: f64, height: f64 },
    circle => Circle { cx: f64, cy: f64, r: f64 },
    ellipse => Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    line => Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    polyline => Polyline { points: &str },
    polygon => Polygon { points: &str },
    path => Path { d: &str },
}

impl_element_api!(SvgAsset);
impl_extra_attr_api!(SvgAsset);
impl_svg_node!(SvgAsset);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::change::ChangeEvent;
    use crate::defs::ImageDef;

    fn recorded(asset: &SvgAsset) -> Rc<RefCell<Vec<ChangeEvent>>> {
        let events: Rc<RefCell<Vec<ChangeEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&events);
        asset.on_change(move |event| seen.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_empty_document_markup() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        assert_eq!(
            asset.html().unwrap(),
            "<svg id=\"doc\" viewBox=\"0 0 200 100\" \
             xmlns=\"http://www.w3.org/2000/svg\"></svg>"
        );
    }

    #[test]
    fn test_direct_children_render_in_order() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let rect = asset.new_rect(0.0, 0.0, 50.0, 50.0, "red", false);
        let circle = asset.default_circle(false);

        let html = asset.html().unwrap();
        let rect_at = html.find(&format!("<rect id=\"{}\"", rect.id())).unwrap();
        let circle_at = html
            .find(&format!("<circle id=\"{}\"", circle.id()))
            .unwrap();
        assert!(rect_at < circle_at);
        assert!(!html.contains("<defs>"));
    }

    #[test]
    fn test_defs_partition_and_order() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let gradient = asset.new_gradient(Some("g1"), false, ["red", "blue"]);
        let stamp = asset.new_rect(0.0, 0.0, 10.0, 10.0, "white", true);
        let direct = asset.new_rect(0.0, 0.0, 50.0, 50.0, gradient.id_url(), false);
        let image = ImageDef::new(&ctx, Some("img1"));
        image.set_store_in_defs(false);
        asset.add_definition(image.clone().into());

        let html = asset.html().unwrap();
        let defs_open = html.find("<defs>").unwrap();
        let defs_close = html.find("</defs>").unwrap();
        let gradient_at = html.find("<linearGradient id=\"g1\"").unwrap();
        let stamp_at = html.find(&format!("<rect id=\"{}\"", stamp.id())).unwrap();
        let direct_at = html.find(&format!("<rect id=\"{}\"", direct.id())).unwrap();
        let image_at = html.find("<image id=\"img1\"").unwrap();

        // Inside <defs>: definitions first, then defs-flagged shapes.
        assert!(defs_open < gradient_at && gradient_at < stamp_at && stamp_at < defs_close);
        // After </defs>: direct shapes, then direct definitions.
        assert!(defs_close < direct_at && direct_at < image_at);
        assert!(html.ends_with("</svg>"));
    }

    #[test]
    fn test_defs_flag_is_read_live_from_shapes() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let first = asset.default_rect(false);
        let middle = asset.default_circle(false);
        let last = asset.default_ellipse(false);
        first.set_store_in_defs(true);
        last.set_store_in_defs(true);

        let html = asset.html().unwrap();
        let defs_open = html.find("<defs>").unwrap();
        let defs_close = html.find("</defs>").unwrap();
        let first_at = html.find(&format!("<rect id=\"{}\"", first.id())).unwrap();
        let middle_at = html
            .find(&format!("<circle id=\"{}\"", middle.id()))
            .unwrap();
        let last_at = html
            .find(&format!("<ellipse id=\"{}\"", last.id()))
            .unwrap();

        // One <defs> block holds the flagged shapes in insertion order.
        assert_eq!(html.matches("<defs>").count(), 1);
        assert!(defs_open < first_at && first_at < last_at && last_at < defs_close);
        assert!(defs_close < middle_at);
    }

    #[test]
    fn test_local_listeners_fire_before_document_ones() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let rect = asset.default_rect(false);
        let order: Rc<RefCell<Vec<&str>>> = Rc::new(RefCell::new(Vec::new()));

        let seen = Rc::clone(&order);
        rect.on_change(move |event| {
            assert_eq!(event.source.kind, ElementKind::Rect);
            seen.borrow_mut().push("shape");
        });
        let seen = Rc::clone(&order);
        asset.on_change(move |event| {
            assert_eq!(event.source.kind, ElementKind::Rect);
            seen.borrow_mut().push("document");
        });

        rect.set_fill("tomato");
        assert_eq!(*order.borrow(), ["shape", "document"]);
    }

    #[test]
    fn test_child_changes_bubble_with_leaf_source() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let rect = asset.default_rect(false);
        let events = recorded(&asset);

        rect.set_fill("tomato");

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].property, "fill");
        assert_eq!(events[0].source.instance, rect.instance());
        assert_eq!(events[0].source.kind, ElementKind::Rect);
    }

    #[test]
    fn test_factories_fire_one_collection_event() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let events = recorded(&asset);

        // Construction writes fields directly; only the adoption notifies.
        asset.new_rect(0.0, 0.0, 10.0, 10.0, "white", false);
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].property, "shapes");

        asset.new_gradient(Some("g1"), false, ["red", "blue"]);
        assert_eq!(events.borrow().len(), 2);
        assert_eq!(events.borrow()[1].property, "definitions");
    }

    #[test]
    fn test_viewbox_changes_bubble() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let events = recorded(&asset);

        asset.view_box().set_width(300.0);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].property, "width");
        assert_eq!(events[0].source.kind, ElementKind::ViewBox);
        assert!(asset.data().contains("viewBox=\"0 0 300 100\""));
    }

    #[test]
    fn test_removed_shape_stops_bubbling() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let rect = asset.default_rect(false);
        let events = recorded(&asset);

        let removed = asset.remove_shape(rect.instance()).unwrap();
        assert_eq!(removed, rect);
        assert_eq!(asset.shape_count(), 0);
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].property, "shapes");

        rect.set_fill("tomato");
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_remove_by_unknown_instance() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        asset.default_rect(false);
        let stray = Shape::new(&ctx, Geometry::default_rect());
        assert!(asset.remove_shape(stray.instance()).is_none());
        assert_eq!(asset.shape_count(), 1);
        assert!(asset.remove_shape_at(5).is_none());
    }

    #[test]
    fn test_set_shapes_reparents() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let old = asset.default_rect(false);
        let new = Shape::new(&ctx, Geometry::default_circle());
        let events = recorded(&asset);

        asset.set_shapes(vec![new.clone()]);
        assert_eq!(events.borrow().len(), 1);

        // The replaced child is orphaned, the new one adopted.
        old.set_fill("tomato");
        assert_eq!(events.borrow().len(), 1);
        new.set_fill("tomato");
        assert_eq!(events.borrow().len(), 2);

        // Clearing an already-empty list is silent.
        asset.clear_shapes();
        asset.clear_shapes();
        assert_eq!(events.borrow().len(), 3);
    }

    #[test]
    fn test_gradient_lookup_skips_shape_entries() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        assert!(asset.gradient().is_none());
        asset.new_rect(0.0, 0.0, 10.0, 10.0, "white", true);
        assert!(asset.gradient().is_none());
        let gradient = asset.add_gradient(Gradient::new(&ctx, None, false).with_stops(["red"]));
        assert_eq!(asset.gradient(), Some(gradient));
    }

    #[test]
    fn test_set_gradient_colors_create_then_restop() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));

        let created = asset.set_gradient(vec!["red", "blue"]).unwrap();
        assert_eq!(asset.definition_count(), 1);
        assert_eq!(created.stop_count(), 2);

        let updated = asset.set_gradient(vec!["green"]).unwrap();
        assert_eq!(updated, created);
        assert_eq!(asset.definition_count(), 1);
        assert_eq!(created.stops()[0].color, "green");

        let single = asset.set_gradient("plum").unwrap();
        assert_eq!(single, created);
        assert_eq!(created.stops()[0].color, "plum");
    }

    #[test]
    fn test_set_gradient_restop_bubbles() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        asset.set_gradient(vec!["red", "blue"]).unwrap();
        let events = recorded(&asset);

        asset.set_gradient(vec!["green"]).unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].property, "stops");
        assert_eq!(events[0].source.kind, ElementKind::Gradient);
    }

    #[test]
    fn test_set_gradient_handle_replaces_in_place() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let first = asset.new_gradient(Some("g1"), false, ["red"]);
        let generic = asset.default_gradient();
        assert_eq!(asset.definition_count(), 2);

        let replacement = Gradient::new(&ctx, Some("g2"), true);
        let installed = asset.set_gradient(replacement.clone()).unwrap();
        assert_eq!(installed, replacement);
        assert_eq!(asset.definition_count(), 2);
        // The first gradient slot was replaced; the second entry survives.
        assert_eq!(asset.gradient(), Some(replacement.clone()));
        assert_eq!(asset.definitions()[1].as_gradient(), Some(&generic));

        // The replaced gradient no longer bubbles here.
        let events = recorded(&asset);
        first.set_sharp(true);
        assert!(events.borrow().is_empty());
        replacement.set_sharp(true);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_set_gradient_none_is_refused() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        asset.set_gradient(vec!["red"]).unwrap();

        let err = asset.set_gradient(None::<Gradient>).unwrap_err();
        assert!(matches!(err, SvgError::NotImplemented { .. }));
        // The refusal leaves the document untouched.
        assert!(asset.gradient().is_some());
    }

    #[test]
    fn test_shape_factory_routing() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let stamp = asset.new_circle(10.0, 10.0, 5.0, "white", true);

        assert_eq!(asset.shape_count(), 0);
        assert_eq!(asset.definition_count(), 1);
        assert!(stamp.store_in_defs());
        assert_eq!(
            asset.definitions()[0].as_shape().map(|s| s.instance()),
            Some(stamp.instance())
        );
    }

    #[test]
    fn test_prebuilt_shape_adoption() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let rect = Shape::new(&ctx, Geometry::default_rect()).with_stroke("black", 1.0);

        let adopted = asset.add_rect(rect.clone(), false);
        assert_eq!(adopted, rect);
        assert_eq!(asset.shape_count(), 1);

        let stamp = asset.add_circle(Shape::new(&ctx, Geometry::default_circle()), true);
        assert!(stamp.store_in_defs());
        assert_eq!(asset.definition_count(), 1);
    }

    #[test]
    fn test_string_shape_factories() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let polyline = asset.new_polyline("0,0 10,10", "none", false);
        let path = asset.new_path("M0,0 h10", "black", false);
        assert_eq!(polyline.points().as_deref(), Some("0,0 10,10"));
        assert_eq!(path.d().as_deref(), Some("M0,0 h10"));
        assert_eq!(asset.shape_count(), 2);
    }

    #[test]
    fn test_default_factories_use_default_paint() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let ellipse = asset.default_ellipse(false);
        assert_eq!(ellipse.fill().as_deref(), Some(crate::geometry::DEFAULT_FILL));
        assert_eq!(ellipse.rx(), Some(100.0));

        let gradient = asset.default_gradient();
        let colors: Vec<_> = gradient.stops().into_iter().map(|s| s.color).collect();
        assert_eq!(colors, crate::gradient::DEFAULT_RAMP);
    }

    #[test]
    fn test_namespace_management() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        asset.add_namespace("xmlns:xlink", "http://www.w3.org/1999/xlink");
        assert!(asset
            .data()
            .contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));

        // Re-declaring updates in place.
        asset.add_namespace("xmlns:xlink", "urn:example");
        let namespaces = asset.namespaces();
        assert_eq!(namespaces.len(), 2);
        assert_eq!(namespaces[1].1, "urn:example");
    }

    #[test]
    fn test_extra_attrs_serialize_after_namespaces() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        asset.set_attr("class", "stage");
        assert!(asset.data().ends_with("class=\"stage\""));
    }

    #[test]
    fn test_asset_muted_suppresses_bubbling() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("doc"));
        let rect = asset.default_rect(false);
        let events = recorded(&asset);

        asset.set_muted(true);
        rect.set_fill("tomato");
        assert!(events.borrow().is_empty());

        asset.set_muted(false);
        rect.set_fill("navy");
        assert_eq!(events.borrow().len(), 1);
    }
}
