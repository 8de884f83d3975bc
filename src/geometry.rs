//! Shape primitives: rect, circle, ellipse, line, polyline, polygon, path.
//!
//! A [`Shape`] is one geometry variant plus the shared paint surface
//! (`fill`/`stroke`/`stroke-width`) and caller-supplied extra attributes.
//! Field accessors are generated per variant; reading or writing a field the
//! current variant does not carry is logged and ignored.
//!
//! `fill` may be a literal color or a `url(#id)` reference to a definition;
//! referenced ids are kept current by the context when the target's id
//! changes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::attr::{self, fmt_number, AttrList, ExtraAttrs, MAX_DECIMALS};
use crate::change::Dispatch;
use crate::context::SvgContext;
use crate::element::{
    impl_defs_routing_api, impl_element_api, impl_extra_attr_api, impl_parent_slot, impl_svg_node,
    rewrite_extra_refs, ElementBase, ElementKind,
};
use crate::gradient::Gradient;
use crate::registry::{ElementCell, RegisteredElement};

/// Paint applied to a shape created without an explicit fill.
pub const DEFAULT_FILL: &str = "#beeeef";

// =============================================================================
// Geometry
// =============================================================================

/// The closed set of shape geometries and their fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polyline { points: String },
    Polygon { points: String },
    Path { d: String },
}

impl Geometry {
    /// Rect spanning the default viewbox.
    pub fn default_rect() -> Self {
        Self::Rect {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 100.0,
        }
    }

    /// Circle centered in the default viewbox.
    pub fn default_circle() -> Self {
        Self::Circle {
            cx: 100.0,
            cy: 50.0,
            r: 50.0,
        }
    }

    /// Ellipse filling the default viewbox.
    pub fn default_ellipse() -> Self {
        Self::Ellipse {
            cx: 100.0,
            cy: 50.0,
            rx: 100.0,
            ry: 50.0,
        }
    }

    /// Diagonal of the default viewbox.
    pub fn default_line() -> Self {
        Self::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 200.0,
            y2: 100.0,
        }
    }

    /// A "V" across the default viewbox.
    pub fn default_polyline() -> Self {
        Self::Polyline {
            points: "0,100 100,0 200,100".to_string(),
        }
    }

    /// A triangle across the default viewbox.
    pub fn default_polygon() -> Self {
        Self::Polygon {
            points: "0,0 200,0 100,100".to_string(),
        }
    }

    /// The default rect, written as path data.
    pub fn default_path() -> Self {
        Self::Path {
            d: "M0,0 h200 v100 h-200 Z".to_string(),
        }
    }

    /// The element kind of this variant.
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Rect { .. } => ElementKind::Rect,
            Self::Circle { .. } => ElementKind::Circle,
            Self::Ellipse { .. } => ElementKind::Ellipse,
            Self::Line { .. } => ElementKind::Line,
            Self::Polyline { .. } => ElementKind::Polyline,
            Self::Polygon { .. } => ElementKind::Polygon,
            Self::Path { .. } => ElementKind::Path,
        }
    }

    /// The markup tag of this variant.
    pub const fn tag(&self) -> &'static str {
        self.kind().as_str()
    }

    fn push_attrs(&self, attrs: &mut AttrList) {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => {
                attrs.push_num("x", *x);
                attrs.push_num("y", *y);
                attrs.push_num("width", *width);
                attrs.push_num("height", *height);
            }
            Self::Circle { cx, cy, r } => {
                attrs.push_num("cx", *cx);
                attrs.push_num("cy", *cy);
                attrs.push_num("r", *r);
            }
            Self::Ellipse { cx, cy, rx, ry } => {
                attrs.push_num("cx", *cx);
                attrs.push_num("cy", *cy);
                attrs.push_num("rx", *rx);
                attrs.push_num("ry", *ry);
            }
            Self::Line { x1, y1, x2, y2 } => {
                attrs.push_num("x1", *x1);
                attrs.push_num("y1", *y1);
                attrs.push_num("x2", *x2);
                attrs.push_num("y2", *y2);
            }
            Self::Polyline { points } | Self::Polygon { points } => {
                attrs.push("points", points.clone());
            }
            Self::Path { d } => {
                attrs.push("d", d.clone());
            }
        }
    }
}

// =============================================================================
// Shape
// =============================================================================

/// Handle to a shape element.
#[derive(Clone)]
pub struct Shape {
    inner: Rc<RefCell<ShapeInner>>,
}

pub(crate) struct ShapeInner {
    pub(crate) base: ElementBase,
    geometry: Geometry,
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: Option<f64>,
    extra: ExtraAttrs,
    pub(crate) store_in_defs: bool,
}

impl RegisteredElement for ShapeInner {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn rewrite_references(&mut self, old: &str, new: &str, out: &mut Vec<Dispatch>) -> usize {
        rewrite_paint_ref(&self.base, &mut self.fill, "fill", old, new, out)
            + rewrite_paint_ref(&self.base, &mut self.stroke, "stroke", old, new, out)
            + rewrite_extra_refs(&self.base, &mut self.extra, old, new, out)
    }
}

/// Rewrite one optional paint value when it references `url(#old)`.
fn rewrite_paint_ref(
    base: &ElementBase,
    paint: &mut Option<String>,
    property: &'static str,
    old: &str,
    new: &str,
    out: &mut Vec<Dispatch>,
) -> usize {
    match paint {
        Some(value) if attr::matches_url_ref(value, old) => {
            let old_value = std::mem::replace(value, attr::url_ref(new));
            out.push(base.change(property, old_value.into(), value.clone().into()));
            1
        }
        _ => 0,
    }
}

impl Shape {
    /// Create a shape with a generated id and the default fill.
    pub fn new(ctx: &SvgContext, geometry: Geometry) -> Self {
        Self::with_id(ctx, geometry, None)
    }

    /// Create a shape, claiming `id` when given.
    ///
    /// A rejected id is logged and the generated one kept; construction never
    /// fails.
    pub fn with_id(ctx: &SvgContext, geometry: Geometry, id: Option<&str>) -> Self {
        let base = ElementBase::new(ctx, geometry.kind(), id);
        let inner = Rc::new(RefCell::new(ShapeInner {
            base,
            geometry,
            fill: Some(DEFAULT_FILL.to_string()),
            stroke: None,
            stroke_width: None,
            extra: ExtraAttrs::new(),
            store_in_defs: false,
        }));
        let cell: ElementCell = inner.clone();
        ctx.register(cell);
        Self { inner }
    }

    /// Set the fill during construction.
    pub fn with_fill(self, fill: impl Into<String>) -> Self {
        self.inner.borrow_mut().fill = Some(fill.into());
        self
    }

    /// Set the stroke during construction.
    pub fn with_stroke(self, stroke: impl Into<String>, width: f64) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            inner.stroke = Some(stroke.into());
            inner.stroke_width = Some(width);
        }
        self
    }

    /// This shape's geometry.
    pub fn geometry(&self) -> Geometry {
        self.inner.borrow().geometry.clone()
    }

    /// Current fill paint, if set.
    pub fn fill(&self) -> Option<String> {
        self.inner.borrow().fill.clone()
    }

    /// Set the fill paint.
    pub fn set_fill(&self, fill: impl Into<String>) {
        let fill = fill.into();
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.fill.as_deref() == Some(fill.as_str()) {
                return;
            }
            let old = inner.fill.replace(fill.clone());
            inner.base.change("fill", old.into(), fill.into())
        };
        dispatch.run();
    }

    /// Point the fill at a definition by id: `fill="url(#id)"`.
    ///
    /// A blank id is logged and ignored.
    pub fn fill_url(&self, id: impl AsRef<str>) {
        let id = id.as_ref().trim();
        if id.is_empty() {
            log::warn!("cannot fill {:?} from a blank id", self);
            return;
        }
        self.set_fill(attr::url_ref(id));
    }

    /// Point the fill at a gradient by its id.
    pub fn fill_gradient(&self, gradient: &Gradient) {
        let id = gradient.id();
        if id.trim().is_empty() {
            log::warn!("cannot fill {:?} from a gradient with a blank id", self);
            return;
        }
        self.set_fill(attr::url_ref(&id));
    }

    /// Current stroke paint, if set.
    pub fn stroke(&self) -> Option<String> {
        self.inner.borrow().stroke.clone()
    }

    /// Set the stroke paint.
    pub fn set_stroke(&self, stroke: impl Into<String>) {
        let stroke = stroke.into();
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.stroke.as_deref() == Some(stroke.as_str()) {
                return;
            }
            let old = inner.stroke.replace(stroke.clone());
            inner.base.change("stroke", old.into(), stroke.into())
        };
        dispatch.run();
    }

    /// Current stroke width, if set.
    pub fn stroke_width(&self) -> Option<f64> {
        self.inner.borrow().stroke_width
    }

    /// Set the stroke width.
    pub fn set_stroke_width(&self, width: f64) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.stroke_width == Some(width) {
                return;
            }
            let old = inner.stroke_width.replace(width);
            inner.base.change(
                "stroke-width",
                old.map(Into::into).unwrap_or(crate::change::Value::Null),
                width.into(),
            )
        };
        dispatch.run();
    }

    /// Rect geometry as SVG path data: `M{x},{y} h{w} v{h} h{-w}`, plus
    /// ` Z` when `closed`. Logged and `None` for non-rect shapes.
    pub fn as_path_data(&self, closed: bool) -> Option<String> {
        let inner = self.inner.borrow();
        let Geometry::Rect {
            x,
            y,
            width,
            height,
        } = &inner.geometry
        else {
            log::warn!(
                "only rect flattens to path data, this is a {}",
                inner.geometry.kind()
            );
            return None;
        };
        let mut d = format!(
            "M{},{} h{} v{} h{}",
            fmt_number(*x, MAX_DECIMALS),
            fmt_number(*y, MAX_DECIMALS),
            fmt_number(*width, MAX_DECIMALS),
            fmt_number(*height, MAX_DECIMALS),
            fmt_number(-*width, MAX_DECIMALS),
        );
        if closed {
            d.push_str(" Z");
        }
        Some(d)
    }

    /// Flatten a rect into a fresh path shape carrying the same paint, extra
    /// attributes, and defs routing. `None` for non-rect shapes.
    pub fn to_path(&self) -> Option<Shape> {
        let d = self.as_path_data(true)?;
        let (ctx, fill, stroke, stroke_width, extra, store_in_defs) = {
            let inner = self.inner.borrow();
            (
                inner.base.ctx.clone(),
                inner.fill.clone(),
                inner.stroke.clone(),
                inner.stroke_width,
                inner.extra.clone(),
                inner.store_in_defs,
            )
        };
        let path = Shape::new(&ctx, Geometry::Path { d });
        {
            let mut inner = path.inner.borrow_mut();
            inner.fill = fill;
            inner.stroke = stroke;
            inner.stroke_width = stroke_width;
            inner.extra = extra;
            inner.store_in_defs = store_in_defs;
        }
        Some(path)
    }

    /// This shape's attributes, serialized: id, geometry fields, paint, then
    /// extra attributes.
    pub fn data(&self) -> String {
        let inner = self.inner.borrow();
        let mut attrs = AttrList::new();
        attrs.push("id", inner.base.id.as_str());
        inner.geometry.push_attrs(&mut attrs);
        attrs.push_opt("fill", inner.fill.clone());
        attrs.push_opt("stroke", inner.stroke.clone());
        attrs.push_opt(
            "stroke-width",
            inner.stroke_width.map(|w| fmt_number(w, MAX_DECIMALS)),
        );
        attrs.extend_extra(&inner.extra);
        attrs.render()
    }

    /// Full markup: `<tag {data}/>`.
    pub fn html(&self) -> Option<String> {
        let tag = self.inner.borrow().geometry.tag();
        Some(attr::self_closing_tag(tag, &self.data()))
    }
}

impl_element_api!(Shape);
impl_parent_slot!(Shape);
impl_extra_attr_api!(Shape);
impl_defs_routing_api!(Shape);
impl_svg_node!(Shape);

// =============================================================================
// Per-variant field accessors
// =============================================================================

macro_rules! impl_geometry_num_fields {
    ($( $field:ident => [ $( $variant:ident ),+ ] ),+ $(,)?) => {
        paste::paste! {
            impl Shape {
                $(
                    #[doc = concat!("The `", stringify!($field), "` value, for variants that carry one.")]
                    pub fn $field(&self) -> Option<f64> {
                        match &self.inner.borrow().geometry {
                            $( Geometry::$variant { $field, .. } => Some(*$field), )+
                            other => {
                                log::warn!(
                                    "`{}` is not a {} property",
                                    stringify!($field),
                                    other.kind()
                                );
                                None
                            }
                        }
                    }

                    #[doc = concat!("Set the `", stringify!($field), "` value, for variants that carry one.")]
                    pub fn [<set_ $field>](&self, value: f64) {
                        let dispatch = {
                            let mut inner = self.inner.borrow_mut();
                            let old = match &mut inner.geometry {
                                $( Geometry::$variant { $field, .. } => {
                                    if *$field == value {
                                        return;
                                    }
                                    std::mem::replace($field, value)
                                } )+
                                other => {
                                    log::warn!(
                                        "`{}` is not a {} property",
                                        stringify!($field),
                                        other.kind()
                                    );
                                    return;
                                }
                            };
                            inner.base.change(stringify!($field), old.into(), value.into())
                        };
                        dispatch.run();
                    }
                )+
            }
        }
    };
}

impl_geometry_num_fields! {
    x => [Rect],
    y => [Rect],
    width => [Rect],
    height => [Rect],
    cx => [Circle, Ellipse],
    cy => [Circle, Ellipse],
    r => [Circle],
    rx => [Ellipse],
    ry => [Ellipse],
    x1 => [Line],
    y1 => [Line],
    x2 => [Line],
    y2 => [Line],
}

macro_rules! impl_geometry_str_fields {
    ($( $field:ident => [ $( $variant:ident ),+ ] ),+ $(,)?) => {
        paste::paste! {
            impl Shape {
                $(
                    #[doc = concat!("The `", stringify!($field), "` value, for variants that carry one.")]
                    pub fn $field(&self) -> Option<String> {
                        match &self.inner.borrow().geometry {
                            $( Geometry::$variant { $field, .. } => Some($field.clone()), )+
                            other => {
                                log::warn!(
                                    "`{}` is not a {} property",
                                    stringify!($field),
                                    other.kind()
                                );
                                None
                            }
                        }
                    }

                    #[doc = concat!("Set the `", stringify!($field), "` value, for variants that carry one.")]
                    pub fn [<set_ $field>](&self, value: impl Into<String>) {
                        let value = value.into();
                        let dispatch = {
                            let mut inner = self.inner.borrow_mut();
                            let old = match &mut inner.geometry {
                                $( Geometry::$variant { $field, .. } => {
                                    if *$field == value {
                                        return;
                                    }
                                    std::mem::replace($field, value.clone())
                                } )+
                                other => {
                                    log::warn!(
                                        "`{}` is not a {} property",
                                        stringify!($field),
                                        other.kind()
                                    );
                                    return;
                                }
                            };
                            inner.base.change(stringify!($field), old.into(), value.into())
                        };
                        dispatch.run();
                    }
                )+
            }
        }
    };
}

impl_geometry_str_fields! {
    points => [Polyline, Polygon],
    d => [Path],
}

// =============================================================================
// Tests
// =============================================================================
