//! Reusable definitions: images, masks, and a generic escape hatch, plus the
//! [`Definition`] sum that the document's definitions collection stores.
//!
//! Image and mask definitions carry an x/y/width/height block that can either
//! hold explicit values or mirror the owning document's viewbox
//! (`match_viewbox_xywh`, the default). While mirrored, the four getters read
//! the live viewbox and the four setters are logged no-ops. Which of the four
//! serialize is controlled per element by [`IncludeXywh`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::asset::AssetInner;
use crate::attr::{self, AttrList, ExtraAttrs};
use crate::change::{Dispatch, Value};
use crate::context::SvgContext;
use crate::element::{
    impl_defs_routing_api, impl_element_api, impl_extra_attr_api, impl_parent_slot, impl_svg_node,
    rewrite_extra_refs, ElementBase, ElementInfo, ElementKind, SvgNode,
};
use crate::geometry::{Geometry, Shape};
use crate::gradient::{Gradient, DEFAULT_RAMP};
use crate::registry::{ElementCell, RegisteredElement};
use crate::viewbox::DEFAULT_VIEWBOX;

// =============================================================================
// IncludeXywh
// =============================================================================

/// Which of the x/y/width/height attributes an element serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeXywh {
    pub x: bool,
    pub y: bool,
    pub width: bool,
    pub height: bool,
}

impl IncludeXywh {
    /// Serialize all four.
    pub const ALL: Self = Self {
        x: true,
        y: true,
        width: true,
        height: true,
    };

    /// Serialize none of them.
    pub const NONE: Self = Self {
        x: false,
        y: false,
        width: false,
        height: false,
    };

    /// Parse a character subset: `x`, `y`, `w`, `h` in any order and case
    /// (`"yh"` selects y and height). Unknown characters are logged and
    /// ignored.
    pub fn from_subset(subset: &str) -> Self {
        let mut include = Self::NONE;
        for ch in subset.chars() {
            match ch.to_ascii_lowercase() {
                'x' => include.x = true,
                'y' => include.y = true,
                'w' => include.width = true,
                'h' => include.height = true,
                ch if ch.is_whitespace() => {}
                other => log::warn!("unknown dimension flag {other:?} in {subset:?}"),
            }
        }
        include
    }

    /// The subset string form: the selected flags among `xywh`, in that order.
    pub fn as_subset(&self) -> String {
        let mut out = String::new();
        if self.x {
            out.push('x');
        }
        if self.y {
            out.push('y');
        }
        if self.width {
            out.push('w');
        }
        if self.height {
            out.push('h');
        }
        out
    }
}

impl Default for IncludeXywh {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<&str> for IncludeXywh {
    fn from(subset: &str) -> Self {
        Self::from_subset(subset)
    }
}

// =============================================================================
// XYWH storage
// =============================================================================

/// The x/y/width/height block composed by image and mask definitions.
#[derive(Debug, Clone)]
pub(crate) struct XywhFields {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    match_viewbox: bool,
    include: IncludeXywh,
}

impl Default for XywhFields {
    fn default() -> Self {
        let (x, y, width, height) = DEFAULT_VIEWBOX;
        Self {
            x,
            y,
            width,
            height,
            match_viewbox: true,
            include: IncludeXywh::ALL,
        }
    }
}

/// The values the element currently presents: the owning document's live
/// viewbox while mirrored and reachable, the stored fields otherwise.
fn effective_xywh(base: &ElementBase, fields: &XywhFields) -> (f64, f64, f64, f64) {
    if fields.match_viewbox {
        if let Some(parent) = base.parent_upgrade() {
            return parent.borrow().view_box.values();
        }
    }
    (fields.x, fields.y, fields.width, fields.height)
}

fn push_xywh(attrs: &mut AttrList, base: &ElementBase, fields: &XywhFields) {
    let (x, y, width, height) = effective_xywh(base, fields);
    if fields.include.x {
        attrs.push_num("x", x);
    }
    if fields.include.y {
        attrs.push_num("y", y);
    }
    if fields.include.width {
        attrs.push_num("width", width);
    }
    if fields.include.height {
        attrs.push_num("height", height);
    }
}

/// Stamp the x/y/width/height surface onto a definition type whose inner
/// exposes `base` and `xywh` fields.
macro_rules! impl_xywh_api {
    ($ty:ident, $( $field:ident => $index:tt ),+ $(,)?) => {
        paste::paste! {
            impl $ty {
                $(
                    #[doc = concat!(
                        "The effective `", stringify!($field),
                        "` value: live viewbox while mirrored, stored otherwise."
                    )]
                    pub fn $field(&self) -> f64 {
                        let inner = self.inner.borrow();
                        effective_xywh(&inner.base, &inner.xywh).$index
                    }

                    #[doc = concat!(
                        "Set the stored `", stringify!($field),
                        "` value. Logged and ignored while mirroring the viewbox."
                    )]
                    pub fn [<set_ $field>](&self, value: f64) {
                        let dispatch = {
                            let mut inner = self.inner.borrow_mut();
                            if inner.xywh.match_viewbox {
                                log::warn!(
                                    "{} mirrors the viewbox, `{}` was not written",
                                    inner.base.info(),
                                    stringify!($field)
                                );
                                return;
                            }
                            if inner.xywh.$field == value {
                                return;
                            }
                            let old = std::mem::replace(&mut inner.xywh.$field, value);
                            inner.base.change(stringify!($field), old.into(), value.into())
                        };
                        dispatch.run();
                    }
                )+

                /// Whether x/y/width/height mirror the owning document's
                /// viewbox.
                pub fn match_viewbox_xywh(&self) -> bool {
                    self.inner.borrow().xywh.match_viewbox
                }

                /// Mirror the viewbox, or release the block back to its stored
                /// values.
                pub fn set_match_viewbox_xywh(&self, matched: bool) {
                    let dispatch = {
                        let mut inner = self.inner.borrow_mut();
                        if inner.xywh.match_viewbox == matched {
                            return;
                        }
                        inner.xywh.match_viewbox = matched;
                        inner.base.change(
                            "match_viewbox_xywh",
                            (!matched).into(),
                            matched.into(),
                        )
                    };
                    dispatch.run();
                }

                /// Set viewbox mirroring during construction.
                pub fn with_match_viewbox_xywh(self, matched: bool) -> Self {
                    self.inner.borrow_mut().xywh.match_viewbox = matched;
                    self
                }

                /// Which of x/y/width/height this element serializes.
                pub fn include_xywh_in_data(&self) -> IncludeXywh {
                    self.inner.borrow().xywh.include
                }

                /// Choose which of x/y/width/height serialize, as flags or a
                /// `"xywh"` subset string.
                pub fn set_include_xywh_in_data(&self, include: impl Into<IncludeXywh>) {
                    let include = include.into();
                    let dispatch = {
                        let mut inner = self.inner.borrow_mut();
                        if inner.xywh.include == include {
                            return;
                        }
                        let old = std::mem::replace(&mut inner.xywh.include, include);
                        inner.base.change(
                            "include_xywh_in_data",
                            old.as_subset().into(),
                            include.as_subset().into(),
                        )
                    };
                    dispatch.run();
                }

                /// Set the serialized subset during construction.
                pub fn with_include_xywh(self, include: impl Into<IncludeXywh>) -> Self {
                    self.inner.borrow_mut().xywh.include = include.into();
                    self
                }
            }
        }
    };
}

// =============================================================================
// ImageDef
// =============================================================================

/// Handle to an `<image>` definition.
#[derive(Clone)]
pub struct ImageDef {
    inner: Rc<RefCell<ImageDefInner>>,
}

pub(crate) struct ImageDefInner {
    pub(crate) base: ElementBase,
    xywh: XywhFields,
    href: Option<String>,
    extra: ExtraAttrs,
    store_in_defs: bool,
}

impl RegisteredElement for ImageDefInner {
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

impl ImageDef {
    /// Create an image definition mirroring the viewbox, with no href.
    pub fn new(ctx: &SvgContext, id: Option<&str>) -> Self {
        let base = ElementBase::new(ctx, ElementKind::Image, id);
        let inner = Rc::new(RefCell::new(ImageDefInner {
            base,
            xywh: XywhFields::default(),
            href: None,
            extra: ExtraAttrs::new(),
            store_in_defs: true,
        }));
        let cell: ElementCell = inner.clone();
        ctx.register(cell);
        Self { inner }
    }

    /// Set the href during construction.
    pub fn with_href(self, href: impl Into<String>) -> Self {
        self.inner.borrow_mut().href = Some(href.into());
        self
    }

    /// The image location, if set.
    pub fn href(&self) -> Option<String> {
        self.inner.borrow().href.clone()
    }

    /// Set the image location.
    pub fn set_href(&self, href: impl Into<String>) {
        let href = href.into();
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.href.as_deref() == Some(href.as_str()) {
                return;
            }
            let old = inner.href.replace(href.clone());
            inner.base.change("href", old.into(), href.into())
        };
        dispatch.run();
    }

    /// The markup tag.
    pub fn tag(&self) -> &'static str {
        "image"
    }

    /// This image's attributes, serialized: id, the selected x/y/width/height
    /// values, href, then extra attributes.
    pub fn data(&self) -> String {
        let inner = self.inner.borrow();
        let mut attrs = AttrList::new();
        attrs.push("id", inner.base.id.as_str());
        push_xywh(&mut attrs, &inner.base, &inner.xywh);
        attrs.push_opt("href", inner.href.clone());
        attrs.extend_extra(&inner.extra);
        attrs.render()
    }

    /// Full markup: `<image {data}/>`.
    pub fn html(&self) -> Option<String> {
        Some(attr::self_closing_tag("image", &self.data()))
    }
}

impl_element_api!(ImageDef);
impl_parent_slot!(ImageDef);
impl_extra_attr_api!(ImageDef);
impl_defs_routing_api!(ImageDef);
impl_xywh_api!(ImageDef, x => 0, y => 1, width => 2, height => 3);
impl_svg_node!(ImageDef);

// =============================================================================
// MaskDef
// =============================================================================

/// The fill of a mask's auto-generated backing rect.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskFill {
    /// Literal paint value: a color or a `url(#id)` string.
    Value(String),
    /// Existing gradient; its markup is embedded inside the mask.
    Gradient(Gradient),
    /// Colors for a gradient built at serialization time.
    Colors(Vec<String>),
}

impl MaskFill {
    /// Short form for diagnostics and event payloads.
    fn describe(&self) -> String {
        match self {
            Self::Value(value) => value.clone(),
            Self::Gradient(gradient) => gradient.id_url(),
            Self::Colors(colors) => colors.join(" "),
        }
    }
}

impl From<&str> for MaskFill {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for MaskFill {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<Gradient> for MaskFill {
    fn from(gradient: Gradient) -> Self {
        Self::Gradient(gradient)
    }
}

impl<S: Into<String>> From<Vec<S>> for MaskFill {
    fn from(colors: Vec<S>) -> Self {
        Self::Colors(colors.into_iter().map(Into::into).collect())
    }
}

/// Handle to a `<mask>` definition.
///
/// With `auto_generate_rect` on, serialization synthesizes a rect spanning
/// the mask's current x/y/width/height, filled per
/// [`auto_generate_rect_fill`](MaskDef::auto_generate_rect_fill) (a
/// white-to-black luminance ramp when unset). The synthesized elements carry
/// ids derived from the mask's (`{id}-fill`, `{id}-rect`), live only for the
/// duration of the call, and are never added to any collection, so repeated
/// reads produce identical markup.
#[derive(Clone)]
pub struct MaskDef {
    inner: Rc<RefCell<MaskDefInner>>,
}

pub(crate) struct MaskDefInner {
    pub(crate) base: ElementBase,
    xywh: XywhFields,
    auto_generate_rect: bool,
    auto_generate_rect_fill: Option<MaskFill>,
    extra: ExtraAttrs,
    store_in_defs: bool,
}

impl RegisteredElement for MaskDefInner {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn rewrite_references(&mut self, old: &str, new: &str, out: &mut Vec<Dispatch>) -> usize {
        let mut rewritten = 0;
        if let Some(MaskFill::Value(value)) = &mut self.auto_generate_rect_fill {
            if attr::matches_url_ref(value, old) {
                let old_value = std::mem::replace(value, attr::url_ref(new));
                out.push(self.base.change(
                    "auto_generate_rect_fill",
                    old_value.into(),
                    value.clone().into(),
                ));
                rewritten += 1;
            }
        }
        rewritten + rewrite_extra_refs(&self.base, &mut self.extra, old, new, out)
    }
}

impl MaskDef {
    /// Create a mask definition mirroring the viewbox, with no generated rect.
    pub fn new(ctx: &SvgContext, id: Option<&str>) -> Self {
        let base = ElementBase::new(ctx, ElementKind::Mask, id);
        let inner = Rc::new(RefCell::new(MaskDefInner {
            base,
            xywh: XywhFields::default(),
            auto_generate_rect: false,
            auto_generate_rect_fill: None,
            extra: ExtraAttrs::new(),
            store_in_defs: true,
        }));
        let cell: ElementCell = inner.clone();
        ctx.register(cell);
        Self { inner }
    }

    /// Set rect generation during construction.
    pub fn with_auto_generate_rect(self, generate: bool) -> Self {
        self.inner.borrow_mut().auto_generate_rect = generate;
        self
    }

    /// Set the generated rect's fill during construction.
    pub fn with_auto_generate_rect_fill(self, fill: impl Into<MaskFill>) -> Self {
        self.inner.borrow_mut().auto_generate_rect_fill = Some(fill.into());
        self
    }

    /// Whether serialization synthesizes a backing rect.
    pub fn auto_generate_rect(&self) -> bool {
        self.inner.borrow().auto_generate_rect
    }

    /// Turn backing-rect generation on or off.
    pub fn set_auto_generate_rect(&self, generate: bool) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.auto_generate_rect == generate {
                return;
            }
            inner.auto_generate_rect = generate;
            inner
                .base
                .change("auto_generate_rect", (!generate).into(), generate.into())
        };
        dispatch.run();
    }

    /// The generated rect's fill, if one was chosen.
    pub fn auto_generate_rect_fill(&self) -> Option<MaskFill> {
        self.inner.borrow().auto_generate_rect_fill.clone()
    }

    /// Choose the generated rect's fill: a paint value, a gradient handle, or
    /// a color list.
    pub fn set_auto_generate_rect_fill(&self, fill: impl Into<MaskFill>) {
        let fill = fill.into();
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.auto_generate_rect_fill.as_ref() == Some(&fill) {
                return;
            }
            let old = inner.auto_generate_rect_fill.replace(fill.clone());
            inner.base.change(
                "auto_generate_rect_fill",
                old.map(|f| f.describe()).into(),
                fill.describe().into(),
            )
        };
        dispatch.run();
    }

    /// Revert the generated rect to the default luminance ramp.
    pub fn clear_auto_generate_rect_fill(&self) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            let Some(old) = inner.auto_generate_rect_fill.take() else {
                return;
            };
            inner.base.change(
                "auto_generate_rect_fill",
                old.describe().into(),
                Value::Null,
            )
        };
        dispatch.run();
    }

    /// The markup tag.
    pub fn tag(&self) -> &'static str {
        "mask"
    }

    /// This mask's attributes, serialized: id, the selected x/y/width/height
    /// values, then extra attributes.
    pub fn data(&self) -> String {
        let inner = self.inner.borrow();
        let mut attrs = AttrList::new();
        attrs.push("id", inner.base.id.as_str());
        push_xywh(&mut attrs, &inner.base, &inner.xywh);
        attrs.extend_extra(&inner.extra);
        attrs.render()
    }

    /// Full markup: `<mask {data}>`, the generated gradient and rect when
    /// rect generation is on, `</mask>`.
    pub fn html(&self) -> Option<String> {
        let mut out = attr::open_tag("mask", &self.data());
        {
            let inner = self.inner.borrow();
            if inner.auto_generate_rect {
                let ctx = inner.base.ctx.clone();
                let mask_id = inner.base.id.clone();
                let (fill, embedded) = match &inner.auto_generate_rect_fill {
                    Some(MaskFill::Value(value)) => (value.clone(), None),
                    Some(MaskFill::Gradient(gradient)) => (gradient.id_url(), gradient.html()),
                    Some(MaskFill::Colors(colors)) => {
                        let gradient = transient_gradient(&ctx, &mask_id, colors.iter().cloned());
                        (gradient.id_url(), gradient.html())
                    }
                    None => {
                        let colors = DEFAULT_RAMP.iter().map(|color| color.to_string());
                        let gradient = transient_gradient(&ctx, &mask_id, colors);
                        (gradient.id_url(), gradient.html())
                    }
                };
                if let Some(markup) = embedded {
                    out.push_str(&markup);
                }
                let (x, y, width, height) = effective_xywh(&inner.base, &inner.xywh);
                let rect = Shape::with_id(
                    &ctx,
                    Geometry::Rect {
                        x,
                        y,
                        width,
                        height,
                    },
                    Some(&format!("{mask_id}-rect")),
                )
                .with_fill(fill);
                if let Some(markup) = rect.html() {
                    out.push_str(&markup);
                }
            }
        }
        out.push_str("</mask>");
        Some(out)
    }
}

/// Gradient synthesized for one serialization pass. The derived id keeps
/// repeated reads identical; the registry slot dies with the handle.
fn transient_gradient(
    ctx: &SvgContext,
    mask_id: &str,
    colors: impl IntoIterator<Item = String>,
) -> Gradient {
    Gradient::new(ctx, Some(&format!("{mask_id}-fill")), false).with_stops(colors)
}

impl_element_api!(MaskDef);
impl_parent_slot!(MaskDef);
impl_extra_attr_api!(MaskDef);
impl_defs_routing_api!(MaskDef);
impl_xywh_api!(MaskDef, x => 0, y => 1, width => 2, height => 3);
impl_svg_node!(MaskDef);

// =============================================================================
// GenericDef
// =============================================================================

/// Handle to a free-form definition: any tag, raw inner markup.
///
/// The tag starts unset and is settable exactly once; until then the element
/// cannot render and `html()` is `None`.
#[derive(Clone)]
pub struct GenericDef {
    inner: Rc<RefCell<GenericDefInner>>,
}

pub(crate) struct GenericDefInner {
    pub(crate) base: ElementBase,
    tag: Option<String>,
    content: Option<String>,
    extra: ExtraAttrs,
    store_in_defs: bool,
}

impl RegisteredElement for GenericDefInner {
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

impl GenericDef {
    /// Create a definition with no tag yet.
    pub fn new(ctx: &SvgContext, id: Option<&str>) -> Self {
        let base = ElementBase::new(ctx, ElementKind::Generic, id);
        let inner = Rc::new(RefCell::new(GenericDefInner {
            base,
            tag: None,
            content: None,
            extra: ExtraAttrs::new(),
            store_in_defs: true,
        }));
        let cell: ElementCell = inner.clone();
        ctx.register(cell);
        Self { inner }
    }

    /// Set the tag during construction. Same write-once rule as
    /// [`set_tag`](GenericDef::set_tag).
    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        self.set_tag(tag);
        self
    }

    /// The markup tag, once set.
    pub fn tag(&self) -> Option<String> {
        self.inner.borrow().tag.clone()
    }

    /// Set the markup tag. The tag is write-once: a second assignment (or a
    /// blank one) is logged and ignored.
    pub fn set_tag(&self, tag: impl Into<String>) {
        let tag = tag.into();
        let tag = tag.trim();
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if tag.is_empty() {
                log::warn!("{} rejected a blank tag", inner.base.info());
                return;
            }
            if let Some(existing) = &inner.tag {
                log::warn!(
                    "{} already has tag `{existing}`, `{tag}` was not written",
                    inner.base.info()
                );
                return;
            }
            inner.tag = Some(tag.to_string());
            inner.base.change("tag", Value::Null, tag.into())
        };
        dispatch.run();
    }

    /// Raw inner markup, if set.
    pub fn content(&self) -> Option<String> {
        self.inner.borrow().content.clone()
    }

    /// Set the raw inner markup. Emitted verbatim between the tags.
    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.content.as_deref() == Some(content.as_str()) {
                return;
            }
            let old = inner.content.replace(content.clone());
            inner.base.change("content", old.into(), content.into())
        };
        dispatch.run();
    }

    /// Drop the inner markup, collapsing the element to a self-closing tag.
    pub fn clear_content(&self) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            let Some(old) = inner.content.take() else {
                return;
            };
            inner.base.change("content", old.into(), Value::Null)
        };
        dispatch.run();
    }

    /// Set the inner markup during construction.
    pub fn with_content(self, content: impl Into<String>) -> Self {
        self.inner.borrow_mut().content = Some(content.into());
        self
    }

    /// This definition's attributes, serialized: id, then extra attributes.
    pub fn data(&self) -> String {
        let inner = self.inner.borrow();
        let mut attrs = AttrList::new();
        attrs.push("id", inner.base.id.as_str());
        attrs.extend_extra(&inner.extra);
        attrs.render()
    }

    /// Full markup, or `None` (logged) while the tag is unset.
    pub fn html(&self) -> Option<String> {
        let inner = self.inner.borrow();
        let Some(tag) = &inner.tag else {
            log::error!("{} has no tag and cannot render", inner.base.info());
            return None;
        };
        let data = self.data();
        match &inner.content {
            Some(content) => {
                let mut out = attr::open_tag(tag, &data);
                out.push_str(content);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                Some(out)
            }
            None => Some(attr::self_closing_tag(tag, &data)),
        }
    }
}

impl_element_api!(GenericDef);
impl_parent_slot!(GenericDef);
impl_extra_attr_api!(GenericDef);
impl_defs_routing_api!(GenericDef);
impl_svg_node!(GenericDef);

// =============================================================================
// Definition
// =============================================================================

/// One entry of a document's definitions collection.
///
/// `Shape` admits ordinary shapes routed into the collection by the
/// `as_definition` flag of the document's shape helpers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Definition {
    Gradient(Gradient),
    Image(ImageDef),
    Mask(MaskDef),
    Generic(GenericDef),
    Shape(Shape),
}

macro_rules! each_definition {
    ($value:expr, $entry:pat => $body:expr) => {
        match $value {
            Definition::Gradient($entry) => $body,
            Definition::Image($entry) => $body,
            Definition::Mask($entry) => $body,
            Definition::Generic($entry) => $body,
            Definition::Shape($entry) => $body,
        }
    };
}

macro_rules! impl_definition_variants {
    ($( $variant:ident => $ty:ty ),+ $(,)?) => {
        paste::paste! {
            impl Definition {
                $(
                    #[doc = concat!("True for [`Definition::", stringify!($variant), "`].")]
                    pub fn [<is_ $variant:lower>](&self) -> bool {
                        matches!(self, Self::$variant(_))
                    }

                    #[doc = concat!(
                        "The inner [`", stringify!($ty),
                        "`] handle, for that variant."
                    )]
                    pub fn [<as_ $variant:lower>](&self) -> Option<&$ty> {
                        match self {
                            Self::$variant(entry) => Some(entry),
                            _ => None,
                        }
                    }
                )+
            }

            $(
                impl From<$ty> for Definition {
                    fn from(entry: $ty) -> Self {
                        Self::$variant(entry)
                    }
                }
            )+
        }
    };
}

impl_definition_variants! {
    Gradient => Gradient,
    Image => ImageDef,
    Mask => MaskDef,
    Generic => GenericDef,
    Shape => Shape,
}

impl Definition {
    /// Whether this entry serializes inside the document's `<defs>` block.
    pub fn store_in_defs(&self) -> bool {
        each_definition!(self, entry => entry.store_in_defs())
    }

    /// Route this entry into or out of the `<defs>` block.
    pub fn set_store_in_defs(&self, store: bool) {
        each_definition!(self, entry => entry.set_store_in_defs(store))
    }

    pub(crate) fn set_parent(&self, parent: Option<Weak<RefCell<AssetInner>>>) {
        each_definition!(self, entry => entry.set_parent(parent))
    }
}

impl SvgNode for Definition {
    fn info(&self) -> ElementInfo {
        each_definition!(self, entry => entry.info())
    }

    fn data(&self) -> String {
        each_definition!(self, entry => entry.data())
    }

    fn html(&self) -> Option<String> {
        each_definition!(self, entry => entry.html())
    }
}

// =============================================================================
// Tests
// =============================================================================
