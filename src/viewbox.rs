//! The document viewbox: a registered element owning the `viewBox` rectangle
//! of its document, serialized as the `"x y width height"` attribute value.
//!
//! Field writes fire per-field changes; [`ViewBox::set_all`] batches the four
//! writes behind a single `"viewBox"` notification. XYWH definitions that
//! match the viewbox read these values live through their parent document.

use std::cell::RefCell;
use std::rc::Rc;

use crate::attr::{fmt_number, MAX_DECIMALS};
use crate::context::SvgContext;
use crate::element::{impl_element_api, impl_parent_slot, ElementBase, ElementKind};
use crate::registry::{ElementCell, RegisteredElement};

/// Default viewbox rectangle, shared with the shape defaults table.
pub const DEFAULT_VIEWBOX: (f64, f64, f64, f64) = (0.0, 0.0, 200.0, 100.0);

/// Handle to a viewbox element.
#[derive(Clone)]
pub struct ViewBox {
    inner: Rc<RefCell<ViewBoxInner>>,
}

pub(crate) struct ViewBoxInner {
    pub(crate) base: ElementBase,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl ViewBoxInner {
    fn attr_value(&self) -> String {
        format!(
            "{} {} {} {}",
            fmt_number(self.x, MAX_DECIMALS),
            fmt_number(self.y, MAX_DECIMALS),
            fmt_number(self.width, MAX_DECIMALS),
            fmt_number(self.height, MAX_DECIMALS),
        )
    }
}

impl RegisteredElement for ViewBoxInner {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }
}

impl ViewBox {
    /// Create a viewbox with the default `0 0 200 100` rectangle.
    pub fn new(ctx: &SvgContext) -> Self {
        let (x, y, width, height) = DEFAULT_VIEWBOX;
        Self::with_values(ctx, x, y, width, height)
    }

    /// Create a viewbox with explicit values.
    pub fn with_values(ctx: &SvgContext, x: f64, y: f64, width: f64, height: f64) -> Self {
        let base = ElementBase::new(ctx, ElementKind::ViewBox, None);
        let inner = Rc::new(RefCell::new(ViewBoxInner {
            base,
            x,
            y,
            width,
            height,
        }));
        let cell: ElementCell = inner.clone();
        ctx.register(cell);
        Self { inner }
    }

    /// The `"x y width height"` attribute value.
    pub fn attr_value(&self) -> String {
        self.inner.borrow().attr_value()
    }

    /// The four values as a tuple.
    pub fn values(&self) -> (f64, f64, f64, f64) {
        let inner = self.inner.borrow();
        (inner.x, inner.y, inner.width, inner.height)
    }

    /// Set all four values, firing a single `"viewBox"` change carrying the
    /// old and new attribute strings.
    pub fn set_all(&self, x: f64, y: f64, width: f64, height: f64) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.x == x && inner.y == y && inner.width == width && inner.height == height {
                return;
            }
            let old = inner.attr_value();
            inner.x = x;
            inner.y = y;
            inner.width = width;
            inner.height = height;
            let new = inner.attr_value();
            inner.base.change("viewBox", old.into(), new.into())
        };
        dispatch.run();
    }
}

macro_rules! impl_viewbox_fields {
    ($( $field:ident => $property:literal ),+ $(,)?) => {
        paste::paste! {
            impl ViewBox {
                $(
                    #[doc = concat!("Viewbox `", $property, "` value.")]
                    pub fn $field(&self) -> f64 {
                        self.inner.borrow().$field
                    }

                    #[doc = concat!("Set the viewbox `", $property, "` value.")]
                    pub fn [<set_ $field>](&self, value: f64) {
                        let dispatch = {
                            let mut inner = self.inner.borrow_mut();
                            if inner.$field == value {
                                return;
                            }
                            let old = inner.$field;
                            inner.$field = value;
                            inner.base.change($property, old.into(), value.into())
                        };
                        dispatch.run();
                    }
                )+
            }
        }
    };
}

impl_viewbox_fields! {
    x => "x",
    y => "y",
    width => "width",
    height => "height",
}

impl_element_api!(ViewBox);
impl_parent_slot!(ViewBox);

// =============================================================================
// Tests
// =============================================================================
