//! Linear and radial gradients with ordered stop lists.
//!
//! Offsets may be literal (`"25%"`) or `auto`; auto offsets are computed at
//! serialization time as `i/(n-1) * 100%` and the stored value stays `auto`.
//! In sharp mode the stored offsets are ignored entirely: every stop is
//! emitted twice, at `i/n * 100%` and `(i+1)/n * 100%`, producing hard color
//! bands instead of a smooth blend.
//!
//! Stop lists accept a flattened mix of inputs through [`StopSpec`]: bare
//! colors, `(color, opacity)` and `(color, opacity, offset)` tuples, prebuilt
//! [`Stop`]s, and `None` entries, which are dropped silently.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::attr::{self, fmt_number, AttrList, ExtraAttrs, MAX_DECIMALS};
use crate::change::Dispatch;
use crate::context::SvgContext;
use crate::element::{
    impl_defs_routing_api, impl_element_api, impl_extra_attr_api, impl_parent_slot, impl_svg_node,
    rewrite_extra_refs, ElementBase, ElementKind,
};
use crate::registry::{ElementCell, RegisteredElement};

/// Color of a stop created without one.
pub const DEFAULT_STOP_COLOR: &str = "#ffffff";

/// The white-to-black ramp used when a gradient is requested with no colors.
pub const DEFAULT_RAMP: [&str; 2] = ["#ffffff", "#000000"];

// =============================================================================
// Offset
// =============================================================================

/// A stop offset: a literal attribute value, or `auto` for positions computed
/// at serialization time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Offset {
    #[default]
    Auto,
    Fixed(String),
}

impl Offset {
    /// Parse an offset value; `"auto"` (trimmed, any case) becomes
    /// [`Offset::Auto`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Fixed(value.to_string())
        }
    }

    /// True for [`Offset::Auto`].
    #[inline]
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<&str> for Offset {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Offset {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<f64> for Offset {
    fn from(value: f64) -> Self {
        Self::Fixed(format!("{}%", fmt_number(value, MAX_DECIMALS)))
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(value) => f.write_str(value),
        }
    }
}

// =============================================================================
// Stop
// =============================================================================

/// One color/opacity/offset triple in a gradient's ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub color: String,
    pub opacity: f64,
    pub offset: Offset,
}

impl Stop {
    pub fn new(color: impl Into<String>, opacity: f64, offset: impl Into<Offset>) -> Self {
        Self {
            color: color.into(),
            opacity,
            offset: offset.into(),
        }
    }

    /// Fully opaque stop with an auto offset.
    pub fn colored(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            opacity: 1.0,
            offset: Offset::Auto,
        }
    }
}

impl Default for Stop {
    fn default() -> Self {
        Self {
            color: DEFAULT_STOP_COLOR.to_string(),
            opacity: 1.0,
            offset: Offset::Auto,
        }
    }
}

// =============================================================================
// StopSpec
// =============================================================================

/// One entry of a flattened stop-list input.
#[derive(Debug, Clone, PartialEq)]
pub enum StopSpec {
    /// Dropped silently when building the list.
    Skip,
    Color(String),
    ColorOpacity(String, f64),
    Full(String, f64, Offset),
    Prebuilt(Stop),
}

impl StopSpec {
    /// Normalize to a stop; [`StopSpec::Skip`] yields `None`.
    pub fn into_stop(self) -> Option<Stop> {
        match self {
            Self::Skip => None,
            Self::Color(color) => Some(Stop::colored(color)),
            Self::ColorOpacity(color, opacity) => Some(Stop::new(color, opacity, Offset::Auto)),
            Self::Full(color, opacity, offset) => Some(Stop::new(color, opacity, offset)),
            Self::Prebuilt(stop) => Some(stop),
        }
    }
}

impl From<&str> for StopSpec {
    fn from(color: &str) -> Self {
        Self::Color(color.to_string())
    }
}

impl From<String> for StopSpec {
    fn from(color: String) -> Self {
        Self::Color(color)
    }
}

impl<C: Into<String>> From<(C, f64)> for StopSpec {
    fn from((color, opacity): (C, f64)) -> Self {
        Self::ColorOpacity(color.into(), opacity)
    }
}

impl<C: Into<String>, O: Into<Offset>> From<(C, f64, O)> for StopSpec {
    fn from((color, opacity, offset): (C, f64, O)) -> Self {
        Self::Full(color.into(), opacity, offset.into())
    }
}

impl From<Stop> for StopSpec {
    fn from(stop: Stop) -> Self {
        Self::Prebuilt(stop)
    }
}

impl<T: Into<StopSpec>> From<Option<T>> for StopSpec {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(spec) => spec.into(),
            None => Self::Skip,
        }
    }
}

// =============================================================================
// Gradient
// =============================================================================

/// Handle to a gradient definition.
#[derive(Clone)]
pub struct Gradient {
    inner: Rc<RefCell<GradientInner>>,
}

pub(crate) struct GradientInner {
    pub(crate) base: ElementBase,
    radial: bool,
    sharp: bool,
    stops: SmallVec<[Stop; 4]>,
    x1: Option<String>,
    y1: Option<String>,
    x2: Option<String>,
    y2: Option<String>,
    cx: Option<String>,
    cy: Option<String>,
    r: Option<String>,
    fx: Option<String>,
    fy: Option<String>,
    fr: Option<String>,
    gradient_units: Option<String>,
    gradient_transform: Option<String>,
    spread_method: Option<String>,
    extra: ExtraAttrs,
    store_in_defs: bool,
}

impl RegisteredElement for GradientInner {
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

impl Gradient {
    /// Create a gradient with no stops. Claims `id` when given; a rejected id
    /// is logged and the generated one kept.
    pub fn new(ctx: &SvgContext, id: Option<&str>, radial: bool) -> Self {
        let base = ElementBase::new(ctx, ElementKind::Gradient, id);
        let inner = Rc::new(RefCell::new(GradientInner {
            base,
            radial,
            sharp: false,
            stops: SmallVec::new(),
            x1: None,
            y1: None,
            x2: None,
            y2: None,
            cx: None,
            cy: None,
            r: None,
            fx: None,
            fy: None,
            fr: None,
            gradient_units: None,
            gradient_transform: None,
            spread_method: None,
            extra: ExtraAttrs::new(),
            store_in_defs: true,
        }));
        let cell: ElementCell = inner.clone();
        ctx.register(cell);
        Self { inner }
    }

    /// A linear white-to-black ramp with a generated id.
    pub fn default_ramp(ctx: &SvgContext) -> Self {
        Self::new(ctx, None, false).with_stops(DEFAULT_RAMP)
    }

    /// Set the stop list during construction.
    pub fn with_stops<I, S>(self, stops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StopSpec>,
    {
        {
            let mut inner = self.inner.borrow_mut();
            inner.stops = collect_stops(stops);
        }
        self
    }

    /// Set sharp mode during construction.
    pub fn with_sharp(self, sharp: bool) -> Self {
        self.inner.borrow_mut().sharp = sharp;
        self
    }

    /// Whether this is a radial gradient.
    pub fn radial(&self) -> bool {
        self.inner.borrow().radial
    }

    /// Switch between linear and radial.
    pub fn set_radial(&self, radial: bool) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.radial == radial {
                return;
            }
            inner.radial = radial;
            inner.base.change("radial", (!radial).into(), radial.into())
        };
        dispatch.run();
    }

    /// Whether sharp (hard-band) rendering is on.
    pub fn sharp(&self) -> bool {
        self.inner.borrow().sharp
    }

    /// Switch sharp (hard-band) rendering.
    pub fn set_sharp(&self, sharp: bool) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.sharp == sharp {
                return;
            }
            inner.sharp = sharp;
            inner.base.change("sharp", (!sharp).into(), sharp.into())
        };
        dispatch.run();
    }

    /// The markup tag: `linearGradient` or `radialGradient`.
    pub fn tag(&self) -> &'static str {
        if self.inner.borrow().radial {
            "radialGradient"
        } else {
            "linearGradient"
        }
    }

    /// The stop list, in order.
    pub fn stops(&self) -> Vec<Stop> {
        self.inner.borrow().stops.to_vec()
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.inner.borrow().stops.len()
    }

    /// Replace the whole stop list from a flattened mix of inputs, firing a
    /// single `"stops"` change. `None` entries are dropped silently.
    pub fn set_stops<I, S>(&self, stops: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<StopSpec>,
    {
        let new = collect_stops(stops);
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.stops == new {
                return;
            }
            let old_len = inner.stops.len();
            inner.stops = new;
            let new_len = inner.stops.len();
            inner.base.change("stops", old_len.into(), new_len.into())
        };
        dispatch.run();
    }

    /// Overwrite the stop at `index`.
    ///
    /// `-1` broadcasts the stop to every existing index; anything below `-1`
    /// is logged and ignored. An index beyond the current length right-pads
    /// the list with default stops first.
    pub fn set_stop(&self, index: isize, spec: impl Into<StopSpec>) {
        let Some(stop) = spec.into().into_stop() else {
            return;
        };
        if index < -1 {
            log::warn!("stop index {index} is out of range");
            return;
        }
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            let old_len = inner.stops.len();
            if index == -1 {
                if inner.stops.iter().all(|existing| *existing == stop) {
                    return;
                }
                for slot in inner.stops.iter_mut() {
                    *slot = stop.clone();
                }
            } else {
                let index = index as usize;
                if index < old_len && inner.stops[index] == stop {
                    return;
                }
                if index >= old_len {
                    inner.stops.resize(index + 1, Stop::default());
                }
                inner.stops[index] = stop;
            }
            let new_len = inner.stops.len();
            inner.base.change("stops", old_len.into(), new_len.into())
        };
        dispatch.run();
    }

    /// Insert a stop at `index`, shifting later stops.
    ///
    /// `-1` inserts a copy before every existing stop; anything below `-1` is
    /// logged and ignored. An index beyond the current length right-pads with
    /// default stops and appends instead of shifting.
    pub fn insert_stop(&self, index: isize, spec: impl Into<StopSpec>) {
        let Some(stop) = spec.into().into_stop() else {
            return;
        };
        if index < -1 {
            log::warn!("stop index {index} is out of range");
            return;
        }
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            let old_len = inner.stops.len();
            if index == -1 {
                if old_len == 0 {
                    return;
                }
                for position in (0..old_len).rev() {
                    inner.stops.insert(position, stop.clone());
                }
            } else {
                let index = index as usize;
                if index >= old_len {
                    inner.stops.resize(index, Stop::default());
                    inner.stops.push(stop);
                } else {
                    inner.stops.insert(index, stop);
                }
            }
            let new_len = inner.stops.len();
            inner.base.change("stops", old_len.into(), new_len.into())
        };
        dispatch.run();
    }

    /// Drop every stop, firing a single `"stops"` change.
    pub fn clear_stops(&self) {
        let dispatch = {
            let mut inner = self.inner.borrow_mut();
            if inner.stops.is_empty() {
                return;
            }
            let old_len = inner.stops.len();
            inner.stops.clear();
            inner.base.change("stops", old_len.into(), 0usize.into())
        };
        dispatch.run();
    }

    /// This gradient's attributes, serialized: id, the coordinate set of its
    /// kind, shared gradient attributes, then extra attributes.
    pub fn data(&self) -> String {
        let inner = self.inner.borrow();
        let mut attrs = AttrList::new();
        attrs.push("id", inner.base.id.as_str());
        if inner.radial {
            attrs.push_opt("cx", inner.cx.clone());
            attrs.push_opt("cy", inner.cy.clone());
            attrs.push_opt("r", inner.r.clone());
            attrs.push_opt("fx", inner.fx.clone());
            attrs.push_opt("fy", inner.fy.clone());
            attrs.push_opt("fr", inner.fr.clone());
        } else {
            attrs.push_opt("x1", inner.x1.clone());
            attrs.push_opt("y1", inner.y1.clone());
            attrs.push_opt("x2", inner.x2.clone());
            attrs.push_opt("y2", inner.y2.clone());
        }
        attrs.push_opt("gradientUnits", inner.gradient_units.clone());
        attrs.push_opt("gradientTransform", inner.gradient_transform.clone());
        attrs.push_opt("spreadMethod", inner.spread_method.clone());
        attrs.extend_extra(&inner.extra);
        attrs.render()
    }

    /// Full markup: the gradient tag wrapping one `<stop/>` per entry, or two
    /// per entry in sharp mode.
    ///
    /// Serialization is a pure read; stored `auto` offsets stay `auto`.
    pub fn html(&self) -> Option<String> {
        let inner = self.inner.borrow();
        let tag = if inner.radial {
            "radialGradient"
        } else {
            "linearGradient"
        };
        let mut out = attr::open_tag(tag, &self.data());
        let count = inner.stops.len();
        if inner.sharp {
            for (i, stop) in inner.stops.iter().enumerate() {
                let band_start = i as f64 / count as f64 * 100.0;
                let band_end = (i + 1) as f64 / count as f64 * 100.0;
                push_stop(&mut out, &percent(band_start), stop);
                push_stop(&mut out, &percent(band_end), stop);
            }
        } else {
            for (i, stop) in inner.stops.iter().enumerate() {
                let offset = match &stop.offset {
                    Offset::Auto => percent(auto_offset(i, count)),
                    Offset::Fixed(value) => value.clone(),
                };
                push_stop(&mut out, &offset, stop);
            }
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        Some(out)
    }
}

impl_element_api!(Gradient);
impl_parent_slot!(Gradient);
impl_extra_attr_api!(Gradient);
impl_defs_routing_api!(Gradient);
impl_svg_node!(Gradient);

fn collect_stops<I, S>(stops: I) -> SmallVec<[Stop; 4]>
where
    I: IntoIterator<Item = S>,
    S: Into<StopSpec>,
{
    stops
        .into_iter()
        .filter_map(|spec| spec.into().into_stop())
        .collect()
}

/// Evenly spaced smooth-mode position: `i/(n-1) * 100`, degenerating to 0
/// for a single stop.
fn auto_offset(i: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        i as f64 / (count - 1) as f64 * 100.0
    }
}

fn percent(value: f64) -> String {
    format!("{}%", fmt_number(value, MAX_DECIMALS))
}

fn push_stop(out: &mut String, offset: &str, stop: &Stop) {
    let mut attrs = AttrList::new();
    attrs.push("offset", offset);
    attrs.push("stop-color", stop.color.clone());
    attrs.push("stop-opacity", fmt_number(stop.opacity, MAX_DECIMALS));
    out.push_str(&attr::self_closing_tag("stop", &attrs.render()));
}

// =============================================================================
// Coordinate and shared attributes
// =============================================================================

macro_rules! impl_gradient_attrs {
    ($( $field:ident => $attr:literal ),+ $(,)?) => {
        paste::paste! {
            impl Gradient {
                $(
                    #[doc = concat!("The `", $attr, "` attribute value, if set.")]
                    pub fn $field(&self) -> Option<String> {
                        self.inner.borrow().$field.clone()
                    }

                    #[doc = concat!("Set the `", $attr, "` attribute value.")]
                    pub fn [<set_ $field>](&self, value: impl Into<String>) {
                        let value = value.into();
                        let dispatch = {
                            let mut inner = self.inner.borrow_mut();
                            if inner.$field.as_deref() == Some(value.as_str()) {
                                return;
                            }
                            let old = inner.$field.replace(value.clone());
                            inner.base.change($attr, old.into(), value.into())
                        };
                        dispatch.run();
                    }
                )+
            }
        }
    };
}

impl_gradient_attrs! {
    x1 => "x1",
    y1 => "y1",
    x2 => "x2",
    y2 => "y2",
    cx => "cx",
    cy => "cy",
    r => "r",
    fx => "fx",
    fy => "fy",
    fr => "fr",
    gradient_units => "gradientUnits",
    gradient_transform => "gradientTransform",
    spread_method => "spreadMethod",
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::change::ChangeEvent;

    #[test]
    fn test_offset_parsing() {
        assert_eq!(Offset::parse("auto"), Offset::Auto);
        assert_eq!(Offset::parse("  AUTO "), Offset::Auto);
        assert_eq!(Offset::parse("25%"), Offset::Fixed("25%".to_string()));
        assert_eq!(Offset::from(33.333333), Offset::Fixed("33.333%".to_string()));
        assert_eq!(Offset::from(50.0).to_string(), "50%");
        assert_eq!(Offset::default(), Offset::Auto);
    }

    #[test]
    fn test_stop_spec_normalization() {
        assert_eq!(
            StopSpec::from("skyblue").into_stop(),
            Some(Stop::colored("skyblue"))
        );
        assert_eq!(
            StopSpec::from(("red", 0.5)).into_stop(),
            Some(Stop::new("red", 0.5, Offset::Auto))
        );
        assert_eq!(
            StopSpec::from(("red", 0.5, "10%")).into_stop(),
            Some(Stop::new("red", 0.5, Offset::Fixed("10%".to_string())))
        );
        assert_eq!(StopSpec::from(None::<&str>).into_stop(), None);
        assert_eq!(
            StopSpec::from(Some("pink")).into_stop(),
            Some(Stop::colored("pink"))
        );
    }

    #[test]
    fn test_auto_offsets_are_even() {
        let ctx = SvgContext::default();
        let gradient =
            Gradient::new(&ctx, Some("g1"), false).with_stops(["skyblue", "white", "pink"]);
        assert_eq!(
            gradient.html().unwrap(),
            "<linearGradient id=\"g1\">\
             <stop offset=\"0%\" stop-color=\"skyblue\" stop-opacity=\"1\"/>\
             <stop offset=\"50%\" stop-color=\"white\" stop-opacity=\"1\"/>\
             <stop offset=\"100%\" stop-color=\"pink\" stop-opacity=\"1\"/>\
             </linearGradient>"
        );
    }

    #[test]
    fn test_auto_offsets_round_to_three_decimals() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, Some("g1"), false)
            .with_stops(["a", "b", "c", "d"]);
        let html = gradient.html().unwrap();
        assert!(html.contains("offset=\"0%\""));
        assert!(html.contains("offset=\"33.333%\""));
        assert!(html.contains("offset=\"66.667%\""));
        assert!(html.contains("offset=\"100%\""));
    }

    #[test]
    fn test_single_auto_stop_sits_at_zero() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, Some("g1"), false).with_stops(["white"]);
        assert!(gradient.html().unwrap().contains("offset=\"0%\""));
    }

    #[test]
    fn test_fixed_offsets_emit_verbatim() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, Some("g1"), false)
            .with_stops([("red", 0.25, "12%"), ("blue", 1.0, "88%")]);
        let html = gradient.html().unwrap();
        assert!(html.contains("<stop offset=\"12%\" stop-color=\"red\" stop-opacity=\"0.25\"/>"));
        assert!(html.contains("<stop offset=\"88%\" stop-color=\"blue\" stop-opacity=\"1\"/>"));
    }

    #[test]
    fn test_sharp_mode_duplicates_every_stop() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, Some("g1"), false)
            .with_stops(["red", "green", "blue"])
            .with_sharp(true);
        let html = gradient.html().unwrap();
        assert_eq!(html.matches("<stop ").count(), 6);
        for expected in [
            "offset=\"0%\" stop-color=\"red\"",
            "offset=\"33.333%\" stop-color=\"red\"",
            "offset=\"33.333%\" stop-color=\"green\"",
            "offset=\"66.667%\" stop-color=\"green\"",
            "offset=\"66.667%\" stop-color=\"blue\"",
            "offset=\"100%\" stop-color=\"blue\"",
        ] {
            assert!(html.contains(expected), "missing {expected} in {html}");
        }
    }

    #[test]
    fn test_sharp_mode_ignores_stored_offsets() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, Some("g1"), false)
            .with_stops([("red", 1.0, "90%"), ("blue", 1.0, "95%")])
            .with_sharp(true);
        let html = gradient.html().unwrap();
        assert!(html.contains("offset=\"0%\""));
        assert!(html.contains("offset=\"50%\""));
        assert!(html.contains("offset=\"100%\""));
        assert!(!html.contains("offset=\"90%\""));
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, Some("g1"), false)
            .with_stops(["red", "white", "blue"])
            .with_sharp(true);
        let first = gradient.html().unwrap();
        let second = gradient.html().unwrap();
        assert_eq!(first, second);
        // Stored offsets survive serialization untouched.
        assert!(gradient.stops().iter().all(|stop| stop.offset.is_auto()));
    }

    #[test]
    fn test_radial_tag_and_coordinates() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, Some("g1"), true).with_stops(["red"]);
        gradient.set_cx("50%");
        gradient.set_r("75%");
        let html = gradient.html().unwrap();
        assert!(html.starts_with("<radialGradient id=\"g1\" cx=\"50%\" r=\"75%\">"));
        assert!(html.ends_with("</radialGradient>"));
        assert_eq!(gradient.tag(), "radialGradient");
    }

    #[test]
    fn test_linear_ignores_radial_coordinates() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, Some("g1"), false).with_stops(["red"]);
        gradient.set_cx("50%");
        gradient.set_x2("100%");
        let data = gradient.data();
        assert!(data.contains("x2=\"100%\""));
        assert!(!data.contains("cx"));
    }

    #[test]
    fn test_set_stops_drops_skips_silently() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false);
        gradient.set_stops([Some("red"), None, Some("blue")]);
        assert_eq!(gradient.stop_count(), 2);
        assert_eq!(gradient.stops()[1].color, "blue");
    }

    #[test]
    fn test_set_stops_fires_single_change() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false);
        let events: Rc<RefCell<Vec<ChangeEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&events);
        gradient.on_change(move |event| seen.borrow_mut().push(event.clone()));

        gradient.set_stops(["red", "blue"]);
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].property, "stops");

        // Rebuilding an identical list is silent.
        gradient.set_stops(["red", "blue"]);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_set_stop_broadcast() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false).with_stops(["red", "green", "blue"]);
        gradient.set_stop(-1, ("white", 0.5));
        let stops = gradient.stops();
        assert_eq!(stops.len(), 3);
        assert!(stops.iter().all(|stop| stop.color == "white" && stop.opacity == 0.5));
    }

    #[test]
    fn test_set_stop_below_minus_one_is_rejected() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false).with_stops(["red"]);
        gradient.set_stop(-2, "white");
        assert_eq!(gradient.stops()[0].color, "red");
    }

    #[test]
    fn test_set_stop_pads_beyond_length() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false).with_stops(["red"]);
        gradient.set_stop(3, "blue");
        let stops = gradient.stops();
        assert_eq!(stops.len(), 4);
        assert_eq!(stops[0].color, "red");
        assert_eq!(stops[1], Stop::default());
        assert_eq!(stops[2], Stop::default());
        assert_eq!(stops[3].color, "blue");
    }

    #[test]
    fn test_insert_stop_shifts_in_range() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false).with_stops(["red", "blue"]);
        gradient.insert_stop(1, "white");
        let colors: Vec<_> = gradient.stops().into_iter().map(|s| s.color).collect();
        assert_eq!(colors, ["red", "white", "blue"]);
    }

    #[test]
    fn test_insert_stop_pads_beyond_length() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false).with_stops(["red"]);
        gradient.insert_stop(2, "blue");
        let colors: Vec<_> = gradient.stops().into_iter().map(|s| s.color).collect();
        assert_eq!(colors, ["red", DEFAULT_STOP_COLOR, "blue"]);
    }

    #[test]
    fn test_insert_stop_broadcast_interleaves() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false).with_stops(["red", "blue"]);
        gradient.insert_stop(-1, "white");
        let colors: Vec<_> = gradient.stops().into_iter().map(|s| s.color).collect();
        assert_eq!(colors, ["white", "red", "white", "blue"]);
    }

    #[test]
    fn test_default_ramp() {
        let ctx = SvgContext::default();
        let gradient = Gradient::default_ramp(&ctx);
        let colors: Vec<_> = gradient.stops().into_iter().map(|s| s.color).collect();
        assert_eq!(colors, DEFAULT_RAMP);
        assert!(!gradient.radial());
        assert!(gradient.store_in_defs());
    }

    #[test]
    fn test_store_in_defs_defaults_on() {
        let ctx = SvgContext::default();
        let gradient = Gradient::new(&ctx, None, false);
        assert!(gradient.store_in_defs());
    }
}
