//! Canned document builders.
//!
//! Each function assembles a complete [`SvgAsset`] from a color list and
//! returns it; every element stays reachable through the asset's accessors
//! for further editing.

use crate::asset::SvgAsset;
use crate::context::SvgContext;
use crate::defs::MaskDef;
use crate::geometry::DEFAULT_FILL;
use crate::gradient::{Gradient, StopSpec};

/// A gradient-filled rectangle spanning the whole viewbox.
///
/// The document holds one gradient definition (linear, or radial with
/// `radial`) stopped with `colors`, and one rect whose fill references it by
/// URL.
pub fn gradient_rect<I, S>(ctx: &SvgContext, radial: bool, colors: I) -> SvgAsset
where
    I: IntoIterator<Item = S>,
    S: Into<StopSpec>,
{
    let asset = SvgAsset::new(ctx, None);
    let gradient = asset.new_gradient(None, radial, colors);
    let (x, y, width, height) = asset.view_box().values();
    asset.new_rect(x, y, width, height, gradient.id_url(), false);
    asset
}

/// Like [`gradient_rect`], but the gradient renders as hard color bands
/// instead of a smooth blend.
pub fn banded_rect<I, S>(ctx: &SvgContext, colors: I) -> SvgAsset
where
    I: IntoIterator<Item = S>,
    S: Into<StopSpec>,
{
    let asset = SvgAsset::new(ctx, None);
    let gradient = asset.add_gradient(
        Gradient::new(ctx, None, false)
            .with_stops(colors)
            .with_sharp(true),
    );
    let (x, y, width, height) = asset.view_box().values();
    asset.new_rect(x, y, width, height, gradient.id_url(), false);
    asset
}

/// A rectangle faded through a gradient mask.
///
/// The mask auto-generates its luminance rect at render time, filled by a
/// gradient built from `colors`; the visible rect wires it up through its
/// `mask` attribute.
pub fn masked_rect<I, S>(ctx: &SvgContext, colors: I) -> SvgAsset
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let asset = SvgAsset::new(ctx, None);
    let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
    let mask = MaskDef::new(ctx, None)
        .with_auto_generate_rect(true)
        .with_auto_generate_rect_fill(colors);
    asset.add_definition(mask.clone().into());
    let (x, y, width, height) = asset.view_box().values();
    let rect = asset.new_rect(x, y, width, height, DEFAULT_FILL, false);
    rect.set_attr("mask", mask.id_url());
    asset
}
