//! livesvg - Reactive in-memory SVG documents with unique ids and lazy markup
//!
//! ## Core Concepts
//!
//! **Shared handles**: every element type (`SvgAsset`, `Shape`, `Gradient`, ...)
//! is a cheaply clonable handle to single-threaded shared state; all clones
//! observe each other's mutations.
//!
//! **Identity**: a [`SvgContext`] owns the id registry. Every element receives
//! a unique instance number and an id, synthesized as `kind[instance]` unless
//! one is claimed explicitly. Renaming an element rewrites every live
//! `url(#id)` reference that points at it.
//!
//! **Change notification**: each tracked mutation fires at most one event to
//! the element's own listeners and bubbles to the owning document's listeners,
//! always naming the leaf element as its source.
//!
//! **Lazy markup**: nothing is serialized until `html()` is read; reading is
//! pure and repeatable.
//!
//! ## Modules
//! - `context`: the shared identity registry handle
//! - `asset`: the `<svg>` document root
//! - `geometry`: shape primitives (rect, circle, ellipse, line, polyline, polygon, path)
//! - `gradient`, `defs`: `<defs>`-scoped definitions referenced by URL
//! - `change`: change events, listeners, loosely typed values
//! - `generate`: canned document builders
//!
//! ## Usage
//!
//! ```
//! use livesvg::prelude::*;
//!
//! let ctx = SvgContext::default();
//! let asset = SvgAsset::new(&ctx, Some("banner"));
//! let gradient = asset.new_gradient(Some("fade"), false, ["skyblue", "white", "pink"]);
//! asset.new_rect(0.0, 0.0, 200.0, 100.0, gradient.id_url(), false);
//!
//! asset.on_change(|event| println!("{} changed {}", event.source, event.property));
//! gradient.set_sharp(true); // prints: gradient "fade" (#3) changed sharp
//!
//! let markup = asset.html().unwrap();
//! assert!(markup.contains("fill=\"url(#fade)\""));
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// The shared identity registry handle
pub mod context;

mod registry;

/// Shared element surface: ids, kinds, the `SvgNode` trait
pub mod element;

/// Change events and listener plumbing
pub mod change;

/// Attribute formatting and serialization
pub mod attr;

// =============================================================================
// Element types
// =============================================================================

/// The document viewbox
pub mod viewbox;

/// Shape primitives
pub mod geometry;

/// Linear and radial gradients
pub mod gradient;

/// `<defs>`-scoped definitions: images, masks, generic entries
pub mod defs;

/// The `<svg>` document root
pub mod asset;

/// Canned document builders
pub mod generate;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Context and identity
pub use context::{IdPolicy, SvgContext};

// Document root
pub use asset::{GradientSpec, SvgAsset, SVG_NAMESPACE};

// Shapes and definitions
pub use defs::{Definition, GenericDef, ImageDef, IncludeXywh, MaskDef, MaskFill};
pub use geometry::{Geometry, Shape};
pub use gradient::{Gradient, Offset, Stop, StopSpec};
pub use viewbox::ViewBox;

// Change notification
pub use change::{ChangeEvent, ListenerId, Value};
pub use element::{ElementInfo, ElementKind, InstanceId, SvgNode};

// Error types
pub use error::{SvgError, SvgResult};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use static_assertions::assert_not_impl_any;

    use crate::prelude::*;

    assert_not_impl_any!(SvgContext: Send, Sync);
    assert_not_impl_any!(SvgAsset: Send, Sync);
    assert_not_impl_any!(Shape: Send, Sync);
    assert_not_impl_any!(Gradient: Send, Sync);

    #[test]
    fn test_gradient_banner_end_to_end() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("banner"));
        let gradient = asset.new_gradient(Some("fade"), false, ["skyblue", "white", "pink"]);
        asset.new_rect(0.0, 0.0, 200.0, 100.0, gradient.id_url(), false);

        assert_eq!(
            asset.html().unwrap(),
            "<svg id=\"banner\" viewBox=\"0 0 200 100\" \
             xmlns=\"http://www.w3.org/2000/svg\">\
             <defs>\
             <linearGradient id=\"fade\">\
             <stop offset=\"0%\" stop-color=\"skyblue\" stop-opacity=\"1\"/>\
             <stop offset=\"50%\" stop-color=\"white\" stop-opacity=\"1\"/>\
             <stop offset=\"100%\" stop-color=\"pink\" stop-opacity=\"1\"/>\
             </linearGradient>\
             </defs>\
             <rect id=\"rect[4]\" x=\"0\" y=\"0\" width=\"200\" height=\"100\" \
             fill=\"url(#fade)\"/>\
             </svg>"
        );
    }

    #[test]
    fn test_rename_rewrites_every_consumer() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("banner"));
        let gradient = asset.new_gradient(Some("fade"), false, ["red", "blue"]);
        let rect = asset.new_rect(0.0, 0.0, 200.0, 100.0, gradient.id_url(), false);
        rect.set_stroke(gradient.id_url());
        let mask = MaskDef::new(&ctx, Some("veil"))
            .with_auto_generate_rect(true)
            .with_auto_generate_rect_fill(gradient.id_url());
        asset.add_definition(mask.clone().into());
        let halo = GenericDef::new(&ctx, Some("halo")).with_tag("filter");
        halo.set_attr("flood-color", gradient.id_url());
        asset.add_definition(halo.clone().into());

        gradient.set_id("dawn").unwrap();

        assert_eq!(gradient.id(), "dawn");
        assert_eq!(rect.fill().as_deref(), Some("url(#dawn)"));
        assert_eq!(rect.stroke().as_deref(), Some("url(#dawn)"));
        assert_eq!(halo.attr("flood-color").as_deref(), Some("url(#dawn)"));
        let html = asset.html().unwrap();
        assert!(html.contains("<linearGradient id=\"dawn\">"));
        assert!(!html.contains("fade"));
    }

    #[test]
    fn test_rename_rewrites_bubble_from_each_consumer() {
        let ctx = SvgContext::default();
        let asset = SvgAsset::new(&ctx, Some("banner"));
        let gradient = asset.new_gradient(Some("fade"), false, ["red", "blue"]);
        let rect = asset.new_rect(0.0, 0.0, 200.0, 100.0, gradient.id_url(), false);

        let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let seen = std::rc::Rc::clone(&events);
        asset.on_change(move |event| {
            seen.borrow_mut()
                .push((event.property, event.source.clone()));
        });

        gradient.set_id("dawn").unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "fill");
        assert_eq!(events[0].1.instance, rect.instance());
        assert_eq!(events[1].0, "id");
        assert_eq!(events[1].1.instance, gradient.instance());
    }

    #[test]
    fn test_cyclic_references_terminate() {
        let ctx = SvgContext::default();
        let a = GenericDef::new(&ctx, Some("a")).with_tag("pattern");
        let b = GenericDef::new(&ctx, Some("b")).with_tag("pattern");
        a.set_attr("href", b.id_url());
        b.set_attr("href", a.id_url());

        a.set_id("a2").unwrap();

        assert_eq!(b.attr("href").as_deref(), Some("url(#a2)"));
        assert_eq!(a.attr("href").as_deref(), Some("url(#b)"));
    }

    #[test]
    fn test_id_policy_modes() {
        let strict = SvgContext::new(IdPolicy::Strict);
        let first = Shape::with_id(&strict, Geometry::default_rect(), Some("r1"));
        let second = Shape::with_id(&strict, Geometry::default_rect(), Some("r1"));
        assert_eq!(first.id(), "r1");
        assert_ne!(second.id(), "r1");

        let lenient = SvgContext::new(IdPolicy::Lenient);
        let first = Shape::with_id(&lenient, Geometry::default_rect(), Some("r1"));
        let second = Shape::with_id(&lenient, Geometry::default_rect(), Some("r1"));
        assert_eq!(first.id(), "r1");
        assert_eq!(second.id(), "r1");
    }

    #[test]
    fn test_compact_reclaims_dropped_documents() {
        let ctx = SvgContext::default();
        let keeper = Shape::new(&ctx, Geometry::default_rect());
        {
            let asset = SvgAsset::new(&ctx, Some("scratch"));
            asset.default_rect(false);
            assert_eq!(ctx.live_element_count(), 4);
        }
        assert_eq!(ctx.live_element_count(), 1);

        let before = ctx.generation();
        assert_eq!(ctx.compact(), 3);
        assert!(ctx.generation() > before);
        assert_eq!(ctx.element_count(), 1);
        assert!(ctx.find_by_id(&keeper.id()).is_some());
        assert!(ctx.find_by_id("scratch").is_none());
    }
}
