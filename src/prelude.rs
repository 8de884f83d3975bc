//! Prelude module for common imports.
//!
//! ```
//! use livesvg::prelude::*;
//! ```

// Context and identity
pub use crate::context::{IdPolicy, SvgContext};

// Document root
pub use crate::asset::{GradientSpec, SvgAsset, SVG_NAMESPACE};

// Shapes and viewbox
pub use crate::geometry::{Geometry, Shape, DEFAULT_FILL};
pub use crate::viewbox::{ViewBox, DEFAULT_VIEWBOX};

// Definitions
pub use crate::defs::{Definition, GenericDef, ImageDef, IncludeXywh, MaskDef, MaskFill};
pub use crate::gradient::{Gradient, Offset, Stop, StopSpec, DEFAULT_RAMP, DEFAULT_STOP_COLOR};

// Elements and change notification
pub use crate::change::{ChangeEvent, ListenerId, Value};
pub use crate::element::{ElementInfo, ElementKind, InstanceId, SvgNode};

// Attribute serialization
pub use crate::attr::{fmt_number, url_ref, AttrList, AttrsExt, ExtraAttrs, MAX_DECIMALS};

// Canned documents
pub use crate::generate::{banded_rect, gradient_rect, masked_rect};

// Error
pub use crate::error::{SvgError, SvgResult};
