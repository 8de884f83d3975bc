//! Error types for livesvg.
//!
//! Only programming mistakes surface as errors: identity conflicts under the
//! strict policy and deliberately unimplemented paths. Recoverable validation
//! problems (bad shape-field lookups, rejected viewbox-synced writes, blank
//! gradient ids) are logged warnings and leave state unchanged instead.

use thiserror::Error;

use crate::element::InstanceId;

/// Errors that can occur while building or mutating an SVG document.
#[derive(Debug, Error)]
pub enum SvgError {
    /// Another live element already holds the requested id (strict policy).
    #[error("duplicate element id \"{id}\": held by element #{holder}, requested by element #{candidate}")]
    DuplicateId {
        /// The contested id.
        id: String,
        /// Instance number of the element currently holding the id.
        holder: InstanceId,
        /// Instance number of the element that requested it.
        candidate: InstanceId,
    },

    /// The operation is recognized but has no defined behavior yet.
    #[error("not implemented: {what}")]
    NotImplemented {
        /// Description of the unimplemented path.
        what: String,
    },
}

/// Result type alias for livesvg operations.
pub type SvgResult<T> = Result<T, SvgError>;

impl SvgError {
    /// Create a not-implemented error with a description.
    pub fn not_implemented(what: impl Into<String>) -> Self {
        Self::NotImplemented { what: what.into() }
    }
}
