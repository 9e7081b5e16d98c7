//! wirescope — declarative schema serialization under named scopes
//!
//! This is the public meta-crate. Downstream users depend on **wirescope**
//! only; it re-exports the stable public API from `wirescope-core`.
//!
//! A schema declares models (ordered, typed fields) and scopes (named
//! projections built from composable patterns). A serializer bound to one
//! (model, scope) pair encodes domain objects to wire trees and decodes
//! wire trees back, aggregating every field-level failure into one report.

pub use wirescope_core as core;

pub use wirescope_core::{DEFAULT_SCOPE, Error, REF_KEY};

/// Crate version, for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Prelude
//

pub mod prelude {
    pub use wirescope_core::prelude::*;
}
