//! Core engine for wirescope: the generic value tree, field and model
//! schemas, visibility patterns and scopes, the encode/decode walk, and
//! the serializer register.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod model;
pub mod obs;
pub mod pattern;
pub mod register;
pub mod schema;
pub mod scope;
pub mod serializer;
pub mod validate;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Scope name a nested model falls back to when it has no scope of the
/// requested name. Overridable per schema via `SchemaBuilder::default_scope`.
pub const DEFAULT_SCOPE: &str = "default";

/// Wire key marking a reference stub.
///
/// A stub carries only this marker and the referenced object's identity;
/// it is the minimal representation substituted for a nested object when
/// recursion would otherwise cycle.
pub const REF_KEY: &str = "__ref__";

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, caches, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{Field, FieldAccess, FieldKind, ModelSchema},
        pattern::Pattern,
        register::Register,
        schema::{Schema, SchemaBuilder},
        scope::Scope,
        serializer::{DecodeMode, Serializer},
        validate::Validator,
        value::Value,
    };
}
