mod field;
mod model;

pub use field::{Field, FieldAccess, FieldKind};
pub use model::{DEFAULT_IDENTITY, ModelBuilder, ModelSchema};
