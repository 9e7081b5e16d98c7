use crate::{validate::Validator, value::Value};
use std::fmt;

///
/// FieldKind
///
/// Declared value shape of a field. Aligned with `Value` variants plus
/// nested-model references; collection cardinality is explicit (`many`
/// for nested relations, `List` for scalar sequences).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    Int,
    Uint,
    Float,
    Text,

    /// Ordered sequence of a scalar kind.
    List(Box<Self>),

    /// Reference to a nested model. `many` selects collection-valued
    /// relations, which serialize to an ordered sequence of the nested
    /// representation.
    Model { model: String, many: bool },
}

impl FieldKind {
    /// Convenience constructor for a singular nested relation.
    #[must_use]
    pub fn nested(model: impl Into<String>) -> Self {
        Self::Model {
            model: model.into(),
            many: false,
        }
    }

    /// Convenience constructor for a collection-valued nested relation.
    #[must_use]
    pub fn nested_many(model: impl Into<String>) -> Self {
        Self::Model {
            model: model.into(),
            many: true,
        }
    }

    /// Name of the referenced nested model, if any.
    #[must_use]
    pub fn nested_model(&self) -> Option<&str> {
        match self {
            Self::Model { model, .. } => Some(model),
            Self::List(inner) => inner.nested_model(),
            _ => None,
        }
    }

    /// Coerce a wire value into this kind's domain shape.
    ///
    /// `Null` passes for every kind: fields are nullable unless a
    /// validator forbids it. Integral kinds coerce across signedness
    /// when the value fits; `Float` widens from integers. Nested model
    /// kinds are handled by the serializer walk, never here.
    pub fn coerce(&self, value: &Value) -> Result<Value, String> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match (self, value) {
            (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::Uint, Value::Uint(_))
            | (Self::Float, Value::Float(_))
            | (Self::Text, Value::Text(_)) => Ok(value.clone()),

            (Self::Int, Value::Uint(u)) => i64::try_from(*u)
                .map(Value::Int)
                .map_err(|_| format!("value {u} does not fit in a signed integer")),

            (Self::Uint, Value::Int(i)) => u64::try_from(*i)
                .map(Value::Uint)
                .map_err(|_| format!("value {i} is not a valid unsigned integer")),

            #[expect(clippy::cast_precision_loss)]
            (Self::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
            #[expect(clippy::cast_precision_loss)]
            (Self::Float, Value::Uint(u)) => Ok(Value::Float(*u as f64)),

            (Self::List(inner), Value::List(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    out.push(
                        inner
                            .coerce(item)
                            .map_err(|reason| format!("item {i}: {reason}"))?,
                    );
                }
                Ok(Value::List(out))
            }

            (Self::Model { .. }, _) => {
                debug_assert!(false, "nested kinds are coerced by the serializer walk");
                Err(format!("expected nested {self} representation"))
            }

            _ => Err(format!("expected {self}, found {}", value.kind_label())),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Uint => write!(f, "uint"),
            Self::Float => write!(f, "float"),
            Self::Text => write!(f, "text"),
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Model { model, many: true } => write!(f, "[{model}]"),
            Self::Model { model, many: false } => write!(f, "{model}"),
        }
    }
}

///
/// FieldAccess
///
/// Intrinsic read/write permission of a field. Patterns rewrite the
/// write side per scope during resolution, in either direction:
/// `MarkReadonly` strips it, `RequireWritable` restores it.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldAccess {
    pub readable: bool,
    pub writable: bool,
}

impl FieldAccess {
    pub const READ_WRITE: Self = Self {
        readable: true,
        writable: true,
    };

    pub const READ_ONLY: Self = Self {
        readable: true,
        writable: false,
    };

    pub const WRITE_ONLY: Self = Self {
        readable: false,
        writable: true,
    };
}

impl Default for FieldAccess {
    fn default() -> Self {
        Self::READ_WRITE
    }
}

///
/// Field
///
/// Atomic typed descriptor: name, declared kind, intrinsic access,
/// optional decode default, validators, and the wire name patterns may
/// later override.
///

#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub wire_name: String,
    pub access: FieldAccess,
    pub default: Option<Value>,
    pub validators: Vec<Validator>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();

        Self {
            wire_name: name.clone(),
            name,
            kind,
            access: FieldAccess::default(),
            default: None,
            validators: Vec::new(),
        }
    }

    /// Override the default wire name (normally the field name).
    #[must_use]
    pub fn wire_name(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = wire_name.into();
        self
    }

    /// Set intrinsic access.
    #[must_use]
    pub const fn access(mut self, access: FieldAccess) -> Self {
        self.access = access;
        self
    }

    /// Mark the field read-only in every scope.
    #[must_use]
    pub const fn read_only(self) -> Self {
        self.access(FieldAccess::READ_ONLY)
    }

    /// Value substituted when the field is absent on a full decode.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Append a validator; validators run in declaration order.
    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Run every validator against a wire value, collecting failures.
    #[must_use]
    pub fn validate(&self, value: &Value) -> Vec<String> {
        self.validators
            .iter()
            .filter(|v| !v.check(value))
            .map(|v| v.message().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Validator;

    #[test]
    fn wire_name_defaults_to_field_name() {
        let field = Field::new("email", FieldKind::Text);
        assert_eq!(field.wire_name, "email");

        let renamed = Field::new("email", FieldKind::Text).wire_name("contact");
        assert_eq!(renamed.wire_name, "contact");
        assert_eq!(renamed.name, "email");
    }

    #[test]
    fn validators_run_in_order_and_collect_all_failures() {
        let field = Field::new("name", FieldKind::Text)
            .validator(Validator::non_empty())
            .validator(Validator::max_len(3));

        let messages = field.validate(&Value::Text("toolong".into()));
        assert_eq!(messages.len(), 1, "only the length validator should fail");
        assert!(messages[0].contains("at most 3"));

        let ok = field.validate(&Value::Text("ab".into()));
        assert!(ok.is_empty(), "a valid value should produce no messages");
    }

    #[test]
    fn nested_kind_reports_referenced_model() {
        assert_eq!(FieldKind::nested("Address").nested_model(), Some("Address"));
        assert_eq!(
            FieldKind::nested_many("Comment").nested_model(),
            Some("Comment")
        );
        assert_eq!(FieldKind::Text.nested_model(), None);
    }
}
