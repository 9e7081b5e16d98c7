use crate::{
    error::SchemaError,
    model::field::{Field, FieldKind},
};

/// Identity field assumed when a model does not name one explicitly.
pub const DEFAULT_IDENTITY: &str = "id";

///
/// ModelSchema
///
/// Named, ordered collection of fields forming one schema. Insertion
/// order is the wire-default ordering when no scope reorders fields.
/// Models are immutable once built and shared by reference across every
/// scope and serializer that targets them.
///

#[derive(Clone, Debug)]
pub struct ModelSchema {
    name: String,
    identity: String,
    fields: Vec<Field>,
}

impl ModelSchema {
    /// Start building a model with the given stable type name.
    #[must_use]
    pub fn build(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            name: name.into(),
            identity: DEFAULT_IDENTITY.to_string(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the field carrying object identity (reference stubs and
    /// cycle keys are built from it).
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Whether the identity field is actually declared on this model.
    #[must_use]
    pub fn has_identity_field(&self) -> bool {
        self.has_field(&self.identity)
    }

    /// Names of every model referenced by a nested field, in field order.
    pub fn nested_models(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| f.kind.nested_model())
    }
}

///
/// ModelBuilder
///

#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    identity: String,
    fields: Vec<Field>,
}

impl ModelBuilder {
    /// Override the identity field name (defaults to `"id"`).
    #[must_use]
    pub fn identity(mut self, name: impl Into<String>) -> Self {
        self.identity = name.into();
        self
    }

    /// Append a field. Field order is wire-default order.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Shorthand for `field(Field::new(name, kind))`.
    #[must_use]
    pub fn scalar(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.field(Field::new(name, kind))
    }

    /// Finish the model, rejecting duplicate field names and nested
    /// kinds wrapped in `List` (`Model { many: true }` is the only
    /// collection form the serializer walk recurses through).
    pub fn finish(self) -> Result<ModelSchema, SchemaError> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    model: self.name,
                    field: field.name.clone(),
                });
            }

            if let FieldKind::List(inner) = &field.kind
                && inner.nested_model().is_some()
            {
                return Err(SchemaError::NestedModelInList {
                    model: self.name,
                    field: field.name.clone(),
                });
            }
        }

        Ok(ModelSchema {
            name: self.name,
            identity: self.identity,
            fields: self.fields,
        })
    }
}
