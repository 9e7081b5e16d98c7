use crate::{
    error::SchemaError,
    model::{FieldAccess, ModelSchema},
    pattern::{CandidateField, Pattern},
};
use derive_more::{Deref, IntoIterator};
use std::sync::{Arc, OnceLock};

///
/// ResolvedField
///
/// One surviving entry of a resolved scope: an index into the model's
/// field list (identity is a stable key, not a pointer), the wire name
/// after renames, and the direction permission after permission rules.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedField {
    pub field: usize,
    pub wire_name: String,
    pub access: FieldAccess,
}

///
/// ResolvedScope
///
/// The cached, concrete outcome of applying a scope's patterns to a
/// model: an ordered entry list covering exactly the surviving fields.
/// Wire output order always follows this order.
///

#[derive(Clone, Debug, Deref, Eq, IntoIterator, PartialEq)]
pub struct ResolvedScope {
    model: String,
    scope: String,
    #[deref]
    #[into_iterator(ref)]
    entries: Vec<ResolvedField>,
}

impl ResolvedScope {
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn entries(&self) -> &[ResolvedField] {
        &self.entries
    }

    /// Entry whose wire name matches, if it survived resolution.
    #[must_use]
    pub fn entry_by_wire_name(&self, wire_name: &str) -> Option<&ResolvedField> {
        self.entries.iter().find(|e| e.wire_name == wire_name)
    }
}

///
/// Scope
///
/// A named visibility context bound to one model: an ordered pattern
/// list plus a lazily-built, once-only resolution cache. Scopes own
/// their patterns but only reference the model they target (by name).
///

#[derive(Debug)]
pub struct Scope {
    name: String,
    model: String,
    patterns: Vec<Pattern>,
    resolved: OnceLock<Arc<ResolvedScope>>,
}

impl Scope {
    #[must_use]
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            patterns: Vec::new(),
            resolved: OnceLock::new(),
        }
    }

    /// Append a pattern; patterns apply in declaration order.
    #[must_use]
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Resolve this scope against its model, idempotent and cached.
    ///
    /// Resolution starts from the model's full ordered field list with
    /// default wire names and intrinsic permissions, then applies each
    /// pattern in sequence. Concurrent first callers may redundantly
    /// build; builds are pure functions of immutable schema, so both
    /// results are equivalent and the first publish wins.
    pub fn resolve(&self, model: &ModelSchema) -> Result<Arc<ResolvedScope>, SchemaError> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(Arc::clone(resolved));
        }

        let built = Arc::new(self.resolve_uncached(model)?);
        Ok(Arc::clone(self.resolved.get_or_init(|| built)))
    }

    fn resolve_uncached(&self, model: &ModelSchema) -> Result<ResolvedScope, SchemaError> {
        debug_assert_eq!(model.name(), self.model, "scope resolved against wrong model");

        for pattern in &self.patterns {
            pattern.check(model, &self.name)?;
        }

        let candidates: Vec<CandidateField> = model
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| CandidateField {
                name: field.name.clone(),
                index,
                wire_name: field.wire_name.clone(),
                access: field.access,
            })
            .collect();

        let survivors = self
            .patterns
            .iter()
            .fold(candidates, |acc, pattern| pattern.apply(acc));

        // Renames may collide; the wire map needs unique keys.
        for (i, entry) in survivors.iter().enumerate() {
            if survivors[..i].iter().any(|e| e.wire_name == entry.wire_name) {
                return Err(SchemaError::DuplicateWireName {
                    model: model.name().to_string(),
                    scope: self.name.clone(),
                    wire_name: entry.wire_name.clone(),
                });
            }
        }

        let entries = survivors
            .into_iter()
            .map(|c| ResolvedField {
                field: c.index,
                wire_name: c.wire_name,
                access: c.access,
            })
            .collect();

        Ok(ResolvedScope {
            model: self.model.clone(),
            scope: self.name.clone(),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, FieldKind};
    use proptest::prelude::*;

    fn user_model() -> ModelSchema {
        ModelSchema::build("User")
            .scalar("id", FieldKind::Uint)
            .scalar("name", FieldKind::Text)
            .scalar("email", FieldKind::Text)
            .finish()
            .expect("valid model should build")
    }

    #[test]
    fn resolution_is_deterministic_and_cached() {
        let model = user_model();
        let scope = Scope::new("public", "User").pattern(Pattern::include_only(&["id", "name"]));

        let first = scope.resolve(&model).expect("resolution should succeed");
        let second = scope.resolve(&model).expect("resolution should succeed");

        assert_eq!(first.entries(), second.entries());
        assert!(
            Arc::ptr_eq(&first, &second),
            "second resolve should return the cached instance"
        );

        let wire_names: Vec<&str> = first.iter().map(|e| e.wire_name.as_str()).collect();
        assert_eq!(wire_names, ["id", "name"]);
    }

    #[test]
    fn empty_pattern_list_exposes_full_field_list_in_model_order() {
        let model = user_model();
        let scope = Scope::new("detail", "User");

        let resolved = scope.resolve(&model).expect("resolution should succeed");
        let wire_names: Vec<&str> = resolved.iter().map(|e| e.wire_name.as_str()).collect();
        assert_eq!(wire_names, ["id", "name", "email"]);
    }

    #[test]
    fn unknown_pattern_field_is_a_configuration_error() {
        let model = user_model();
        let scope = Scope::new("broken", "User").pattern(Pattern::exclude(&["missing"]));

        let err = scope
            .resolve(&model)
            .expect_err("unknown field should fail resolution");
        assert!(matches!(err, SchemaError::UnknownField { ref field, .. } if field == "missing"));
    }

    #[test]
    fn colliding_renames_are_rejected() {
        let model = user_model();
        let scope = Scope::new("clash", "User").pattern(Pattern::rename("email", "name"));

        let err = scope
            .resolve(&model)
            .expect_err("wire-name collision should fail resolution");
        assert!(matches!(
            err,
            SchemaError::DuplicateWireName { ref wire_name, .. } if wire_name == "name"
        ));
    }

    #[test]
    fn field_level_wire_name_override_survives_resolution() {
        let model = ModelSchema::build("User")
            .scalar("id", FieldKind::Uint)
            .field(Field::new("email", FieldKind::Text).wire_name("contact"))
            .finish()
            .expect("valid model should build");

        let resolved = Scope::new("detail", "User")
            .resolve(&model)
            .expect("resolution should succeed");
        assert!(resolved.entry_by_wire_name("contact").is_some());
        assert!(resolved.entry_by_wire_name("email").is_none());
    }

    proptest! {
        // Re-resolving an unchanged scope always yields the same list.
        #[test]
        fn resolve_is_idempotent(subset in proptest::collection::vec(any::<bool>(), 3)) {
            let fields = ["id", "name", "email"];
            let kept: Vec<&str> = fields
                .iter()
                .zip(&subset)
                .filter_map(|(n, k)| k.then_some(*n))
                .collect();

            let model = user_model();
            let scope = Scope::new("p", "User").pattern(Pattern::include_only(&kept));
            let a = scope.resolve(&model).expect("resolution should succeed");

            let fresh = Scope::new("p", "User").pattern(Pattern::include_only(&kept));
            let b = fresh.resolve(&model).expect("resolution should succeed");

            prop_assert_eq!(a.entries(), b.entries());
        }
    }
}
