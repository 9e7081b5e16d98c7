use crate::{error::SchemaError, model::FieldAccess, model::ModelSchema};

///
/// CandidateField
///
/// Working row a pattern chain transforms during scope resolution: the
/// field's name and model index, its current wire name, and its current
/// direction permission.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CandidateField {
    pub name: String,
    pub index: usize,
    pub wire_name: String,
    pub access: FieldAccess,
}

///
/// Pattern
///
/// Composable, model-agnostic visibility rule. A closed variant set so
/// every rule kind is handled exhaustively at compile time. Rules are
/// pure and order-preserving; chains apply left to right. No rule ever
/// adds a field, so exclusion is final within one resolution pass.
///

#[derive(Clone, Debug)]
pub enum Pattern {
    /// Drop every field not named.
    IncludeOnly(Vec<String>),
    /// Drop the named fields.
    Exclude(Vec<String>),
    /// Rewrite one field's wire name; visibility is untouched.
    Rename { field: String, wire_name: String },
    /// Force the named fields writable (and readable stays as-is).
    RequireWritable(Vec<String>),
    /// Strip write permission from the named fields.
    MarkReadonly(Vec<String>),
    /// Ordered sub-chain; later rules override earlier ones.
    Chain(Vec<Pattern>),
}

impl Pattern {
    /// Shorthand for `IncludeOnly` from string slices.
    #[must_use]
    pub fn include_only(names: &[&str]) -> Self {
        Self::IncludeOnly(names.iter().map(ToString::to_string).collect())
    }

    /// Shorthand for `Exclude` from string slices.
    #[must_use]
    pub fn exclude(names: &[&str]) -> Self {
        Self::Exclude(names.iter().map(ToString::to_string).collect())
    }

    /// Shorthand for `Rename`.
    #[must_use]
    pub fn rename(field: impl Into<String>, wire_name: impl Into<String>) -> Self {
        Self::Rename {
            field: field.into(),
            wire_name: wire_name.into(),
        }
    }

    /// Shorthand for `RequireWritable` from string slices.
    #[must_use]
    pub fn require_writable(names: &[&str]) -> Self {
        Self::RequireWritable(names.iter().map(ToString::to_string).collect())
    }

    /// Shorthand for `MarkReadonly` from string slices.
    #[must_use]
    pub fn mark_readonly(names: &[&str]) -> Self {
        Self::MarkReadonly(names.iter().map(ToString::to_string).collect())
    }

    /// Apply this rule to the candidate list. Pure and order-preserving.
    #[must_use]
    pub fn apply(&self, candidates: Vec<CandidateField>) -> Vec<CandidateField> {
        match self {
            Self::IncludeOnly(names) => candidates
                .into_iter()
                .filter(|c| names.contains(&c.name))
                .collect(),

            Self::Exclude(names) => candidates
                .into_iter()
                .filter(|c| !names.contains(&c.name))
                .collect(),

            Self::Rename { field, wire_name } => candidates
                .into_iter()
                .map(|mut c| {
                    if c.name == *field {
                        c.wire_name.clone_from(wire_name);
                    }
                    c
                })
                .collect(),

            Self::RequireWritable(names) => candidates
                .into_iter()
                .map(|mut c| {
                    if names.contains(&c.name) {
                        c.access.writable = true;
                    }
                    c
                })
                .collect(),

            Self::MarkReadonly(names) => candidates
                .into_iter()
                .map(|mut c| {
                    if names.contains(&c.name) {
                        c.access.writable = false;
                    }
                    c
                })
                .collect(),

            Self::Chain(rules) => rules
                .iter()
                .fold(candidates, |acc, rule| rule.apply(acc)),
        }
    }

    /// Validate that every field name this rule (or sub-chain) mentions
    /// exists on the model. Caught at schema-build time, never at
    /// request time.
    pub fn check(&self, model: &ModelSchema, scope: &str) -> Result<(), SchemaError> {
        let unknown = |field: &str| SchemaError::UnknownField {
            model: model.name().to_string(),
            scope: scope.to_string(),
            field: field.to_string(),
        };

        match self {
            Self::IncludeOnly(names)
            | Self::Exclude(names)
            | Self::RequireWritable(names)
            | Self::MarkReadonly(names) => {
                for name in names {
                    if !model.has_field(name) {
                        return Err(unknown(name));
                    }
                }
                Ok(())
            }

            Self::Rename { field, .. } => {
                if model.has_field(field) {
                    Ok(())
                } else {
                    Err(unknown(field))
                }
            }

            Self::Chain(rules) => {
                for rule in rules {
                    rule.check(model, scope)?;
                }
                Ok(())
            }
        }
    }
}
