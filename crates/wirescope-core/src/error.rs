use derive_more::IntoIterator;
use std::{collections::BTreeMap, fmt};
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level error for the engine. Configuration problems are fatal at
/// schema-build time; register misses and aggregated decode failures are
/// per-request conditions.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Register(#[from] RegisterError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

///
/// SchemaError
///
/// Configuration errors raised while building a schema. Always fatal to
/// startup; a built `Schema` can no longer produce any of these at
/// request time.
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("model '{0}' declared more than once")]
    DuplicateModel(String),

    #[error("model '{model}' declares field '{field}' more than once")]
    DuplicateField { model: String, field: String },

    #[error("scope '{scope}' declared more than once for model '{model}'")]
    DuplicateScope { model: String, scope: String },

    #[error(
        "model '{model}' field '{field}' wraps a nested model in a list; declare a collection-valued model field instead"
    )]
    NestedModelInList { model: String, field: String },

    #[error("scope '{scope}' on model '{model}' references unknown field '{field}'")]
    UnknownField {
        model: String,
        scope: String,
        field: String,
    },

    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error("model '{model}' has no scope '{scope}' and no default scope to fall back to")]
    MissingScope { model: String, scope: String },

    #[error("model '{model}' is a nested target but lacks its identity field '{identity}'")]
    MissingIdentity { model: String, identity: String },

    #[error("scope '{scope}' on model '{model}' produces duplicate wire name '{wire_name}'")]
    DuplicateWireName {
        model: String,
        scope: String,
        wire_name: String,
    },
}

///
/// RegisterError
///

#[derive(Debug, ThisError)]
pub enum RegisterError {
    #[error("model '{0}' not registered")]
    UnknownModel(String),

    #[error("model '{model}' has no registered scope '{scope}'")]
    UnknownScope { model: String, scope: String },
}

///
/// IssueKind
/// Per-field decode failure classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IssueKind {
    /// Write attempted on a field that is read-only under the active scope.
    ScopeViolation,
    /// A field validator rejected the incoming value.
    Validation,
    /// Mandatory field absent with no default (create mode only).
    MissingField,
    /// Wire value cannot be coerced to the field's declared kind.
    Type,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ScopeViolation => "scope_violation",
            Self::Validation => "validation",
            Self::MissingField => "missing_field",
            Self::Type => "type",
        };
        write!(f, "{label}")
    }
}

///
/// FieldIssue
///
/// One aggregated decode failure: dot-joined field path (list indices
/// render as `[i]`), classification, and a human-readable reason.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldIssue {
    pub path: String,
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.path, self.kind, self.message)
    }
}

///
/// DecodeError
///
/// Aggregate of every field-level failure from one decode call. Decode
/// never fails fast: the full field walk completes and all issues are
/// returned together, ordered by resolved-scope walk order.
///

#[derive(Debug, IntoIterator)]
pub struct DecodeError {
    #[into_iterator(owned, ref)]
    pub issues: Vec<FieldIssue>,
}

impl std::error::Error for DecodeError {}

impl DecodeError {
    #[must_use]
    pub const fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues grouped by field path, in path order.
    #[must_use]
    pub fn by_path(&self) -> BTreeMap<String, Vec<String>> {
        let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for issue in &self.issues {
            out.entry(issue.path.clone())
                .or_default()
                .push(issue.message.clone());
        }

        out
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decode failed with {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {issue}")?;
        }

        Ok(())
    }
}
