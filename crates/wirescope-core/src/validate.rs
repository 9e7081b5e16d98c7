use crate::value::Value;
use std::{fmt, sync::Arc};

///
/// Validator
///
/// One predicate + message pair. Validators run on decode against the
/// incoming wire value, before coercion, and in declaration order; a
/// failing validator contributes its message to the aggregated decode
/// report instead of aborting the walk.
///

#[derive(Clone)]
pub struct Validator {
    message: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Validator {
    /// Build a validator from an arbitrary predicate.
    pub fn new(
        message: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            check: Arc::new(check),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true when the value passes.
    #[must_use]
    pub fn check(&self, value: &Value) -> bool {
        (self.check)(value)
    }

    ///
    /// BUILTINS
    ///
    /// Builtins treat `Null` and mismatched variants as passing; kind
    /// coercion reports those separately as type issues.
    ///

    /// Rejects empty text, lists, and maps.
    #[must_use]
    pub fn non_empty() -> Self {
        Self::new("must not be empty", |value| match value {
            Value::Text(s) => !s.is_empty(),
            Value::List(xs) => !xs.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            _ => true,
        })
    }

    /// Minimum length for text and lists.
    #[must_use]
    pub fn min_len(min: usize) -> Self {
        Self::new(format!("must have at least {min} item(s)"), move |value| {
            match value {
                Value::Text(s) => s.chars().count() >= min,
                Value::List(xs) => xs.len() >= min,
                _ => true,
            }
        })
    }

    /// Maximum length for text and lists.
    #[must_use]
    pub fn max_len(max: usize) -> Self {
        Self::new(format!("must have at most {max} item(s)"), move |value| {
            match value {
                Value::Text(s) => s.chars().count() <= max,
                Value::List(xs) => xs.len() <= max,
                _ => true,
            }
        })
    }

    /// Inclusive numeric range over integral values.
    #[must_use]
    pub fn range(min: i64, max: i64) -> Self {
        Self::new(format!("must be between {min} and {max}"), move |value| {
            value.as_i64().is_none_or(|n| n >= min && n <= max)
        })
    }

    /// Text value must match one of the allowed alternatives.
    #[must_use]
    pub fn one_of(allowed: &[&str]) -> Self {
        let allowed: Vec<String> = allowed.iter().map(ToString::to_string).collect();

        Self::new(
            format!("must be one of: {}", allowed.join(", ")),
            move |value| {
                value
                    .as_text()
                    .is_none_or(|s| allowed.iter().any(|a| a == s))
            },
        )
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_rejects_empty_collections_only() {
        let v = Validator::non_empty();
        assert!(!v.check(&Value::Text(String::new())));
        assert!(!v.check(&Value::List(vec![])));
        assert!(v.check(&Value::Text("x".into())));
        assert!(v.check(&Value::Null), "null is a type concern, not length");
    }

    #[test]
    fn range_checks_integral_values_inclusively() {
        let v = Validator::range(1, 10);
        assert!(v.check(&Value::Int(1)));
        assert!(v.check(&Value::Uint(10)));
        assert!(!v.check(&Value::Int(0)));
        assert!(!v.check(&Value::Uint(11)));
        assert!(v.check(&Value::Text("not a number".into())));
    }

    #[test]
    fn one_of_matches_text_alternatives() {
        let v = Validator::one_of(&["red", "green"]);
        assert!(v.check(&Value::Text("red".into())));
        assert!(!v.check(&Value::Text("blue".into())));
    }
}
