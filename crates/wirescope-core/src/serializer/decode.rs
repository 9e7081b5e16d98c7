use crate::{
    REF_KEY,
    error::{DecodeError, FieldIssue, IssueKind},
    model::{Field, FieldKind},
    obs,
    serializer::{
        DecodeMode, Serializer,
        path::{PathSegment, render_path},
    },
    value::Value,
};

fn push_issue(
    issues: &mut Vec<FieldIssue>,
    path: &[PathSegment],
    kind: IssueKind,
    message: impl Into<String>,
) {
    issues.push(FieldIssue {
        path: render_path(path),
        kind,
        message: message.into(),
    });
}

impl Serializer {
    /// Decode a wire tree into a domain object.
    ///
    /// Error-aggregating: every writable field is attempted and every
    /// field-level failure is collected before the call fails; decode
    /// succeeds only with zero issues. On success the result is a map
    /// keyed by field name in resolved-scope order; in partial mode it
    /// contains only the fields present on the wire.
    pub fn decode(&self, wire: &Value, mode: DecodeMode) -> Result<Value, DecodeError> {
        obs::record_decode();

        let mut issues = Vec::new();
        let mut path = Vec::new();

        let entries = if wire.as_map().is_some() {
            self.decode_object(wire, mode, &mut path, &mut issues)
        } else {
            push_issue(
                &mut issues,
                &path,
                IssueKind::Type,
                format!("expected an object, found {}", wire.kind_label()),
            );
            Vec::new()
        };

        if issues.is_empty() {
            Ok(Value::Map(entries))
        } else {
            obs::record_decode_failure(issues.len());
            Err(DecodeError::new(issues))
        }
    }

    fn decode_object(
        &self,
        wire: &Value,
        mode: DecodeMode,
        path: &mut Vec<PathSegment>,
        issues: &mut Vec<FieldIssue>,
    ) -> Vec<(String, Value)> {
        let mut out = Vec::new();

        for entry in self.resolved().iter() {
            let field = &self.model().fields()[entry.field];
            path.push(PathSegment::Field(field.name.clone()));

            if entry.access.writable {
                match wire.get(&entry.wire_name) {
                    Some(value) => {
                        if let Some(decoded) = self.decode_field(field, value, path, issues) {
                            out.push((field.name.clone(), decoded));
                        }
                    }
                    None => match mode {
                        DecodeMode::Partial => {}
                        DecodeMode::Create => {
                            if let Some(default) = &field.default {
                                out.push((field.name.clone(), default.clone()));
                            } else {
                                push_issue(
                                    issues,
                                    path,
                                    IssueKind::MissingField,
                                    "required field is missing",
                                );
                            }
                        }
                    },
                }
            } else if wire.contains_key(&entry.wire_name) {
                // Read-only for this scope, yet present in the input.
                push_issue(
                    issues,
                    path,
                    IssueKind::ScopeViolation,
                    format!("field is read-only in scope '{}'", self.scope()),
                );
            }

            path.pop();
        }

        out
    }

    fn decode_field(
        &self,
        field: &Field,
        value: &Value,
        path: &mut Vec<PathSegment>,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<Value> {
        let failures = field.validate(value);
        if !failures.is_empty() {
            for message in failures {
                push_issue(issues, path, IssueKind::Validation, message);
            }
            return None;
        }

        if let FieldKind::Model { model, many } = &field.kind {
            self.decode_nested(model, *many, value, path, issues)
        } else {
            match field.kind.coerce(value) {
                Ok(decoded) => Some(decoded),
                Err(reason) => {
                    push_issue(issues, path, IssueKind::Type, reason);
                    None
                }
            }
        }
    }

    fn decode_nested(
        &self,
        model: &str,
        many: bool,
        value: &Value,
        path: &mut Vec<PathSegment>,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<Value> {
        if value.is_null() {
            return Some(Value::Null);
        }

        if many {
            let Some(items) = value.as_list() else {
                push_issue(
                    issues,
                    path,
                    IssueKind::Type,
                    format!("expected a list of nested {model} objects, found {}", value.kind_label()),
                );
                return None;
            };

            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(i));
                if let Some(decoded) = self.decode_related(model, item, path, issues) {
                    out.push(decoded);
                }
                path.pop();
            }

            Some(Value::List(out))
        } else {
            self.decode_related(model, value, path, issues)
        }
    }

    fn decode_related(
        &self,
        model: &str,
        value: &Value,
        path: &mut Vec<PathSegment>,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<Value> {
        let child = self.nested(model);

        // A stub is a reference assignment: pass it through once its
        // identity is confirmed present; no nested validation applies.
        if value.contains_key(REF_KEY) {
            if value.get(child.model().identity()).is_none() {
                push_issue(
                    issues,
                    path,
                    IssueKind::Type,
                    format!("reference stub is missing '{}'", child.model().identity()),
                );
                return None;
            }
            return Some(value.clone());
        }

        if value.as_map().is_none() {
            push_issue(
                issues,
                path,
                IssueKind::Type,
                format!("expected a nested {model} object, found {}", value.kind_label()),
            );
            return None;
        }

        // A nested payload replaces the nested object wholesale, so it
        // always decodes in create mode, even inside a partial update.
        let entries = child.decode_object(value, DecodeMode::Create, path, issues);
        Some(Value::Map(entries))
    }
}
