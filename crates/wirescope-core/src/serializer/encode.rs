use crate::{REF_KEY, model::FieldKind, obs, serializer::Serializer, value::Value};
use std::collections::HashSet;

impl Serializer {
    /// Encode a domain object into its wire representation.
    ///
    /// Total: reading a well-typed domain object is infallible, and a
    /// structurally malformed one (a non-object top level, or a nested
    /// field holding something other than null, an object, or a list of
    /// objects) is a programmer error reported by panicking. Output
    /// entries follow resolved-scope order, keyed by wire name; only
    /// readable fields appear. Cycles collapse to reference stubs.
    #[must_use]
    pub fn encode(&self, object: &Value) -> Value {
        obs::record_encode();

        assert!(
            object.as_map().is_some(),
            "malformed domain object: expected a {} object, found {}",
            self.model().name(),
            object.kind_label(),
        );

        // Per-call cycle state, threaded down explicitly and discarded
        // afterward; never shared across calls.
        let mut in_progress: HashSet<(String, String)> = HashSet::new();
        self.encode_object(object, &mut in_progress)
    }

    fn encode_object(
        &self,
        object: &Value,
        in_progress: &mut HashSet<(String, String)>,
    ) -> Value {
        let identity = self.identity_pair(object);
        if let Some(pair) = &identity {
            in_progress.insert(pair.clone());
        }

        let mut entries = Vec::with_capacity(self.resolved().len());
        for entry in self.resolved().iter() {
            if !entry.access.readable {
                continue;
            }

            let field = &self.model().fields()[entry.field];
            let raw = object.get(&field.name).cloned().unwrap_or(Value::Null);

            let encoded = if let FieldKind::Model { model, many } = &field.kind {
                self.encode_nested(&field.name, model, *many, &raw, in_progress)
            } else {
                raw
            };

            entries.push((entry.wire_name.clone(), encoded));
        }

        // Remove on exit: only ancestors still in progress count as
        // cycles; sibling references to the same object stay full.
        if let Some(pair) = identity {
            in_progress.remove(&pair);
        }

        Value::Map(entries)
    }

    fn encode_nested(
        &self,
        field_name: &str,
        model: &str,
        many: bool,
        value: &Value,
        in_progress: &mut HashSet<(String, String)>,
    ) -> Value {
        match (many, value) {
            (_, Value::Null) => Value::Null,

            (false, Value::Map(_)) => self.encode_related(model, value, in_progress),

            (true, Value::List(items)) => Value::List(
                items
                    .iter()
                    .map(|item| {
                        assert!(
                            item.as_map().is_some(),
                            "malformed domain object: item of '{}.{field_name}' is not an object",
                            self.model().name(),
                        );
                        self.encode_related(model, item, in_progress)
                    })
                    .collect(),
            ),

            _ => panic!(
                "malformed domain object: field '{}.{field_name}' expected {}, found {}",
                self.model().name(),
                if many { "a list of objects" } else { "an object" },
                value.kind_label(),
            ),
        }
    }

    fn encode_related(
        &self,
        model: &str,
        value: &Value,
        in_progress: &mut HashSet<(String, String)>,
    ) -> Value {
        // A domain value that is already a stub passes through verbatim.
        if value.contains_key(REF_KEY) {
            return value.clone();
        }

        let child = self.nested(model);
        if let Some(pair) = child.identity_pair(value)
            && in_progress.contains(&pair)
        {
            return child.stub(value);
        }

        child.encode_object(value, in_progress)
    }

    /// Minimal identity-only representation substituted for a nested
    /// object to break a cycle.
    fn stub(&self, object: &Value) -> Value {
        let id = object
            .get(self.model().identity())
            .cloned()
            .unwrap_or(Value::Null);

        Value::Map(vec![
            (REF_KEY.to_string(), Value::Text(self.model().name().to_string())),
            (self.model().identity().to_string(), id),
        ])
    }
}
