use crate::{
    DEFAULT_SCOPE,
    error::SchemaError,
    model::ModelSchema,
    scope::Scope,
};
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Arc,
};

///
/// Schema
///
/// The immutable model/scope universe. Built once via `SchemaBuilder`;
/// every configuration error surfaces during `build()`, so a `Schema`
/// in hand can be shared freely across concurrent encode/decode calls
/// with no locking.
///

#[derive(Debug)]
pub struct Schema {
    models: HashMap<String, Arc<ModelSchema>>,
    scopes: HashMap<(String, String), Arc<Scope>>,
    default_scope: String,
}

impl Schema {
    #[must_use]
    pub fn build() -> SchemaBuilder {
        SchemaBuilder {
            models: Vec::new(),
            scopes: Vec::new(),
            default_scope: DEFAULT_SCOPE.to_string(),
        }
    }

    #[must_use]
    pub fn default_scope(&self) -> &str {
        &self.default_scope
    }

    #[must_use]
    pub fn model(&self, name: &str) -> Option<&Arc<ModelSchema>> {
        self.models.get(name)
    }

    #[must_use]
    pub fn scope(&self, model: &str, scope: &str) -> Option<&Arc<Scope>> {
        self.scopes.get(&(model.to_string(), scope.to_string()))
    }

    /// Scope lookup with the nested-model fallback rule: the requested
    /// scope name if the model declares it, otherwise the schema's
    /// default scope.
    #[must_use]
    pub fn scope_or_default(&self, model: &str, scope: &str) -> Option<&Arc<Scope>> {
        self.scope(model, scope)
            .or_else(|| self.scope(model, &self.default_scope))
    }

    /// Every model reachable from `model` through nested fields,
    /// including itself. Drives register invalidation.
    #[must_use]
    pub fn reachable_models(&self, model: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([model.to_string()]);

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(m) = self.models.get(&name) {
                for nested in m.nested_models() {
                    if !seen.contains(nested) {
                        queue.push_back(nested.to_string());
                    }
                }
            }
        }

        seen
    }
}

///
/// SchemaBuilder
///

#[derive(Debug)]
pub struct SchemaBuilder {
    models: Vec<ModelSchema>,
    scopes: Vec<Scope>,
    default_scope: String,
}

impl SchemaBuilder {
    /// Override the fallback scope name (defaults to `"default"`).
    #[must_use]
    pub fn default_scope(mut self, name: impl Into<String>) -> Self {
        self.default_scope = name.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: ModelSchema) -> Self {
        self.models.push(model);
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Assemble the schema, validating the whole configuration eagerly:
    /// duplicate names, dangling references, pattern field names, wire
    /// name collisions, nested-scope fallback availability, and identity
    /// presence for nested targets. Every scope is resolved here, so
    /// request-time resolution is a cache hit.
    pub fn finish(self) -> Result<Schema, SchemaError> {
        let mut models: HashMap<String, Arc<ModelSchema>> = HashMap::new();
        for model in self.models {
            let name = model.name().to_string();
            if models.insert(name.clone(), Arc::new(model)).is_some() {
                return Err(SchemaError::DuplicateModel(name));
            }
        }

        // Nested references must land on declared models.
        for model in models.values() {
            for nested in model.nested_models() {
                if !models.contains_key(nested) {
                    return Err(SchemaError::UnknownModel(nested.to_string()));
                }
            }
        }

        let mut scopes: HashMap<(String, String), Arc<Scope>> = HashMap::new();
        for scope in self.scopes {
            if !models.contains_key(scope.model()) {
                return Err(SchemaError::UnknownModel(scope.model().to_string()));
            }

            let key = (scope.model().to_string(), scope.name().to_string());
            if scopes.contains_key(&key) {
                return Err(SchemaError::DuplicateScope {
                    model: key.0,
                    scope: key.1,
                });
            }
            scopes.insert(key, Arc::new(scope));
        }

        let schema = Schema {
            models,
            scopes,
            default_scope: self.default_scope,
        };

        schema.validate()?;
        Ok(schema)
    }
}

impl Schema {
    // Eagerly resolve every scope and enforce cross-model invariants.
    fn validate(&self) -> Result<(), SchemaError> {
        for scope in self.scopes.values() {
            let model = self
                .models
                .get(scope.model())
                .ok_or_else(|| SchemaError::UnknownModel(scope.model().to_string()))?;

            let resolved = scope.resolve(model)?;

            // Surviving nested fields need a scope to recurse into and
            // an identity field on the target so stubs can be formed.
            for entry in resolved.iter() {
                let field = &model.fields()[entry.field];
                let Some(nested) = field.kind.nested_model() else {
                    continue;
                };

                let nested_model = self
                    .models
                    .get(nested)
                    .ok_or_else(|| SchemaError::UnknownModel(nested.to_string()))?;

                if !nested_model.has_identity_field() {
                    return Err(SchemaError::MissingIdentity {
                        model: nested.to_string(),
                        identity: nested_model.identity().to_string(),
                    });
                }

                if self.scope_or_default(nested, scope.name()).is_none() {
                    return Err(SchemaError::MissingScope {
                        model: nested.to_string(),
                        scope: scope.name().to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
