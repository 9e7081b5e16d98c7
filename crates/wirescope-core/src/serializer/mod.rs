mod decode;
mod encode;
mod path;


use crate::{
    error::{Error, RegisterError},
    model::ModelSchema,
    schema::Schema,
    scope::ResolvedScope,
    value::Value,
};
use std::sync::Arc;

///
/// DecodeMode
///
/// Full (create) decode applies defaults and reports missing mandatory
/// fields; partial (update) decode simply omits fields absent from the
/// wire input.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DecodeMode {
    #[default]
    Create,
    Partial,
}

///
/// Serializer
///
/// The engine, bound to exactly one (model, scope) pair. Stateless
/// across invocations: per-call state (the in-progress cycle set, the
/// aggregated issue list) lives on the call stack, so any number of
/// encode/decode calls may run concurrently against one instance.
///

#[derive(Debug)]
pub struct Serializer {
    schema: Arc<Schema>,
    model: Arc<ModelSchema>,
    resolved: Arc<ResolvedScope>,
    scope_name: String,
}

impl Serializer {
    /// Bind a serializer to a registered (model, scope) pair.
    ///
    /// Unlike nested recursion, the top-level lookup does not fall back
    /// to the default scope: asking for an unregistered scope is a
    /// caller error.
    pub fn new(schema: Arc<Schema>, model: &str, scope: &str) -> Result<Self, Error> {
        let model_schema = schema
            .model(model)
            .ok_or_else(|| RegisterError::UnknownModel(model.to_string()))?
            .clone();

        let scope_def = schema
            .scope(model, scope)
            .ok_or_else(|| RegisterError::UnknownScope {
                model: model.to_string(),
                scope: scope.to_string(),
            })?
            .clone();

        let resolved = scope_def.resolve(&model_schema)?;

        Ok(Self {
            schema,
            model: model_schema,
            resolved,
            scope_name: scope_def.name().to_string(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &ModelSchema {
        &self.model
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope_name
    }

    #[must_use]
    pub fn resolved(&self) -> &ResolvedScope {
        &self.resolved
    }

    /// Names of every model this serializer may touch while recursing.
    #[must_use]
    pub fn reachable_models(&self) -> std::collections::HashSet<String> {
        self.schema.reachable_models(self.model.name())
    }

    /// Child serializer for a nested model under this serializer's
    /// logical scope name, falling back to the schema default scope.
    ///
    /// Schema build validated every reachable (model, scope) pair, so a
    /// miss here is a broken schema invariant, not a request error.
    pub(crate) fn nested(&self, model: &str) -> Self {
        let model_schema = self
            .schema
            .model(model)
            .expect("schema invariant: nested model is registered");

        let scope_def = self
            .schema
            .scope_or_default(model, &self.scope_name)
            .expect("schema invariant: nested scope or default is registered");

        let resolved = scope_def
            .resolve(model_schema)
            .expect("schema invariant: registered scopes resolve");

        Self {
            schema: Arc::clone(&self.schema),
            model: Arc::clone(model_schema),
            resolved,
            scope_name: scope_def.name().to_string(),
        }
    }

    /// (model name, rendered identity) pair for cycle tracking, if the
    /// object carries a scalar identity value.
    pub(crate) fn identity_pair(&self, object: &Value) -> Option<(String, String)> {
        let id = object.get(self.model.identity())?;
        let key = id.identity_key()?;

        Some((self.model.name().to_string(), key))
    }
}
