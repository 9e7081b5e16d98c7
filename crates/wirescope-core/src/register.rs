use crate::{error::Error, schema::Schema, serializer::Serializer};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

///
/// Register
///
/// Maps (model, scope name) to a ready serializer, building and caching
/// on first access. Process-scoped state with an explicit lifecycle:
/// construct one per schema (tests get isolated registers for free) and
/// `invalidate` when a model's schema is redefined.
///

#[derive(Debug)]
pub struct Register {
    schema: Arc<Schema>,
    serializers: RwLock<HashMap<(String, String), Arc<Serializer>>>,
}

impl Register {
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            serializers: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of cached serializers.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.serializers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Fetch (building and caching on first access) the serializer for
    /// a (model, scope) pair.
    ///
    /// Concurrent first callers for the same key may both build; builds
    /// are pure functions of the immutable schema, so the redundant
    /// result is equivalent and the first insert wins.
    pub fn get(&self, model: &str, scope: &str) -> Result<Arc<Serializer>, Error> {
        let key = (model.to_string(), scope.to_string());

        if let Some(serializer) = self
            .serializers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(serializer));
        }

        let built = Arc::new(Serializer::new(Arc::clone(&self.schema), model, scope)?);

        let mut cache = self
            .serializers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(built)))
    }

    /// Drop every cached serializer that references `model`, directly
    /// or through nested fields.
    pub fn invalidate(&self, model: &str) {
        let mut cache = self
            .serializers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        cache.retain(|_, serializer| !serializer.reachable_models().contains(model));
    }
}
