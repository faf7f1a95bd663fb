use crate::{NoopProcessor, Processor, Registration, Result, TypeRegistry, registry};

use std::sync::Arc;

/// Configuration shared by encode, decode and parse calls.
///
/// Defaults to [`NoopProcessor`] and no explicit registry: tagged data then
/// resolves against [`known_types`](crate::known_types), so anything this
/// process has encoded or declared decodes back. An explicit registry
/// restricts resolution to the types it holds.
#[derive(Clone)]
pub struct Context {
    processor: Arc<dyn Processor>,
    registry: Option<Arc<TypeRegistry>>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            processor: Arc::new(NoopProcessor),
            registry: None,
        }
    }
}

impl Context {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processor = Arc::new(processor);
        self
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    pub fn with_shared_registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn processor(&self) -> &dyn Processor {
        &*self.processor
    }

    /// The explicit registry, if one was given.
    pub fn registry(&self) -> Option<&TypeRegistry> {
        self.registry.as_deref()
    }

    pub fn resolve(&self, type_name: &str, fallback_namespace: &str) -> Result<Registration> {
        match &self.registry {
            Some(registry) => registry.resolve(type_name, fallback_namespace).copied(),
            None => registry::resolve_known(type_name, fallback_namespace),
        }
    }

}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
