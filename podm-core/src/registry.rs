//! Type identifier resolution for polymorphic decode.
//!
//! Encoded objects carry `"<namespace>.<TypeName>"`. The registry maps those
//! identifiers back to decoders. An explicit registry can be filled at startup
//! and handed to decode calls through [`Context`](crate::Context); without
//! one, decoding resolves against [`known_types`], which every type joins when
//! its property table is first built.

use crate::{AnyObject, Context, JsonObject, ResolveError, Result};

use std::collections::{HashMap, HashSet};
use std::sync::{LazyLock, PoisonError, RwLock};

use log::debug;
use serde_json::Value;

pub type DecodeFn = fn(Value, &Context) -> Result<Option<Box<dyn AnyObject>>>;

#[derive(Clone, Copy)]
pub struct Registration {
    namespace: &'static str,
    name: &'static str,
    decode: DecodeFn,
}

impl Registration {

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn decode(&self, state: Value, context: &Context) -> Result<Option<Box<dyn AnyObject>>> {
        (self.decode)(state, context)
    }

}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Registration>,
    namespaces: HashSet<&'static str>,
}

fn decode_boxed<O: JsonObject>(state: Value, context: &Context) -> Result<Option<Box<dyn AnyObject>>> {
    let object = O::from_dict_in(state, context)?;
    Ok(object.map(|o| Box::new(o) as Box<dyn AnyObject>))
}

impl TypeRegistry {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<O: JsonObject>(&mut self) -> &mut Self {
        let qualified = <O as JsonObject>::object_type_name();
        debug!("registering {qualified}");

        self.namespaces.insert(O::NAMESPACE);
        self.types.insert(qualified, Registration {
            namespace: O::NAMESPACE,
            name: O::TYPE_NAME,
            decode: decode_boxed::<O>,
        });
        self
    }

    pub fn with<O: JsonObject>(mut self) -> Self {
        self.register::<O>();
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolves `type_name`, which is either `"<namespace>.<Name>"` or a bare
    /// `"<Name>"` looked up in `fallback_namespace`.
    pub fn resolve(&self, type_name: &str, fallback_namespace: &str) -> Result<&Registration> {
        let (namespace, name) = match type_name.rfind('.') {
            Some(i) => (&type_name[..i], &type_name[i + 1..]),
            None => (fallback_namespace, type_name),
        };

        if !self.namespaces.contains(namespace) {
            return Err(ResolveError::NamespaceNotFound(namespace.to_string()).into());
        }

        self.types
            .get(&format!("{namespace}.{name}"))
            .ok_or_else(|| ResolveError::TypeNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }.into())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

}

static KNOWN: LazyLock<RwLock<TypeRegistry>> = LazyLock::new(|| RwLock::new(TypeRegistry::new()));

pub(crate) fn remember<O: JsonObject>() {
    let mut known = KNOWN.write().unwrap_or_else(PoisonError::into_inner);
    if !known.contains(&<O as JsonObject>::object_type_name()) {
        known.register::<O>();
    }
}

/// Resolves against the types whose property tables this process has built.
pub(crate) fn resolve_known(type_name: &str, fallback_namespace: &str) -> Result<Registration> {
    let known = KNOWN.read().unwrap_or_else(PoisonError::into_inner);
    known.resolve(type_name, fallback_namespace).copied()
}

/// Snapshot of every type this process has built a property table for.
pub fn known_types() -> TypeRegistry {
    KNOWN.read().unwrap_or_else(PoisonError::into_inner).clone()
}
