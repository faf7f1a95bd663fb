//! Property descriptors.
//!
//! A [`Property`] is the declaration of one field: its JSON key, default,
//! custom handler and schema hints. Descriptors are built once when a type
//! declares its table and never change afterwards.

use crate::{FieldType, Handler};

use std::sync::Arc;

use serde_json::Value;

pub enum DefaultValue<T> {
    /// Prototype cloned into every new instance.
    Value(T),
    /// Factory called once per new instance.
    Factory(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> DefaultValue<T> {

    pub fn produce(&self) -> T {
        match self {
            DefaultValue::Value(value) => value.clone(),
            DefaultValue::Factory(factory) => factory(),
        }
    }

    pub fn prototype(&self) -> Option<&T> {
        match self {
            DefaultValue::Value(value) => Some(value),
            DefaultValue::Factory(_) => None,
        }
    }

}

impl<T: Clone> Clone for DefaultValue<T> {
    fn clone(&self) -> Self {
        match self {
            DefaultValue::Value(value) => DefaultValue::Value(value.clone()),
            DefaultValue::Factory(factory) => DefaultValue::Factory(factory.clone()),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DefaultValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultValue::Factory(_) => f.write_str("Factory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaHints {
    pub title: Option<String>,
    pub pattern: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub schema_ref: Option<String>,
    pub schema: Option<Value>,
    pub allow_none: bool,
    pub group: Option<String>,
}

impl Default for SchemaHints {
    fn default() -> Self {
        SchemaHints {
            title: None,
            pattern: None,
            format: None,
            description: None,
            schema_ref: None,
            schema: None,
            allow_none: true,
            group: None,
        }
    }
}

pub struct Property<T> {
    json: Option<String>,
    value_type: Option<FieldType>,
    default: Option<DefaultValue<T>>,
    handler: Option<Arc<dyn Handler<T>>>,
    hints: SchemaHints,
    enum_as_str: bool,
}

impl<T> Property<T> {

    pub fn new() -> Self {
        Property {
            json: None,
            value_type: None,
            default: None,
            handler: None,
            hints: SchemaHints::default(),
            enum_as_str: false,
        }
    }

    pub fn json(mut self, key: impl Into<String>) -> Self {
        self.json = Some(key.into());
        self
    }

    /// Overrides the field type derived from `T`.
    pub fn value_type(mut self, value_type: FieldType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn default(mut self, value: T) -> Self {
        self.default = Some(DefaultValue::Value(value));
        self
    }

    pub fn default_with<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Factory(Arc::new(factory)));
        self
    }

    pub fn handler(mut self, handler: impl Handler<T> + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn shared_handler(mut self, handler: Arc<dyn Handler<T>>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn enum_as_str(mut self, enum_as_str: bool) -> Self {
        self.enum_as_str = enum_as_str;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.hints.title = Some(title.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.hints.pattern = Some(pattern.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.hints.format = Some(format.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.hints.description = Some(description.into());
        self
    }

    pub fn schema_ref(mut self, schema_ref: impl Into<String>) -> Self {
        self.hints.schema_ref = Some(schema_ref.into());
        self
    }

    /// Replaces the derived schema fragment entirely.
    pub fn schema(mut self, schema: Value) -> Self {
        self.hints.schema = Some(schema);
        self
    }

    pub fn allow_none(mut self, allow_none: bool) -> Self {
        self.hints.allow_none = allow_none;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.hints.group = Some(group.into());
        self
    }

    pub fn json_key(&self) -> Option<&str> {
        self.json.as_deref()
    }

    pub fn declared_type(&self) -> Option<&FieldType> {
        self.value_type.as_ref()
    }

    pub fn default_value(&self) -> Option<&DefaultValue<T>> {
        self.default.as_ref()
    }

    pub fn custom_handler(&self) -> Option<&Arc<dyn Handler<T>>> {
        self.handler.as_ref()
    }

    pub fn hints(&self) -> &SchemaHints {
        &self.hints
    }

    pub fn is_enum_as_str(&self) -> bool {
        self.enum_as_str
    }

    pub(crate) fn into_parts(self) -> PropertyParts<T> {
        PropertyParts {
            json: self.json,
            value_type: self.value_type,
            default: self.default,
            handler: self.handler,
            hints: self.hints,
            enum_as_str: self.enum_as_str,
        }
    }

}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("json", &self.json)
            .field("value_type", &self.value_type)
            .field("has_default", &self.default.is_some())
            .field("has_handler", &self.handler.is_some())
            .field("hints", &self.hints)
            .field("enum_as_str", &self.enum_as_str)
            .finish()
    }
}

pub(crate) struct PropertyParts<T> {
    pub json: Option<String>,
    pub value_type: Option<FieldType>,
    pub default: Option<DefaultValue<T>>,
    pub handler: Option<Arc<dyn Handler<T>>>,
    pub hints: SchemaHints,
    pub enum_as_str: bool,
}
