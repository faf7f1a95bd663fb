//! Property tables and the per-type table cache.
//!
//! A type declares its properties once through [`TableBuilder`]; the
//! resulting [`PropertyTable`] is built on first use and kept for the life of
//! the process. Embedded base objects contribute their own tables first, and
//! a property redeclared by the embedding type replaces the inherited entry in
//! place.

use crate::{
    Conversion, DefaultValue, Error, FieldType, Handler, JsonObject, Property, PropertyValue,
    Result, SchemaGenerator, SchemaHints,
};

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use log::{debug, trace};
use serde_json::Value;

pub(crate) trait FieldBinding<O>: Send + Sync {

    fn get(&self, object: &O, conv: &Conversion<'_>) -> Result<Value>;

    /// Returns whether the value was stored.
    fn set(&self, object: &mut O, value: Value, conv: &Conversion<'_>) -> Result<bool>;

    fn default_json(&self, conv: &Conversion<'_>) -> Result<Option<Value>>;

}

struct ValueCodec<T> {
    to_json: fn(&T, &Conversion<'_>) -> Result<Value>,
    from_json: fn(Value, &Conversion<'_>) -> Result<Option<T>>,
}

enum Strategy<T> {
    Custom(Arc<dyn Handler<T>>),
    Generic(ValueCodec<T>),
}

struct Typed<O, T> {
    getter: fn(&O) -> &T,
    setter: fn(&mut O, T),
    default: Option<DefaultValue<T>>,
    strategy: Strategy<T>,
}

impl<O, T> Typed<O, T> {

    fn encode(&self, value: &T, conv: &Conversion<'_>) -> Result<Value> {
        match &self.strategy {
            Strategy::Custom(handler) => Ok(handler.encode(value)),
            Strategy::Generic(codec) => (codec.to_json)(value, conv),
        }
    }

}

impl<O, T> FieldBinding<O> for Typed<O, T>
where
    T: Clone + Send + Sync + 'static,
{

    fn get(&self, object: &O, conv: &Conversion<'_>) -> Result<Value> {
        self.encode((self.getter)(object), conv)
    }

    fn set(&self, object: &mut O, value: Value, conv: &Conversion<'_>) -> Result<bool> {
        let decoded = match &self.strategy {
            Strategy::Custom(handler) => handler.decode(value),
            Strategy::Generic(codec) => (codec.from_json)(value, conv)?,
        };

        match decoded {
            Some(value) => {
                (self.setter)(object, value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn default_json(&self, conv: &Conversion<'_>) -> Result<Option<Value>> {
        match self.default.as_ref().and_then(DefaultValue::prototype) {
            Some(prototype) => self.encode(prototype, conv).map(Some),
            None => Ok(None),
        }
    }

}

// Binding of a base object's property, reached through the embedding field.
struct Lifted<O, B> {
    inner: Arc<dyn FieldBinding<B>>,
    base: fn(&O) -> &B,
    base_mut: fn(&mut O) -> &mut B,
}

impl<O, B> FieldBinding<O> for Lifted<O, B>
where
    B: 'static,
{

    fn get(&self, object: &O, conv: &Conversion<'_>) -> Result<Value> {
        self.inner.get((self.base)(object), conv)
    }

    fn set(&self, object: &mut O, value: Value, conv: &Conversion<'_>) -> Result<bool> {
        self.inner.set((self.base_mut)(object), value, conv)
    }

    fn default_json(&self, conv: &Conversion<'_>) -> Result<Option<Value>> {
        self.inner.default_json(conv)
    }

}

/// Binding of one declared property to its owning type.
pub struct PropertyHandler<O> {
    name: &'static str,
    declared_by: &'static str,
    json: String,
    field_type: FieldType,
    hints: SchemaHints,
    enum_as_str: bool,
    custom_handler: bool,
    custom_getter: bool,
    custom_setter: bool,
    binding: Arc<dyn FieldBinding<O>>,
}

impl<O> PropertyHandler<O> {

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the type whose declaration produced this entry.
    pub fn declared_by(&self) -> &'static str {
        self.declared_by
    }

    pub fn json(&self) -> &str {
        &self.json
    }

    pub fn field_name(&self) -> &'static str {
        self.name
    }

    pub fn getter_name(&self) -> String {
        format!("get_{}", self.name)
    }

    pub fn setter_name(&self) -> String {
        format!("set_{}", self.name)
    }

    pub fn has_custom_getter(&self) -> bool {
        self.custom_getter
    }

    pub fn has_custom_setter(&self) -> bool {
        self.custom_setter
    }

    pub fn has_handler(&self) -> bool {
        self.custom_handler
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn enum_as_str(&self) -> bool {
        self.enum_as_str
    }

    pub fn hints(&self) -> &SchemaHints {
        &self.hints
    }

    pub fn allow_none(&self) -> bool {
        self.hints.allow_none
    }

    pub fn group(&self) -> Option<&str> {
        self.hints.group.as_deref()
    }

    /// Reads the property through its getter and converts it to JSON.
    pub fn get(&self, object: &O, conv: &Conversion<'_>) -> Result<Value> {
        self.binding.get(object, &conv.with_enum_as_str(self.enum_as_str))
    }

    /// Converts `value` and stores it through the setter. Values that do not
    /// fit leave the property untouched.
    pub fn set(&self, object: &mut O, value: Value, conv: &Conversion<'_>) -> Result<()> {
        if !self.binding.set(object, value, &conv.with_enum_as_str(self.enum_as_str))? {
            debug!("{}.{}: value does not fit, left unchanged", self.declared_by, self.name);
        }
        Ok(())
    }

    /// Stores `value` when given and not null. Otherwise the property keeps
    /// the default that [`JsonObject::blank`] put in place.
    pub fn init(&self, object: &mut O, value: Option<Value>, conv: &Conversion<'_>) -> Result<()> {
        match value {
            Some(value) if !value.is_null() => self.set(object, value, conv),
            _ => Ok(()),
        }
    }

    pub fn schema(&self, generator: &mut SchemaGenerator) -> Result<Value> {
        if let Some(schema) = &self.hints.schema {
            return Ok(schema.clone());
        }
        if let Some(schema_ref) = &self.hints.schema_ref {
            return Ok(serde_json::json!({ "$ref": schema_ref }));
        }

        let mut fragment = generator.field_schema(&self.field_type, self.enum_as_str)?;

        if let Value::Object(map) = &mut fragment {
            let context = crate::Context::default();
            let conv = Conversion::new(&context, "").with_enum_as_str(self.enum_as_str);
            if let Some(default) = self.binding.default_json(&conv)? {
                map.insert("default".into(), default);
            }

            let hints = [
                ("title", &self.hints.title),
                ("pattern", &self.hints.pattern),
                ("format", &self.hints.format),
                ("description", &self.hints.description),
            ];
            for (key, hint) in hints {
                if let Some(hint) = hint {
                    map.insert(key.into(), Value::String(hint.clone()));
                }
            }
        }

        Ok(fragment)
    }

    fn lift<E: 'static>(&self, base: fn(&E) -> &O, base_mut: fn(&mut E) -> &mut O) -> PropertyHandler<E>
    where
        O: 'static,
    {
        PropertyHandler {
            name: self.name,
            declared_by: self.declared_by,
            json: self.json.clone(),
            field_type: self.field_type.clone(),
            hints: self.hints.clone(),
            enum_as_str: self.enum_as_str,
            custom_handler: self.custom_handler,
            custom_getter: self.custom_getter,
            custom_setter: self.custom_setter,
            binding: Arc::new(Lifted {
                inner: self.binding.clone(),
                base,
                base_mut,
            }),
        }
    }

}

impl<O> std::fmt::Debug for PropertyHandler<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyHandler")
            .field("name", &self.name)
            .field("declared_by", &self.declared_by)
            .field("json", &self.json)
            .field("field_type", &self.field_type)
            .finish_non_exhaustive()
    }
}

/// Ordered property table of one type.
pub struct PropertyTable<O> {
    type_name: &'static str,
    handlers: Vec<PropertyHandler<O>>,
    by_name: HashMap<&'static str, usize>,
    by_json: HashMap<String, usize>,
}

impl<O> PropertyTable<O> {

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyHandler<O>> {
        self.handlers.iter()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyHandler<O>> {
        self.by_name.get(name).map(|&i| &self.handlers[i])
    }

    pub fn by_json(&self, key: &str) -> Option<&PropertyHandler<O>> {
        self.by_json.get(key).map(|&i| &self.handlers[i])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name).collect()
    }

    pub fn json_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.json.as_str()).collect()
    }

    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a PropertyHandler<O>> + 'a {
        self.handlers.iter().filter(move |h| h.group() == Some(group))
    }

}

impl<'a, O> IntoIterator for &'a PropertyTable<O> {
    type Item = &'a PropertyHandler<O>;
    type IntoIter = std::slice::Iter<'a, PropertyHandler<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<O> std::fmt::Debug for PropertyTable<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyTable")
            .field("type_name", &self.type_name)
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// Collects the property declarations of one type.
pub struct TableBuilder<O> {
    type_name: &'static str,
    handlers: Vec<PropertyHandler<O>>,
    own: Vec<&'static str>,
}

impl<O: 'static> TableBuilder<O> {

    pub fn new(type_name: &'static str) -> Self {
        TableBuilder {
            type_name,
            handlers: Vec::new(),
            own: Vec::new(),
        }
    }

    /// Inherits every property of the embedded base object `B`.
    pub fn extends<B: JsonObject>(&mut self, base: fn(&O) -> &B, base_mut: fn(&mut O) -> &mut B) -> Result<&mut Self> {
        let table = properties::<B>()?;
        for handler in table {
            self.insert(handler.lift(base, base_mut), false)?;
        }
        Ok(self)
    }

    /// Declares a property whose value converts through [`PropertyValue`].
    pub fn property<T>(&mut self, name: &'static str, descriptor: Property<T>) -> PropertyDecl<'_, O, T>
    where
        T: PropertyValue + Clone + Send + Sync,
    {
        let codec = ValueCodec {
            to_json: T::to_json,
            from_json: T::from_json,
        };
        PropertyDecl::new(self, name, descriptor, Some(codec), T::field_type())
    }

    /// Declares a property converted only by its descriptor's custom handler.
    pub fn handled<T>(&mut self, name: &'static str, descriptor: Property<T>) -> PropertyDecl<'_, O, T>
    where
        T: Clone + Send + Sync + 'static,
    {
        PropertyDecl::new(self, name, descriptor, None, FieldType::Any)
    }

    fn insert(&mut self, handler: PropertyHandler<O>, own: bool) -> Result<()> {
        let name = handler.name;

        if own {
            if self.own.contains(&name) {
                return Err(Error::DuplicateProperty {
                    type_name: self.type_name.to_string(),
                    property: name.to_string(),
                });
            }
            self.own.push(name);
        }

        match self.handlers.iter_mut().find(|h| h.name == name) {
            Some(slot) => *slot = handler,
            None => self.handlers.push(handler),
        }
        Ok(())
    }

    pub fn build(self) -> PropertyTable<O> {
        let by_name = self.handlers.iter()
            .enumerate()
            .map(|(i, h)| (h.name, i))
            .collect();
        let by_json = self.handlers.iter()
            .enumerate()
            .map(|(i, h)| (h.json.clone(), i))
            .collect();

        PropertyTable {
            type_name: self.type_name,
            handlers: self.handlers,
            by_name,
            by_json,
        }
    }

}

/// A property declaration awaiting its accessors.
pub struct PropertyDecl<'b, O, T> {
    builder: &'b mut TableBuilder<O>,
    name: &'static str,
    descriptor: Property<T>,
    codec: Option<ValueCodec<T>>,
    field_type: FieldType,
    getter: Option<fn(&O) -> &T>,
    setter: Option<fn(&mut O, T)>,
    custom_getter: bool,
    custom_setter: bool,
}

impl<'b, O: 'static, T: Clone + Send + Sync + 'static> PropertyDecl<'b, O, T> {

    fn new(
        builder: &'b mut TableBuilder<O>,
        name: &'static str,
        descriptor: Property<T>,
        codec: Option<ValueCodec<T>>,
        field_type: FieldType,
    ) -> Self {
        PropertyDecl {
            builder,
            name,
            descriptor,
            codec,
            field_type,
            getter: None,
            setter: None,
            custom_getter: false,
            custom_setter: false,
        }
    }

    pub fn getter(mut self, getter: fn(&O) -> &T) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn setter(mut self, setter: fn(&mut O, T)) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Routes reads through a user-written `get_<name>`.
    pub fn custom_getter(mut self, getter: fn(&O) -> &T) -> Self {
        self.getter = Some(getter);
        self.custom_getter = true;
        self
    }

    /// Routes writes through a user-written `set_<name>`.
    pub fn custom_setter(mut self, setter: fn(&mut O, T)) -> Self {
        self.setter = Some(setter);
        self.custom_setter = true;
        self
    }

    pub fn declare(self) -> Result<()> {
        let missing = |capability| Error::MissingCapability {
            type_name: self.builder.type_name.to_string(),
            property: self.name.to_string(),
            capability,
        };

        let getter = self.getter.ok_or_else(|| missing("getter"))?;
        let setter = self.setter.ok_or_else(|| missing("setter"))?;

        let parts = self.descriptor.into_parts();
        let strategy = match (parts.handler, self.codec) {
            (Some(handler), _) => Strategy::Custom(handler),
            (None, Some(codec)) => Strategy::Generic(codec),
            (None, None) => return Err(missing("handler")),
        };
        let custom_handler = matches!(strategy, Strategy::Custom(_));

        let handler = PropertyHandler {
            name: self.name,
            declared_by: self.builder.type_name,
            json: parts.json.unwrap_or_else(|| self.name.to_string()),
            field_type: parts.value_type.unwrap_or(self.field_type),
            hints: parts.hints,
            enum_as_str: parts.enum_as_str,
            custom_handler,
            custom_getter: self.custom_getter,
            custom_setter: self.custom_setter,
            binding: Arc::new(Typed {
                getter,
                setter,
                default: parts.default,
                strategy,
            }),
        };

        self.builder.insert(handler, true)
    }

}

type TableCache = HashMap<TypeId, &'static (dyn Any + Send + Sync)>;

static TABLES: LazyLock<RwLock<TableCache>> = LazyLock::new(|| RwLock::new(HashMap::new()));

fn cached<O: JsonObject>() -> Option<&'static PropertyTable<O>> {
    let tables = TABLES.read().unwrap_or_else(PoisonError::into_inner);
    tables.get(&TypeId::of::<O>())
        .copied()
        .and_then(|table| table.downcast_ref())
}

/// Returns the property table of `O`, building it on first use.
///
/// The table is built outside the lock, since building may need the tables
/// of embedded base types. Only the first finished table is published;
/// concurrent builders adopt it and drop their own.
pub fn properties<O: JsonObject>() -> Result<&'static PropertyTable<O>> {
    if let Some(table) = cached::<O>() {
        trace!("property table cache hit for {}", O::TYPE_NAME);
        return Ok(table);
    }

    let mut builder = TableBuilder::new(O::TYPE_NAME);
    O::declare(&mut builder)?;
    let table = builder.build();
    debug!("built property table for {} ({} properties)", O::TYPE_NAME, table.len());

    let published: &'static (dyn Any + Send + Sync) = {
        let mut tables = TABLES.write().unwrap_or_else(PoisonError::into_inner);
        *tables
            .entry(TypeId::of::<O>())
            .or_insert_with(|| -> &'static (dyn Any + Send + Sync) { Box::leak(Box::new(table)) })
    };

    // Entries are keyed by the TypeId of the table's owner.
    let table = published.downcast_ref().ok_or_else(|| Error::TableCache(O::TYPE_NAME.to_string()))?;
    crate::registry::remember::<O>();
    Ok(table)
}
