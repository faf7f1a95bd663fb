//! The object model.
//!
//! [`JsonObject`] is implemented once per type, normally by
//! `#[derive(JsonObject)]`. The type supplies its name, namespace, options and
//! property declarations; everything else (construction with defaults,
//! `to_dict`, `from_dict`, item-style access, equality, schema) is provided on
//! top of the cached property table.

use crate::{
    Context, Conversion, Error, FieldType, PropertyTable, Result, SchemaGenerator, TableBuilder,
    introspector,
};

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde_json::{Map, Value};

/// Key holding the type identifier.
pub const TYPE_KEY: &str = "py/object";
/// Key holding the fields in enveloped mode.
pub const STATE_KEY: &str = "py/state";
/// Persistence id key, ignored on decode.
pub const ID_KEY: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectOptions {
    /// Emit the type identifier.
    pub typed: bool,
    /// Nest the fields under [`STATE_KEY`].
    pub enveloped: bool,
}

impl ObjectOptions {
    pub const DEFAULT: Self = ObjectOptions { typed: true, enveloped: false };
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub trait JsonObject: Clone + fmt::Debug + Send + Sync + 'static {

    const TYPE_NAME: &'static str;
    const NAMESPACE: &'static str;
    const OPTIONS: ObjectOptions = ObjectOptions::DEFAULT;

    fn declare(table: &mut TableBuilder<Self>) -> Result<()>;

    /// Fresh instance with every property at its declared default. Factory
    /// defaults are invoked here and nowhere else, once per instance.
    fn blank() -> Self;

    fn after_deserialize(&mut self) {}

    fn properties() -> Result<&'static PropertyTable<Self>> {
        introspector::properties::<Self>()
    }

    fn property_names() -> Result<Vec<&'static str>> {
        Ok(Self::properties()?.names())
    }

    fn json_field_names() -> Result<Vec<&'static str>> {
        Ok(Self::properties()?.json_names())
    }

    fn object_type_name() -> String {
        format!("{}.{}", Self::NAMESPACE, Self::TYPE_NAME)
    }

    /// New instance with every property at its default.
    fn construct() -> Result<Self> {
        Self::construct_in(&Context::default())
    }

    fn construct_in(context: &Context) -> Result<Self> {
        Self::with_values_in(HashMap::new(), context)
    }

    /// New instance from property-name keyed values; absent or null entries
    /// take the declared default, names outside the table are ignored.
    fn with_values<I, K>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let values = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::with_values_in(values, &Context::default())
    }

    fn with_values_in(mut values: HashMap<String, Value>, context: &Context) -> Result<Self> {
        let table = Self::properties()?;
        let conv = Conversion::new(context, Self::NAMESPACE);

        let mut object = Self::blank();
        for handler in table {
            handler.init(&mut object, values.remove(handler.name()), &conv)?;
        }
        Ok(object)
    }

    fn to_dict(&self) -> Result<Map<String, Value>> {
        self.to_dict_in(&Context::default())
    }

    fn to_dict_in(&self, context: &Context) -> Result<Map<String, Value>> {
        let mut result = Map::new();

        if Self::OPTIONS.typed {
            result.insert(TYPE_KEY.to_string(), Value::String(Self::object_type_name()));
        }

        let state = self.get_state_dict(context)?;
        if Self::OPTIONS.enveloped {
            result.insert(STATE_KEY.to_string(), Value::Object(state));
        } else {
            result.extend(state);
        }

        Ok(result)
    }

    /// The encoded fields without the type identifier.
    fn get_state_dict(&self, context: &Context) -> Result<Map<String, Value>> {
        let table = Self::properties()?;
        let conv = Conversion::new(context, Self::NAMESPACE);
        let processor = context.processor();

        let mut state = Map::new();
        for handler in table {
            let value = handler.get(self, &conv)?;
            let (key, value) = processor.when_to_dict(handler.json().to_string(), value);
            state.insert(key, value);
        }
        Ok(state)
    }

    fn from_dict(data: Value) -> Result<Option<Self>> {
        Self::from_dict_in(data, &Context::default())
    }

    /// Typed decode. Null gives `None`; unknown keys are skipped and null
    /// fields keep their defaults.
    fn from_dict_in(data: Value, context: &Context) -> Result<Option<Self>> {
        let mut data = match data {
            Value::Null => return Ok(None),
            Value::Object(data) => data,
            other => {
                debug!("{}: cannot decode from {other}", Self::TYPE_NAME);
                return Ok(None);
            }
        };

        let state = match data.remove(STATE_KEY) {
            Some(Value::Object(state)) => state,
            _ => data,
        };

        let table = Self::properties()?;
        let conv = Conversion::new(context, Self::NAMESPACE);
        let processor = context.processor();

        let mut object = Self::construct_in(context)?;
        for (key, value) in state {
            if key == TYPE_KEY || key == ID_KEY {
                continue;
            }

            let (key, value) = processor.when_from_dict(key, value);
            match table.by_json(&key) {
                Some(handler) => handler.init(&mut object, Some(value), &conv)?,
                None => debug!("{}: skipping unknown key '{key}'", Self::TYPE_NAME),
            }
        }

        object.after_deserialize();
        Ok(Some(object))
    }

    /// Item-style read of a property by name, as JSON.
    fn get(&self, name: &str) -> Result<Value> {
        let handler = Self::properties()?
            .get(name)
            .ok_or_else(|| Error::unknown_property(Self::TYPE_NAME, name))?;
        let context = Context::default();
        handler.get(self, &Conversion::new(&context, Self::NAMESPACE))
    }

    /// Item-style write of a property by name, from JSON.
    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let handler = Self::properties()?
            .get(name)
            .ok_or_else(|| Error::unknown_property(Self::TYPE_NAME, name))?;
        let context = Context::default();
        handler.set(self, value, &Conversion::new(&context, Self::NAMESPACE))
    }

    /// Same concrete type and equal state dictionaries.
    fn state_eq(&self, other: &Self) -> bool {
        let context = Context::default();
        match (self.get_state_dict(&context), other.get_state_dict(&context)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn schema() -> Result<Value> {
        SchemaGenerator::new().generate::<Self>()
    }

}

pub fn field_type<O: JsonObject>() -> FieldType {
    FieldType::object::<O>()
}

pub fn encode<O: JsonObject>(object: &O, conv: &Conversion<'_>) -> Result<Value> {
    Ok(Value::Object(object.to_dict_in(conv.context)?))
}

pub fn decode<O: JsonObject>(value: Value, conv: &Conversion<'_>) -> Result<Option<O>> {
    O::from_dict_in(value, conv.context)
}

/// `TypeName:prop=value;prop=value`, strings unquoted.
pub fn display<O: JsonObject>(object: &O, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let table = O::properties().map_err(|_| fmt::Error)?;
    let context = Context::default();
    let conv = Conversion::new(&context, O::NAMESPACE);

    write!(f, "{}:", O::TYPE_NAME)?;
    for (i, handler) in table.iter().enumerate() {
        if i > 0 {
            f.write_str(";")?;
        }
        match handler.get(object, &conv).map_err(|_| fmt::Error)? {
            Value::String(s) => write!(f, "{}={s}", handler.name())?,
            other => write!(f, "{}={other}", handler.name())?,
        }
    }
    Ok(())
}

#[macro_export]
macro_rules! object_value {
    ($ty:ty) => {
        impl $crate::PropertyValue for $ty {
            fn field_type() -> $crate::FieldType {
                $crate::object::field_type::<Self>()
            }

            fn to_json(&self, conv: &$crate::Conversion<'_>) -> $crate::Result<$crate::serde_json::Value> {
                $crate::object::encode(self, conv)
            }

            fn from_json(
                value: $crate::serde_json::Value,
                conv: &$crate::Conversion<'_>,
            ) -> $crate::Result<::std::option::Option<Self>> {
                $crate::object::decode(value, conv)
            }
        }
    };
}
