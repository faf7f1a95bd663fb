//! Conversion of property values to and from JSON.
//!
//! Every Rust type that can sit in a property implements [`PropertyValue`].
//! The impls in this module cover primitives, optional values, sequences and
//! string-keyed mappings. Objects and enums get theirs from the derive macros
//! (or from [`object_value!`](crate::object_value) / [`enum_value!`](crate::enum_value)).

use crate::{Context, JsonObject, Result, SchemaGenerator};

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde_json::{Map, Value};

/// Declared shape of a property value, used for schema generation.
#[derive(Debug, Clone)]
pub enum FieldType {
    Any,
    String,
    Boolean,
    Number,
    Array,
    ArrayOf(Box<FieldType>),
    MapOf(Box<FieldType>),
    Enum(EnumType),
    Object(ObjectType),
}

impl FieldType {

    pub fn array_of(item: FieldType) -> Self {
        FieldType::ArrayOf(Box::new(item))
    }

    pub fn map_of(item: FieldType) -> Self {
        FieldType::MapOf(Box::new(item))
    }

    pub fn object<O: JsonObject>() -> Self {
        FieldType::Object(ObjectType::of::<O>())
    }

}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: &'static str,
    pub integer: bool,
    pub names: Vec<&'static str>,
}

#[derive(Clone, Copy)]
pub struct ObjectType {
    pub name: &'static str,
    pub schema: fn(&mut SchemaGenerator) -> Result<Map<String, Value>>,
}

impl ObjectType {

    pub fn of<O: JsonObject>() -> Self {
        ObjectType {
            name: O::TYPE_NAME,
            schema: SchemaGenerator::object_schema::<O>,
        }
    }

}

impl std::fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectType").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Per-field state threaded through a conversion.
#[derive(Debug, Clone, Copy)]
pub struct Conversion<'a> {
    pub context: &'a Context,
    /// Fallback namespace for untyped decode of nested values.
    pub namespace: &'a str,
    pub enum_as_str: bool,
}

impl<'a> Conversion<'a> {

    pub fn new(context: &'a Context, namespace: &'a str) -> Self {
        Conversion {
            context,
            namespace,
            enum_as_str: false,
        }
    }

    pub fn with_enum_as_str(self, enum_as_str: bool) -> Self {
        Conversion { enum_as_str, ..self }
    }

}

pub trait PropertyValue: Sized + 'static {

    fn field_type() -> FieldType;

    fn to_json(&self, conv: &Conversion<'_>) -> Result<Value>;

    /// `Ok(None)` means the value did not fit and the property keeps its
    /// current state.
    fn from_json(value: Value, conv: &Conversion<'_>) -> Result<Option<Self>>;

}

impl PropertyValue for String {

    fn field_type() -> FieldType {
        FieldType::String
    }

    fn to_json(&self, _conv: &Conversion<'_>) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_json(value: Value, _conv: &Conversion<'_>) -> Result<Option<Self>> {
        match value {
            Value::String(s) => Ok(Some(s)),
            _ => Ok(None),
        }
    }

}

impl PropertyValue for bool {

    fn field_type() -> FieldType {
        FieldType::Boolean
    }

    fn to_json(&self, _conv: &Conversion<'_>) -> Result<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_json(value: Value, _conv: &Conversion<'_>) -> Result<Option<Self>> {
        Ok(value.as_bool())
    }

}

macro_rules! signed_value {
    ($($ty:ty),*) => {
        $(
            impl PropertyValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::Number
                }

                fn to_json(&self, _conv: &Conversion<'_>) -> Result<Value> {
                    Ok(Value::from(*self))
                }

                fn from_json(value: Value, _conv: &Conversion<'_>) -> Result<Option<Self>> {
                    Ok(value.as_i64().and_then(|n| <$ty>::try_from(n).ok()))
                }
            }
        )*
    };
}

macro_rules! unsigned_value {
    ($($ty:ty),*) => {
        $(
            impl PropertyValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::Number
                }

                fn to_json(&self, _conv: &Conversion<'_>) -> Result<Value> {
                    Ok(Value::from(*self))
                }

                fn from_json(value: Value, _conv: &Conversion<'_>) -> Result<Option<Self>> {
                    Ok(value.as_u64().and_then(|n| <$ty>::try_from(n).ok()))
                }
            }
        )*
    };
}

signed_value!(i8, i16, i32, i64, isize);
unsigned_value!(u8, u16, u32, u64, usize);

impl PropertyValue for f64 {

    fn field_type() -> FieldType {
        FieldType::Number
    }

    fn to_json(&self, _conv: &Conversion<'_>) -> Result<Value> {
        Ok(Value::from(*self))
    }

    fn from_json(value: Value, _conv: &Conversion<'_>) -> Result<Option<Self>> {
        Ok(value.as_f64())
    }

}

impl PropertyValue for f32 {

    fn field_type() -> FieldType {
        FieldType::Number
    }

    fn to_json(&self, _conv: &Conversion<'_>) -> Result<Value> {
        Ok(Value::from(*self))
    }

    fn from_json(value: Value, _conv: &Conversion<'_>) -> Result<Option<Self>> {
        Ok(value.as_f64().map(|n| n as f32))
    }

}

impl PropertyValue for Value {

    fn field_type() -> FieldType {
        FieldType::Any
    }

    fn to_json(&self, _conv: &Conversion<'_>) -> Result<Value> {
        Ok(self.clone())
    }

    fn from_json(value: Value, _conv: &Conversion<'_>) -> Result<Option<Self>> {
        Ok(Some(value))
    }

}

impl<T: PropertyValue> PropertyValue for Option<T> {

    fn field_type() -> FieldType {
        T::field_type()
    }

    fn to_json(&self, conv: &Conversion<'_>) -> Result<Value> {
        match self {
            Some(value) => value.to_json(conv),
            None => Ok(Value::Null),
        }
    }

    fn from_json(value: Value, conv: &Conversion<'_>) -> Result<Option<Self>> {
        if value.is_null() {
            return Ok(Some(None));
        }
        Ok(T::from_json(value, conv)?.map(Some))
    }

}

impl<T: PropertyValue> PropertyValue for Box<T> {

    fn field_type() -> FieldType {
        T::field_type()
    }

    fn to_json(&self, conv: &Conversion<'_>) -> Result<Value> {
        (**self).to_json(conv)
    }

    fn from_json(value: Value, conv: &Conversion<'_>) -> Result<Option<Self>> {
        Ok(T::from_json(value, conv)?.map(Box::new))
    }

}

impl<T: PropertyValue> PropertyValue for Vec<T> {

    fn field_type() -> FieldType {
        match T::field_type() {
            FieldType::Any => FieldType::Array,
            item => FieldType::array_of(item),
        }
    }

    fn to_json(&self, conv: &Conversion<'_>) -> Result<Value> {
        let items = self.iter()
            .map(|item| item.to_json(conv))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(items))
    }

    fn from_json(value: Value, conv: &Conversion<'_>) -> Result<Option<Self>> {
        let Value::Array(items) = value else {
            return Ok(None);
        };

        let mut result = Vec::with_capacity(items.len());
        for item in items {
            match T::from_json(item, conv)? {
                Some(item) => result.push(item),
                None => debug!("dropping sequence element that does not fit the item type"),
            }
        }
        Ok(Some(result))
    }

}

// Ordered mapping: entries keep their order and skip the processor.
impl<T: PropertyValue> PropertyValue for BTreeMap<String, T> {

    fn field_type() -> FieldType {
        FieldType::map_of(T::field_type())
    }

    fn to_json(&self, conv: &Conversion<'_>) -> Result<Value> {
        let mut map = Map::new();
        for (key, value) in self {
            map.insert(key.clone(), value.to_json(conv)?);
        }
        Ok(Value::Object(map))
    }

    fn from_json(value: Value, conv: &Conversion<'_>) -> Result<Option<Self>> {
        let Value::Object(entries) = value else {
            return Ok(None);
        };

        let mut result = BTreeMap::new();
        for (key, value) in entries {
            match T::from_json(value, conv)? {
                Some(value) => {
                    result.insert(key, value);
                }
                None => debug!("dropping mapping entry '{key}' that does not fit the value type"),
            }
        }
        Ok(Some(result))
    }

}

// Unordered mapping: every entry goes through the processor.
impl<T: PropertyValue> PropertyValue for HashMap<String, T> {

    fn field_type() -> FieldType {
        FieldType::map_of(T::field_type())
    }

    fn to_json(&self, conv: &Conversion<'_>) -> Result<Value> {
        let processor = conv.context.processor();
        let mut map = Map::new();
        for (key, value) in self {
            let (key, value) = processor.when_to_dict(key.clone(), value.to_json(conv)?);
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn from_json(value: Value, conv: &Conversion<'_>) -> Result<Option<Self>> {
        let Value::Object(entries) = value else {
            return Ok(None);
        };

        let processor = conv.context.processor();
        let mut result = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let (key, value) = processor.when_from_dict(key, value);
            match T::from_json(value, conv)? {
                Some(value) => {
                    result.insert(key, value);
                }
                None => debug!("dropping mapping entry '{key}' that does not fit the value type"),
            }
        }
        Ok(Some(result))
    }

}
