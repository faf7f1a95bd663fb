//! Untyped values and the `parse` entry point.

use crate::{
    Context, Conversion, FieldType, JsonObject, PropertyValue, Result,
    object::{STATE_KEY, TYPE_KEY},
};

use std::any::Any;
use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

/// Object-safe view of a [`JsonObject`], used where the concrete type is
/// only known at runtime.
pub trait AnyObject: Any + Send + Sync + std::fmt::Debug {

    fn object_type_name(&self) -> String;

    fn to_dict_in(&self, context: &Context) -> Result<Map<String, Value>>;

    fn clone_object(&self) -> Box<dyn AnyObject>;

    fn eq_object(&self, other: &dyn AnyObject) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

}

impl<O: JsonObject> AnyObject for O {

    fn object_type_name(&self) -> String {
        <O as JsonObject>::object_type_name()
    }

    fn to_dict_in(&self, context: &Context) -> Result<Map<String, Value>> {
        JsonObject::to_dict_in(self, context)
    }

    fn clone_object(&self) -> Box<dyn AnyObject> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn AnyObject) -> bool {
        other.as_any()
            .downcast_ref::<O>()
            .is_some_and(|other| self.state_eq(other))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

}

/// Result of untyped decode: an object when the data was tagged and
/// resolvable, plain structure otherwise.
#[derive(Debug, Default)]
pub enum Dynamic {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Dynamic>),
    Map(BTreeMap<String, Dynamic>),
    Object(Box<dyn AnyObject>),
}

impl Clone for Dynamic {
    fn clone(&self) -> Self {
        match self {
            Dynamic::Null => Dynamic::Null,
            Dynamic::Bool(b) => Dynamic::Bool(*b),
            Dynamic::Number(n) => Dynamic::Number(n.clone()),
            Dynamic::String(s) => Dynamic::String(s.clone()),
            Dynamic::Array(items) => Dynamic::Array(items.clone()),
            Dynamic::Map(entries) => Dynamic::Map(entries.clone()),
            Dynamic::Object(object) => Dynamic::Object(object.clone_object()),
        }
    }
}

impl PartialEq for Dynamic {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dynamic::Null, Dynamic::Null) => true,
            (Dynamic::Bool(a), Dynamic::Bool(b)) => a == b,
            (Dynamic::Number(a), Dynamic::Number(b)) => a == b,
            (Dynamic::String(a), Dynamic::String(b)) => a == b,
            (Dynamic::Array(a), Dynamic::Array(b)) => a == b,
            (Dynamic::Map(a), Dynamic::Map(b)) => a == b,
            (Dynamic::Object(a), Dynamic::Object(b)) => a.eq_object(&**b),
            _ => false,
        }
    }
}

impl Dynamic {

    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Dynamic]> {
        match self {
            Dynamic::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Dynamic>> {
        match self {
            Dynamic::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn downcast_ref<O: JsonObject>(&self) -> Option<&O> {
        match self {
            Dynamic::Object(object) => object.as_any().downcast_ref::<O>(),
            _ => None,
        }
    }

    pub fn downcast<O: JsonObject>(self) -> Option<O> {
        match self {
            Dynamic::Object(object) => object.into_any().downcast::<O>().ok().map(|o| *o),
            _ => None,
        }
    }

    pub fn object<O: JsonObject>(object: O) -> Self {
        Dynamic::Object(Box::new(object))
    }

}

impl From<&str> for Dynamic {
    fn from(value: &str) -> Self {
        Dynamic::String(value.to_string())
    }
}

impl From<String> for Dynamic {
    fn from(value: String) -> Self {
        Dynamic::String(value)
    }
}

impl From<bool> for Dynamic {
    fn from(value: bool) -> Self {
        Dynamic::Bool(value)
    }
}

impl From<i64> for Dynamic {
    fn from(value: i64) -> Self {
        Dynamic::Number(value.into())
    }
}

impl PropertyValue for Dynamic {

    fn field_type() -> FieldType {
        FieldType::Any
    }

    fn to_json(&self, conv: &Conversion<'_>) -> Result<Value> {
        Ok(match self {
            Dynamic::Null => Value::Null,
            Dynamic::Bool(b) => Value::Bool(*b),
            Dynamic::Number(n) => Value::Number(n.clone()),
            Dynamic::String(s) => Value::String(s.clone()),
            Dynamic::Array(items) => Value::Array(
                items.iter().map(|item| item.to_json(conv)).collect::<Result<_>>()?,
            ),
            Dynamic::Map(entries) => {
                let processor = conv.context.processor();
                let mut map = Map::new();
                for (key, value) in entries {
                    let (key, value) = processor.when_to_dict(key.clone(), value.to_json(conv)?);
                    map.insert(key, value);
                }
                Value::Object(map)
            }
            Dynamic::Object(object) => Value::Object(object.to_dict_in(conv.context)?),
        })
    }

    fn from_json(value: Value, conv: &Conversion<'_>) -> Result<Option<Self>> {
        parse(value, conv.context, conv.namespace).map(Some)
    }

}

/// Untyped decode.
///
/// A mapping carrying a type identifier is resolved through the context
/// (bare names against `namespace`) and decoded as that type, using
/// its `py/state` sub-mapping when present. Any other mapping or sequence is
/// parsed element by element into plain structure.
pub fn parse(value: Value, context: &Context, namespace: &str) -> Result<Dynamic> {
    Ok(match value {
        Value::Null => Dynamic::Null,
        Value::Bool(b) => Dynamic::Bool(b),
        Value::Number(n) => Dynamic::Number(n),
        Value::String(s) => Dynamic::String(s),
        Value::Array(items) => Dynamic::Array(
            items.into_iter()
                .map(|item| parse(item, context, namespace))
                .collect::<Result<_>>()?,
        ),
        Value::Object(mut entries) => {
            if let Some(Value::String(type_name)) = entries.get(TYPE_KEY) {
                let registration = context.resolve(type_name, namespace)?;
                let state = match entries.remove(STATE_KEY) {
                    Some(state @ Value::Object(_)) => state,
                    _ => Value::Object(entries),
                };
                return Ok(registration
                    .decode(state, context)?
                    .map_or(Dynamic::Null, Dynamic::Object));
            }

            let processor = context.processor();
            let mut result = BTreeMap::new();
            for (key, value) in entries {
                let (key, value) = processor.when_from_dict(key, value);
                result.insert(key, parse(value, context, namespace)?);
            }
            Dynamic::Map(result)
        }
    })
}
