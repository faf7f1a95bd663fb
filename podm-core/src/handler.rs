use std::marker::PhantomData;

use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Custom encode/decode pair for one property.
///
/// A property with a handler never goes through the generic conversion:
/// whatever `encode` returns is written, and `decode` alone decides the
/// value read back. Returning `None` from `decode` leaves the property as is.
pub trait Handler<T>: Send + Sync {

    fn encode(&self, value: &T) -> Value;

    fn decode(&self, value: Value) -> Option<T>;

}

/// Handler for any type serde already knows how to represent.
pub struct SerdeHandler<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeHandler<T> {

    pub fn new() -> Self {
        SerdeHandler { _marker: PhantomData }
    }

}

impl<T> Default for SerdeHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SerdeHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SerdeHandler")
    }
}

impl<T: Serialize + DeserializeOwned> Handler<T> for SerdeHandler<T> {

    fn encode(&self, value: &T) -> Value {
        serde_json::to_value(value).unwrap_or_else(|e| {
            debug!("SerdeHandler failed to encode: {e}");
            Value::Null
        })
    }

    fn decode(&self, value: Value) -> Option<T> {
        serde_json::from_value(value)
            .map_err(|e| debug!("SerdeHandler failed to decode: {e}"))
            .ok()
    }

}

/// Handler assembled from two plain functions.
pub struct FnHandler<T> {
    encode: fn(&T) -> Value,
    decode: fn(Value) -> Option<T>,
}

impl<T> FnHandler<T> {

    pub fn new(encode: fn(&T) -> Value, decode: fn(Value) -> Option<T>) -> Self {
        FnHandler { encode, decode }
    }

}

impl<T> std::fmt::Debug for FnHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnHandler")
    }
}

impl<T> Handler<T> for FnHandler<T> {

    fn encode(&self, value: &T) -> Value {
        (self.encode)(value)
    }

    fn decode(&self, value: Value) -> Option<T> {
        (self.decode)(value)
    }

}
