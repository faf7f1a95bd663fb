pub mod error;
pub use error::{Error, ResolveError, Result};

pub mod processor;
pub use processor::{NoopProcessor, Processor};

pub mod value;
pub use value::{Conversion, EnumType, FieldType, ObjectType, PropertyValue};

pub mod enumeration;
pub use enumeration::JsonEnum;

pub mod handler;
pub use handler::{FnHandler, Handler, SerdeHandler};

pub mod property;
pub use property::{DefaultValue, Property, SchemaHints};

pub mod context;
pub use context::Context;

pub mod registry;
pub use registry::{Registration, TypeRegistry, known_types};

pub mod dynamic;
pub use dynamic::{AnyObject, Dynamic, parse};

pub mod introspector;
pub use introspector::{PropertyDecl, PropertyHandler, PropertyTable, TableBuilder, properties};

pub mod object;
pub use object::{ID_KEY, JsonObject, ObjectOptions, STATE_KEY, TYPE_KEY};

pub mod schema;
pub use schema::SchemaGenerator;

pub mod codec;
pub use codec::{Codec, DecodeFor, EncodeFor};

pub use serde_json;

#[doc(hidden)]
pub mod __private {
    use serde_json::Value;

    /// Parses a schema literal written in an attribute. Invalid JSON is kept
    /// as a plain string so the declaration still builds.
    pub fn schema_literal(literal: &str) -> Value {
        serde_json::from_str(literal).unwrap_or_else(|_| Value::String(literal.to_string()))
    }
}
