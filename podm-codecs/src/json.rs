use std::io::Cursor;
use log::trace;
use podm_core::{
    Context, Dynamic, Error, JsonObject, PropertyValue, Result,
    codec::{Codec, DecodeFor, EncodeFor},
    Conversion,
};
use serde_json::Value;

/// Text JSON codec for objects.
///
/// Encoding writes `to_dict` output; decoding reads the bytes back either as
/// a known type or, through [`Dynamic`], as whatever the type identifiers in
/// the data resolve to in the context's registry.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    context: Context,
    pretty: bool,
    namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonData(Vec<u8>);

impl JsonData {

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

}

impl From<Vec<u8>> for JsonData {
    fn from(bytes: Vec<u8>) -> Self {
        JsonData(bytes)
    }
}

impl From<&str> for JsonData {
    fn from(text: &str) -> Self {
        JsonData(text.as_bytes().to_vec())
    }
}

impl JsonCodec {

    pub fn new(context: Context) -> Self {
        JsonCodec {
            context,
            ..Self::default()
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Namespace bare type identifiers resolve against in untyped decode.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn encode_dynamic(&self, value: &Dynamic) -> Result<JsonData> {
        let conv = Conversion::new(&self.context, &self.namespace);
        self.write(&value.to_json(&conv)?)
    }

    fn write(&self, value: &Value) -> Result<JsonData> {
        let bytes = match self.pretty {
            true => serde_json::to_vec_pretty(value),
            false => serde_json::to_vec(value),
        };
        bytes.map(JsonData).map_err(|e| Error::Encode(e.to_string()))
    }

    fn read(&self, data: &JsonData) -> Result<Value> {
        let c = Cursor::new(&data.0);
        serde_json::from_reader(c).map_err(|e: serde_json::Error| Error::Decode(e.to_string()))
    }

}

impl Codec for JsonCodec {
    type Data = JsonData;
}

impl<O: JsonObject> EncodeFor<JsonCodec, O> for JsonCodec {
    fn encode(codec: &JsonCodec, obj: &O) -> Result<JsonData> {
        trace!("encoding {}", O::object_type_name());
        let dict = obj.to_dict_in(&codec.context)?;
        codec.write(&Value::Object(dict))
    }
}

impl<O: JsonObject> DecodeFor<JsonCodec, Option<O>> for JsonCodec {
    fn decode(codec: &JsonCodec, data: &JsonData) -> Result<Option<O>> {
        let value = codec.read(data)?;
        O::from_dict_in(value, &codec.context)
    }
}

impl DecodeFor<JsonCodec, Dynamic> for JsonCodec {
    fn decode(codec: &JsonCodec, data: &JsonData) -> Result<Dynamic> {
        let value = codec.read(data)?;
        podm_core::parse(value, &codec.context, &codec.namespace)
    }
}
