//! JSON-Schema generation from property tables.

use crate::{FieldType, JsonObject, ObjectType, Result, object::{STATE_KEY, TYPE_KEY}};

use log::trace;
use serde_json::{Map, Value, json};

/// Builds schemas for object types.
///
/// In deep mode (the default) every nested object type is generated once into
/// `definitions` and referenced as `#/definitions/<Name>`. With deep mode off,
/// nested objects are referenced against `base_url` when one is set, against
/// an already known definition otherwise, and fall back to a plain object
/// schema.
#[derive(Debug, Clone)]
pub struct SchemaGenerator {
    definitions: Map<String, Value>,
    deep: bool,
    base_url: Option<String>,
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        SchemaGenerator {
            definitions: Map::new(),
            deep: true,
            base_url: None,
        }
    }
}

impl SchemaGenerator {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Seeds the generator with definitions produced elsewhere.
    pub fn with_definitions(mut self, definitions: Map<String, Value>) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn definitions(&self) -> &Map<String, Value> {
        &self.definitions
    }

    pub fn into_definitions(self) -> Map<String, Value> {
        self.definitions
    }

    /// Full schema of `O`, with collected definitions at the root.
    pub fn generate<O: JsonObject>(&mut self) -> Result<Value> {
        let mut schema = self.object_schema::<O>()?;
        if !self.definitions.is_empty() {
            schema.insert("definitions".into(), Value::Object(self.definitions.clone()));
        }
        Ok(Value::Object(schema))
    }

    /// Schema fragment of `O` alone, without the definitions section.
    pub fn object_schema<O: JsonObject>(&mut self) -> Result<Map<String, Value>> {
        trace!("generating schema for {}", O::TYPE_NAME);

        let mut properties = Map::new();
        if O::OPTIONS.typed {
            properties.insert(TYPE_KEY.into(), json!({
                "type": "string",
                "const": O::object_type_name(),
            }));
        }

        let mut state = Map::new();
        for handler in O::properties()? {
            state.insert(handler.json().to_string(), handler.schema(self)?);
        }

        if O::OPTIONS.enveloped {
            properties.insert(STATE_KEY.into(), json!({
                "type": "object",
                "properties": state,
            }));
        } else {
            properties.extend(state);
        }

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        Ok(schema)
    }

    pub fn field_schema(&mut self, field_type: &FieldType, enum_as_str: bool) -> Result<Value> {
        Ok(match field_type {
            FieldType::Any => json!({ "type": "object" }),
            FieldType::String => json!({ "type": "string" }),
            FieldType::Boolean => json!({ "type": "boolean" }),
            FieldType::Number => json!({ "type": "number" }),
            FieldType::Array => json!({ "type": "array" }),
            FieldType::ArrayOf(item) => json!({
                "type": "array",
                "items": self.field_schema(item, enum_as_str)?,
            }),
            FieldType::MapOf(item) => json!({
                "type": "object",
                "patternProperties": { ".*": self.field_schema(item, enum_as_str)? },
            }),
            FieldType::Enum(enumeration) if enum_as_str && !enumeration.integer => json!({
                "type": "string",
                "enum": enumeration.names,
            }),
            FieldType::Enum(_) => json!({ "type": "number" }),
            FieldType::Object(object) => self.object_ref(object)?,
        })
    }

    fn object_ref(&mut self, object: &ObjectType) -> Result<Value> {
        let local_ref = || json!({ "$ref": format!("#/definitions/{}", object.name) });

        if self.deep {
            if !self.definitions.contains_key(object.name) {
                // Placeholder first so recursive types stop at the reference.
                self.definitions.insert(object.name.to_string(), Value::Null);
                let fragment = (object.schema)(self)?;
                self.definitions.insert(object.name.to_string(), Value::Object(fragment));
            }
            return Ok(local_ref());
        }

        if let Some(base_url) = &self.base_url {
            return Ok(json!({ "$ref": format!("{}/{}", base_url.trim_end_matches('/'), object.name) }));
        }

        if self.definitions.contains_key(object.name) {
            return Ok(local_ref());
        }

        Ok(json!({ "type": "object" }))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnumType;

    #[test]
    fn primitive_fragments() {
        let mut generator = SchemaGenerator::new();

        assert_eq!(generator.field_schema(&FieldType::String, false).unwrap(), json!({"type": "string"}));
        assert_eq!(
            generator.field_schema(&FieldType::array_of(FieldType::Number), false).unwrap(),
            json!({"type": "array", "items": {"type": "number"}}),
        );
        assert_eq!(
            generator.field_schema(&FieldType::map_of(FieldType::Boolean), false).unwrap(),
            json!({"type": "object", "patternProperties": {".*": {"type": "boolean"}}}),
        );
        assert!(generator.definitions().is_empty());
    }

    #[test]
    fn enum_fragments() {
        let mut generator = SchemaGenerator::new();
        let shade = FieldType::Enum(EnumType { name: "Shade", integer: false, names: vec!["LIGHT", "DARK"] });
        let level = FieldType::Enum(EnumType { name: "Level", integer: true, names: vec!["LOW", "HIGH"] });

        assert_eq!(generator.field_schema(&shade, false).unwrap(), json!({"type": "number"}));
        assert_eq!(
            generator.field_schema(&shade, true).unwrap(),
            json!({"type": "string", "enum": ["LIGHT", "DARK"]}),
        );
        assert_eq!(generator.field_schema(&level, true).unwrap(), json!({"type": "number"}));
    }
}
