mod common;

use common::*;

use podm_core::{JsonObject, SchemaGenerator};
use serde_json::{Map, json};

#[test]
fn company_schema() {
    let schema = Company::schema().unwrap();
    let properties = &schema["properties"];

    assert_eq!(schema["type"], json!("object"));
    assert_eq!(properties["py/object"], json!({"type": "string", "const": "tests.common.Company"}));
    assert_eq!(properties["oid"]["type"], json!("string"));
    assert_eq!(properties["created"]["type"], json!("object"));
    assert_eq!(properties["company-name"]["type"], json!("string"));
    assert_eq!(properties["description"]["type"], json!("string"));
    assert!(schema.get("definitions").is_none());
}

#[test]
fn nested_objects_share_definitions() {
    let schema = Team::schema().unwrap();
    let properties = &schema["properties"];

    assert_eq!(properties["lead"], json!({"$ref": "#/definitions/Employee"}));
    assert_eq!(properties["members"], json!({
        "type": "array",
        "items": {"$ref": "#/definitions/Employee"},
    }));
    assert_eq!(properties["sector"], json!({"$ref": "#/definitions/Sector"}));

    let definitions = schema["definitions"].as_object().unwrap();
    let mut names: Vec<&str> = definitions.keys().map(String::as_str).collect();
    names.sort();
    assert_eq!(names, vec!["Employee", "Sector"]);

    assert_eq!(
        definitions["Sector"]["properties"]["employees"]["items"],
        json!({"$ref": "#/definitions/Employee"}),
    );
    assert_eq!(
        definitions["Employee"]["properties"]["py/object"]["const"],
        json!("tests.common.Employee"),
    );
}

#[test]
fn recursive_types_terminate() {
    let schema = Node::schema().unwrap();

    assert_eq!(schema["properties"]["child"], json!({"$ref": "#/definitions/Node"}));
    assert_eq!(
        schema["definitions"]["Node"]["properties"]["child"],
        json!({"$ref": "#/definitions/Node"}),
    );
}

#[test]
fn shallow_schema_without_base_url() {
    let mut generator = SchemaGenerator::new().deep(false);
    let schema = generator.generate::<Sector>().unwrap();

    assert_eq!(
        schema["properties"]["employees"],
        json!({"type": "array", "items": {"type": "object"}, "default": []}),
    );
    assert!(generator.definitions().is_empty());
}

#[test]
fn shallow_schema_with_base_url() {
    let mut generator = SchemaGenerator::new()
        .deep(false)
        .base_url("https://example.com/schemas/");
    let schema = generator.generate::<Team>().unwrap();

    assert_eq!(
        schema["properties"]["lead"],
        json!({"$ref": "https://example.com/schemas/Employee"}),
    );
}

#[test]
fn shallow_schema_reuses_known_definitions() {
    let mut known = Map::new();
    known.insert("Employee".into(), json!({"type": "object"}));

    let mut generator = SchemaGenerator::new().deep(false).with_definitions(known);
    let schema = generator.generate::<Team>().unwrap();

    assert_eq!(schema["properties"]["lead"], json!({"$ref": "#/definitions/Employee"}));
    assert_eq!(schema["properties"]["sector"], json!({"type": "object"}));
    assert_eq!(generator.into_definitions().len(), 1);
}

#[test]
fn hints_merge_into_fragment() {
    let schema = Described::schema().unwrap();
    let properties = &schema["properties"];

    assert!(properties.get("py/object").is_none());
    assert_eq!(properties["name"], json!({
        "type": "string",
        "default": "anonymous",
        "title": "Name",
        "pattern": "^[a-z]+$",
        "description": "Lowercase name",
    }));
    assert_eq!(properties["email"], json!({"type": "string", "format": "email"}));
}

#[test]
fn explicit_schema_short_circuits() {
    let schema = Described::schema().unwrap();
    let properties = &schema["properties"];

    assert_eq!(properties["address"], json!({"$ref": "https://example.com/schemas/address.json"}));
    assert_eq!(properties["count"], json!({"type": "integer", "minimum": 0}));
}

#[test]
fn enum_schema_modes() {
    let schema = Palette::schema().unwrap();
    let properties = &schema["properties"];

    assert_eq!(properties["primary"], json!({"type": "number"}));
    assert_eq!(properties["secondary"], json!({"type": "string", "enum": ["RED", "GREEN"]}));
    assert_eq!(properties["level"], json!({"type": "number"}));
}

#[test]
fn enveloped_schema() {
    let schema = Envelope::schema().unwrap();
    let state = &schema["properties"]["py/state"];

    assert_eq!(state["type"], json!("object"));
    assert_eq!(state["properties"]["subject"], json!({"type": "string"}));
    assert!(schema["properties"].get("subject").is_none());
}

#[test]
fn mapping_and_default_fragments() {
    let schema = Catalog::schema().unwrap();
    assert_eq!(
        schema["properties"]["by_name"],
        json!({"type": "object", "patternProperties": {".*": {"$ref": "#/definitions/Employee"}}}),
    );

    let schema = Ticket::schema().unwrap();
    assert_eq!(schema["properties"]["number"], json!({"type": "number"}));
    assert_eq!(
        schema["properties"]["labels"],
        json!({"type": "array", "items": {"type": "string"}, "default": ["open"]}),
    );
}
