use podm_core::JsonObject;
use podm_macros::JsonObject;


fn empty_tags() -> Vec<String> {
    Vec::new()
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(name = "Doc", namespace = "trybuild", enveloped)]
struct Document {
    #[property(default = "\"untitled\".to_string()", title = "Title", pattern = "^.+$")]
    title: String,
    #[property(default_with = "empty_tags", description = "Free-form tags")]
    tags: Vec<String>,
    #[property(schema = r#"{"type": "string", "format": "uri"}"#, allow_none = false, group = "links")]
    link: Option<String>,
    cache: Option<String>,
}


fn main() {

    let doc = Document::construct().unwrap();
    assert_eq!(doc.get_title(), "untitled");
    assert!(doc.get_tags().is_empty());
    assert!(doc.cache.is_none());

    let dict = doc.to_dict().unwrap();
    assert!(dict.contains_key("py/state"));

    let table = Document::properties().unwrap();
    assert!(!table.get("link").unwrap().allow_none());
    assert_eq!(table.group("links").count(), 1);

}
