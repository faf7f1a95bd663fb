use podm_core::{FnHandler, JsonObject};
use podm_macros::JsonObject;
use serde_json::Value;


fn encode_flag(value: &bool) -> Value {
    Value::String(if *value { "yes" } else { "no" }.into())
}

fn decode_flag(value: Value) -> Option<bool> {
    value.as_str().map(|s| s == "yes")
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "trybuild", untyped, no_display)]
struct Switch {
    #[property(getter, setter)]
    name: String,
    #[property(handler = "FnHandler::new(encode_flag, decode_flag)")]
    on: bool,
}

impl Switch {

    fn get_name(&self) -> &String {
        &self.name
    }

    fn set_name(&mut self, value: String) {
        self.name = value.to_lowercase();
    }

}


fn main() {

    let mut switch = Switch::construct().unwrap();
    switch.set("name", Value::String("MAIN".into())).unwrap();
    switch.set_on(true);

    assert_eq!(switch.get_name(), "main");
    assert_eq!(switch.get("on").unwrap(), Value::String("yes".into()));
    assert!(!switch.to_dict().unwrap().contains_key("py/object"));

}
