use podm_core::JsonObject;
use podm_macros::JsonObject;


#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "trybuild")]
struct Base {
    #[property]
    id: Option<String>,
    #[property(default = "1")]
    version: i64,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "trybuild")]
struct Derived {
    #[property(extends)]
    base: Base,
    #[property(default = "2")]
    version: i64,
    #[property]
    label: Option<String>,
}


fn main() {

    let derived = Derived::construct().unwrap();
    assert_eq!(Derived::property_names().unwrap(), vec!["id", "version", "label"]);
    assert_eq!(*derived.get_version(), 2);
    assert_eq!(derived.base.get_id(), &None);

}
