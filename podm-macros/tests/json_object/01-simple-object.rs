use podm_core::JsonObject;
use podm_macros::JsonObject;


#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "trybuild")]
struct Point {
    #[property]
    x: i64,
    #[property(json = "y_coord")]
    y: i64,
}


fn main() {

    let mut point = Point::construct().unwrap();
    point.set_x(3);
    point.set_y(4);

    assert_eq!(*point.get_x(), 3);
    assert_eq!(Point::object_type_name(), "trybuild.Point");
    assert_eq!(Point::json_field_names().unwrap(), vec!["x", "y_coord"]);

    let dict = point.to_dict().unwrap();
    let back = Point::from_dict(serde_json::Value::Object(dict)).unwrap().unwrap();
    assert_eq!(back, point);
    assert_eq!(back.to_string(), "Point:x=3;y=4");

}
