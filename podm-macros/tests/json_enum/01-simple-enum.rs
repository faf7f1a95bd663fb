use podm_core::JsonEnum;
use podm_macros::JsonEnum;


#[derive(Debug, Clone, Copy, PartialEq, Eq, JsonEnum)]
enum Color {
    #[json_enum(name = "RED")]
    Red = 1,
    #[json_enum(name = "GREEN")]
    Green = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, JsonEnum)]
#[json_enum(name = "Priority", integer)]
enum Level {
    Low = 1,
    High = 5,
}


fn main() {

    assert_eq!(Color::Red.name(), "RED");
    assert_eq!(Color::from_value(2), Some(Color::Green));
    assert_eq!(Color::member_names(), vec!["RED", "GREEN"]);

    assert!(Level::INTEGER);
    assert_eq!(Level::NAME, "Priority");
    assert_eq!(Level::from_name("High"), Some(Level::High));

}
