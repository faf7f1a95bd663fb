#![allow(dead_code)]

use chrono::{DateTime, Datelike, Duration, Local, TimeZone, Timelike};
use podm_core::{Dynamic, FnHandler, Handler, JsonObject};
use podm_macros::{JsonEnum, JsonObject};
use serde_json::{Value, json};

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Side-effect flag that survives being read through `&self`.
#[derive(Debug, Default)]
pub struct Flag(AtomicBool);

impl Flag {

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn lower(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

}

impl Clone for Flag {
    fn clone(&self) -> Self {
        Flag(AtomicBool::new(self.is_raised()))
    }
}

fn encode_rfc3339(value: &DateTime<Local>) -> Value {
    Value::String(value.to_rfc3339())
}

fn decode_rfc3339(value: Value) -> Option<DateTime<Local>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|d| d.with_timezone(&Local))
}

pub fn timestamp_handler() -> FnHandler<DateTime<Local>> {
    FnHandler::new(encode_rfc3339, decode_rfc3339)
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Entity {
    #[property]
    pub oid: Option<String>,
    #[property(default_with = "Local::now", handler = "timestamp_handler()")]
    pub created: DateTime<Local>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Company {
    #[property(extends)]
    pub entity: Entity,
    #[property(json = "company-name")]
    pub company_name: Option<String>,
    #[property(getter)]
    pub description: Option<String>,
    pub used_getter: Flag,
}

impl Company {

    pub fn get_description(&self) -> &Option<String> {
        self.used_getter.raise();
        &self.description
    }

}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Employee {
    #[property(extends)]
    pub entity: Entity,
    #[property]
    pub name: Option<String>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Sector {
    #[property(extends)]
    pub entity: Entity,
    #[property(default = "Vec::new()")]
    pub employees: Vec<Employee>,
}

pub struct DateTimeHandler;

impl Handler<DateTime<Local>> for DateTimeHandler {

    fn encode(&self, value: &DateTime<Local>) -> Value {
        json!({
            "year": value.year(),
            "month": value.month(),
            "day": value.day(),
            "hour": value.hour(),
            "minute": value.minute(),
            "second": value.second(),
            "microsecond": value.timestamp_subsec_micros(),
        })
    }

    fn decode(&self, value: Value) -> Option<DateTime<Local>> {
        let part = |key: &str| value.get(key).and_then(Value::as_u64);

        let date = Local
            .with_ymd_and_hms(
                part("year")? as i32,
                part("month")? as u32,
                part("day")? as u32,
                part("hour")? as u32,
                part("minute")? as u32,
                part("second")? as u32,
            )
            .earliest()?;
        Some(date + Duration::microseconds(part("microsecond")? as i64))
    }

}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common", after_deserialize = "Stamped::mark_deserialized")]
pub struct Stamped {
    #[property(json = "date-time", handler = "DateTimeHandler", default_with = "Local::now")]
    pub date_time: DateTime<Local>,
    pub deserialized: bool,
}

impl Stamped {

    fn mark_deserialized(&mut self) {
        self.deserialized = true;
    }

}

pub struct BoolHandler;

impl Handler<Option<bool>> for BoolHandler {

    fn encode(&self, value: &Option<bool>) -> Value {
        json!(value)
    }

    fn decode(&self, value: Value) -> Option<Option<bool>> {
        match value {
            Value::Null => Some(None),
            Value::String(s) => Some(Some(s.to_lowercase() == "true")),
            other => Some(Some(other.to_string().to_lowercase() == "true")),
        }
    }

}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Switches {
    #[property(handler = "BoolHandler")]
    pub some_boolean_1: Option<bool>,
    #[property(handler = "BoolHandler")]
    pub some_boolean_2: Option<bool>,
    #[property(handler = "BoolHandler")]
    pub some_boolean_3: Option<bool>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Triple {
    #[property]
    pub val1: Option<String>,
    #[property]
    pub val2: Option<bool>,
    #[property]
    pub val3: Option<String>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Catalog {
    #[property]
    pub ordered: BTreeMap<String, String>,
    #[property]
    pub unordered: HashMap<String, i64>,
    #[property]
    pub by_name: BTreeMap<String, Employee>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, JsonEnum)]
pub enum Color {
    #[json_enum(name = "RED")]
    Red = 1,
    #[json_enum(name = "GREEN")]
    Green = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, JsonEnum)]
#[json_enum(integer)]
pub enum Level {
    #[json_enum(name = "LOW")]
    Low = 10,
    #[json_enum(name = "HIGH")]
    High = 20,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Palette {
    #[property]
    pub primary: Option<Color>,
    #[property(enum_as_str)]
    pub secondary: Option<Color>,
    #[property(enum_as_str)]
    pub level: Option<Level>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common", enveloped)]
pub struct Envelope {
    #[property]
    pub subject: Option<String>,
    #[property]
    pub body: Option<String>,
}

static TICKETS: AtomicU64 = AtomicU64::new(1);

pub fn next_ticket() -> u64 {
    TICKETS.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Ticket {
    #[property(default_with = "next_ticket")]
    pub number: u64,
    #[property(default = "vec![\"open\".to_string()]")]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Team {
    #[property]
    pub lead: Option<Employee>,
    #[property]
    pub members: Vec<Employee>,
    #[property]
    pub sector: Option<Sector>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Node {
    #[property]
    pub label: Option<String>,
    #[property]
    pub child: Option<Box<Node>>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common", untyped)]
pub struct Described {
    #[property(
        default = "Some(\"anonymous\".to_string())",
        title = "Name",
        pattern = "^[a-z]+$",
        description = "Lowercase name"
    )]
    pub name: Option<String>,
    #[property(format = "email")]
    pub email: Option<String>,
    #[property(schema_ref = "https://example.com/schemas/address.json")]
    pub address: Option<Value>,
    #[property(schema = r#"{"type": "integer", "minimum": 0}"#)]
    pub count: i64,
}

static COUNTED_CALLS: AtomicU64 = AtomicU64::new(0);

pub fn counted() -> u64 {
    COUNTED_CALLS.fetch_add(1, Ordering::SeqCst) + 1
}

pub fn counted_calls() -> u64 {
    COUNTED_CALLS.load(Ordering::SeqCst)
}

/// Only used by the factory call count test, so the counter stays exact.
#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Counted {
    #[property(default_with = "counted")]
    pub n: u64,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.payload")]
pub struct Leaf {
    #[property]
    pub name: Option<String>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "tests.common")]
pub struct Holder {
    #[property]
    pub payload: Dynamic,
}

pub fn employee(oid: &str, name: &str) -> Employee {
    Employee::with_values([("oid", json!(oid)), ("name", json!(name))]).unwrap()
}
