#![warn(missing_debug_implementations)]

mod json;
pub use json::{JsonCodec, JsonData};
