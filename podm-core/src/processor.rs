use serde_json::Value;

/// Key/value rewrite hook applied to every field during encode and decode.
pub trait Processor: Send + Sync {

    fn when_to_dict(&self, key: String, value: Value) -> (String, Value);

    fn when_from_dict(&self, key: String, value: Value) -> (String, Value);

}

/// Passes every pair through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProcessor;

impl Processor for NoopProcessor {

    fn when_to_dict(&self, key: String, value: Value) -> (String, Value) {
        (key, value)
    }

    fn when_from_dict(&self, key: String, value: Value) -> (String, Value) {
        (key, value)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn noop_keeps_pairs() {
        let p = NoopProcessor;
        assert_eq!(p.when_to_dict("a".into(), json!(1)), ("a".to_string(), json!(1)));
        assert_eq!(p.when_from_dict("b".into(), json!([2])), ("b".to_string(), json!([2])));
    }
}
