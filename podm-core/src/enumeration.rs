use crate::{Conversion, EnumType, FieldType, Result};

use log::debug;
use serde_json::Value;

/// A fieldless enum usable as a property value.
///
/// Members are encoded by their numeric value unless the property asks for
/// string form. Integer enums (`INTEGER = true`) are always numeric.
pub trait JsonEnum: Copy + Send + Sync + 'static {

    const NAME: &'static str;
    const INTEGER: bool = false;
    const VARIANTS: &'static [Self];

    fn name(&self) -> &'static str;

    fn value(&self) -> i64;

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.name() == name)
    }

    fn from_value(value: i64) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.value() == value)
    }

    fn member_names() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.name()).collect()
    }

}

pub fn field_type<E: JsonEnum>() -> FieldType {
    FieldType::Enum(EnumType {
        name: E::NAME,
        integer: E::INTEGER,
        names: E::member_names(),
    })
}

pub fn encode<E: JsonEnum>(member: &E, conv: &Conversion<'_>) -> Result<Value> {
    if E::INTEGER || !conv.enum_as_str {
        Ok(Value::from(member.value()))
    } else {
        Ok(Value::String(member.name().to_string()))
    }
}

pub fn decode<E: JsonEnum>(value: Value, _conv: &Conversion<'_>) -> Result<Option<E>> {
    let member = match &value {
        Value::String(name) => E::from_name(name),
        Value::Number(number) => integral(number).and_then(E::from_value),
        _ => None,
    };
    if member.is_none() {
        debug!("{}: no member matches {value}", E::NAME);
    }
    Ok(member)
}

// `2.0` names the same member as `2`.
fn integral(number: &serde_json::Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

#[macro_export]
macro_rules! enum_value {
    ($ty:ty) => {
        impl $crate::PropertyValue for $ty {
            fn field_type() -> $crate::FieldType {
                $crate::enumeration::field_type::<Self>()
            }

            fn to_json(&self, conv: &$crate::Conversion<'_>) -> $crate::Result<$crate::serde_json::Value> {
                $crate::enumeration::encode(self, conv)
            }

            fn from_json(
                value: $crate::serde_json::Value,
                conv: &$crate::Conversion<'_>,
            ) -> $crate::Result<::std::option::Option<Self>> {
                $crate::enumeration::decode(value, conv)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, PropertyValue};
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Shade {
        Light = 1,
        Dark = 2,
    }

    impl JsonEnum for Shade {
        const NAME: &'static str = "Shade";
        const VARIANTS: &'static [Self] = &[Shade::Light, Shade::Dark];

        fn name(&self) -> &'static str {
            match self {
                Shade::Light => "LIGHT",
                Shade::Dark => "DARK",
            }
        }

        fn value(&self) -> i64 {
            *self as i64
        }
    }

    crate::enum_value!(Shade);

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Level {
        Low = 10,
    }

    impl JsonEnum for Level {
        const NAME: &'static str = "Level";
        const INTEGER: bool = true;
        const VARIANTS: &'static [Self] = &[Level::Low];

        fn name(&self) -> &'static str {
            "LOW"
        }

        fn value(&self) -> i64 {
            *self as i64
        }
    }

    crate::enum_value!(Level);

    #[test]
    fn encodes_by_mode() {
        let ctx = Context::default();
        let conv = Conversion::new(&ctx, "tests");

        assert_eq!(Shade::Dark.to_json(&conv).unwrap(), json!(2));
        assert_eq!(Shade::Dark.to_json(&conv.with_enum_as_str(true)).unwrap(), json!("DARK"));
        assert_eq!(Level::Low.to_json(&conv.with_enum_as_str(true)).unwrap(), json!(10));
    }

    #[test]
    fn decodes_by_name_or_value() {
        let ctx = Context::default();
        let conv = Conversion::new(&ctx, "tests");

        assert_eq!(Shade::from_json(json!("LIGHT"), &conv).unwrap(), Some(Shade::Light));
        assert_eq!(Shade::from_json(json!(2), &conv).unwrap(), Some(Shade::Dark));
        // unmatched values are not an error
        assert_eq!(Shade::from_json(json!(7), &conv).unwrap(), None);
        assert_eq!(Shade::from_json(json!("PURPLE"), &conv).unwrap(), None);
    }

    #[test]
    fn integral_floats_match_members() {
        let ctx = Context::default();
        let conv = Conversion::new(&ctx, "tests");

        assert_eq!(Shade::from_json(json!(2.0), &conv).unwrap(), Some(Shade::Dark));
        assert_eq!(Level::from_json(json!(10.0), &conv).unwrap(), Some(Level::Low));
        assert_eq!(Shade::from_json(json!(1.5), &conv).unwrap(), None);
        assert_eq!(Shade::from_json(json!(true), &conv).unwrap(), None);
    }
}
