use serde_json::Number;

use super::{EncodeError, PropertyType};
use crate::types::Value;

pub fn all() -> Vec<PropertyType> {
    vec![
        any(),
        boolean(),
        string(),
        number(),
        natural(),
        opacity(),
        range(),
        choice(),
        array(),
    ]
}

pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_number(value: &Value) -> Result<f64, EncodeError> {
    value.as_f64().ok_or(EncodeError::TypeMismatch {
        expected: "number",
        actual: kind_of(value),
    })
}

fn check_bounds(value: &Value, number: f64, min: f64, max: f64) -> Result<(), EncodeError> {
    if number < min || number > max {
        return Err(EncodeError::OutOfRange {
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

pub fn any() -> PropertyType {
    PropertyType::new("any")
}

pub fn boolean() -> PropertyType {
    PropertyType::new("boolean").with_encoder(|value, _| match value {
        Value::Bool(_) => Ok(value),
        other => Err(EncodeError::TypeMismatch {
            expected: "boolean",
            actual: kind_of(&other),
        }),
    })
}

/// Numbers and booleans are stringified, anything else is rejected
pub fn string() -> PropertyType {
    PropertyType::new("string").with_encoder(|value, _| match value {
        Value::String(_) => Ok(value),
        Value::Number(number) => Ok(Value::String(number.to_string())),
        Value::Bool(flag) => Ok(Value::String(flag.to_string())),
        other => Err(EncodeError::TypeMismatch {
            expected: "string",
            actual: kind_of(&other),
        }),
    })
}

pub fn number() -> PropertyType {
    PropertyType::new("number").with_encoder(|value, _| {
        expect_number(&value)?;
        Ok(value)
    })
}

/// Non-negative integer, fractional input is rounded
/// Largest `f64` below 2^64, so every accepted value fits a `u64`
const MAX_NATURAL: f64 = 18_446_744_073_709_549_568.0;

pub fn natural() -> PropertyType {
    PropertyType::new("natural").with_encoder(|value, _| {
        let number = expect_number(&value)?;
        check_bounds(&value, number, 0.0, MAX_NATURAL)?;
        Ok(Value::Number(Number::from(number.round() as u64)))
    })
}

pub fn opacity() -> PropertyType {
    PropertyType::new("opacity").with_encoder(|value, _| {
        let number = expect_number(&value)?;
        check_bounds(&value, number, 0.0, 1.0)?;
        Ok(value)
    })
}

/// `["range", min, max]`
pub fn range() -> PropertyType {
    PropertyType::new("range").with_encoder(|value, args| {
        let number = expect_number(&value)?;
        let (Some(min), Some(max)) = (
            args.first().and_then(Value::as_f64),
            args.get(1).and_then(Value::as_f64),
        ) else {
            return Err(EncodeError::InvalidArguments {
                type_name: "range",
                reason: "expected numeric min and max",
            });
        };
        check_bounds(&value, number, min, max)?;
        Ok(value)
    })
}

/// `["choice", a, b, ...]`
pub fn choice() -> PropertyType {
    PropertyType::new("choice").with_encoder(|value, args| {
        if args.is_empty() {
            return Err(EncodeError::InvalidArguments {
                type_name: "choice",
                reason: "no accepted values given",
            });
        }
        if args.contains(&value) {
            return Ok(value);
        }
        Err(EncodeError::NotAccepted {
            value: value.to_string(),
            accepted: Value::Array(args.to_vec()).to_string(),
        })
    })
}

/// `"array"` or `["array", item_kind]` where `item_kind` is a JSON kind name
pub fn array() -> PropertyType {
    PropertyType::new("array").with_encoder(|value, args| {
        let Value::Array(items) = &value else {
            return Err(EncodeError::TypeMismatch {
                expected: "array",
                actual: kind_of(&value),
            });
        };
        if let Some(item_kind) = args.first().and_then(Value::as_str) {
            if let Some(item) = items.iter().find(|item| kind_of(item) != item_kind) {
                return Err(EncodeError::NotAccepted {
                    value: item.to_string(),
                    accepted: format!("items of kind {}", item_kind),
                });
            }
        }
        Ok(value)
    })
}
