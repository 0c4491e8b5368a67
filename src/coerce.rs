//! Typecasting of raw values into the canonical form of a declared type
//!
//! Every write and every default passes through [`coerce`]. Most types are
//! best effort and never fail (an unparseable integer becomes `0`), while
//! `decimal` and `hash` reject input they cannot represent with
//! [`Error::Coercion`].
//!
//! | type | canonical form |
//! |------|----------------|
//! | `string`, `text`, `password` | JSON string (`null` becomes `""`) |
//! | `decimal` | JSON number with the decimal's exact digits (blank becomes `0`) |
//! | `integer` | JSON integer, leading digits of a string or `0` |
//! | `boolean` | `false` for `false`/`null`/`0`/`"f"`/`"false"`/`"0"`/empty, else `true` |
//! | `array` | JSON array (`null` becomes `[]`, scalars are wrapped) |
//! | `hash` | JSON object |
//! | `raw` | unchanged |

use crate::config::PreferenceType;
use crate::error::{Error, Result};
use bigdecimal::BigDecimal;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::str::FromStr;
use std::sync::LazyLock;

/// Strings read as `false` for boolean preferences, matched against the whole string
static FALSY_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(f|false|0)$").expect("falsy pattern is valid"));

/// Leading integer of a string: optional whitespace and sign, digits with single underscores
static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?[0-9]+(?:_[0-9]+)*)").expect("integer pattern is valid")
});

const EVEN_COUNT_REQUIRED: &str =
    "An even count is required when passing an array to be converted to a hash";

/// Typecast `value` into the canonical representation of `pref_type`
///
/// # Errors
///
/// Returns [`Error::Coercion`] when:
/// - a `decimal` value is neither blank nor valid numeric text
/// - a `hash` value is an odd-length array, holds a malformed pair, or is a
///   string that does not parse to a JSON object
///
/// # Example
/// ```rust
/// use preferable::{coerce, PreferenceType};
/// use serde_json::json;
///
/// assert_eq!(coerce(json!("24"), PreferenceType::Integer).unwrap(), json!(24));
/// assert_eq!(coerce(json!("yes"), PreferenceType::Boolean).unwrap(), json!(true));
/// assert_eq!(coerce(json!(null), PreferenceType::Array).unwrap(), json!([]));
/// assert!(coerce(json!(["a", 1, "b"]), PreferenceType::Hash).is_err());
/// ```
pub fn coerce(value: Value, pref_type: PreferenceType) -> Result<Value> {
    match pref_type {
        PreferenceType::String | PreferenceType::Text | PreferenceType::Password => {
            Ok(Value::String(to_text(value)))
        }
        PreferenceType::Decimal => to_decimal(&value).and_then(|d| decimal_to_value(&d)),
        PreferenceType::Integer => Ok(Value::from(to_integer(&value))),
        PreferenceType::Boolean => Ok(Value::Bool(to_boolean(&value))),
        PreferenceType::Array => Ok(Value::Array(to_array(value))),
        PreferenceType::Hash => to_hash(value).map(Value::Object),
        PreferenceType::Raw => Ok(value),
    }
}

// =============================================================================
// Per-type conversions
// =============================================================================

/// String representation of a value
///
/// `null` is the empty string, strings are taken as-is, and everything else
/// uses its compact JSON text.
#[must_use]
pub fn to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Arbitrary-precision decimal; blank input is zero
///
/// # Errors
///
/// Returns [`Error::Coercion`] for text that is not a valid decimal and for
/// values that have no numeric reading (`true`, non-empty arrays or objects).
pub fn to_decimal(value: &Value) -> Result<BigDecimal> {
    let text = match value {
        Value::Null | Value::Bool(false) => return Ok(BigDecimal::from(0_i64)),
        Value::String(s) if s.trim().is_empty() => return Ok(BigDecimal::from(0_i64)),
        Value::Array(items) if items.is_empty() => return Ok(BigDecimal::from(0_i64)),
        Value::Object(map) if map.is_empty() => return Ok(BigDecimal::from(0_i64)),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(Error::coercion(
                PreferenceType::Decimal,
                format!("{other} has no numeric value"),
            ));
        }
    };

    BigDecimal::from_str(&text).map_err(|e| {
        Error::coercion(
            PreferenceType::Decimal,
            format!("'{text}' is not a valid decimal: {e}"),
        )
    })
}

/// JSON number carrying the exact digits of `decimal`
fn decimal_to_value(decimal: &BigDecimal) -> Result<Value> {
    let text = decimal.to_string();
    serde_json::from_str::<Number>(&text)
        .map(Value::Number)
        .map_err(|e| {
            Error::coercion(
                PreferenceType::Decimal,
                format!("'{text}' cannot be stored as a number: {e}"),
            )
        })
}

/// Best-effort integer; never fails
///
/// Floats truncate toward zero, strings contribute their leading digits and
/// anything without a numeric reading is `0`. Out-of-range values saturate.
#[must_use]
pub fn to_integer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => leading_integer(s),
        _ => 0,
    }
}

fn leading_integer(text: &str) -> i64 {
    let Some(caps) = LEADING_INTEGER.captures(text) else {
        log::debug!("No leading integer in '{text}', coercing to 0");
        return 0;
    };
    let digits = caps[1].replace('_', "");
    digits.parse::<i64>().unwrap_or_else(|_| {
        if digits.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Inclusive falsy recognizer; anything not recognized as false is true
#[must_use]
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || FALSY_STRING.is_match(s)),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Sequence; arrays pass through, `null` is empty, anything else is wrapped
#[must_use]
pub fn to_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// String-keyed mapping
///
/// - objects pass through
/// - strings are parsed as JSON after rewriting `=>` to `:`, so
///   `{"a"=>1}` works but only with quoted keys
/// - arrays of `[key, value]` pairs, or flat `[k1, v1, k2, v2]` lists
/// - anything else becomes an empty mapping
///
/// # Errors
///
/// Returns [`Error::Coercion`] for odd-length flat arrays, malformed pairs and
/// strings that do not parse to a JSON object.
pub fn to_hash(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::String(s) => parse_hash_literal(&s),
        Value::Array(items) => hash_from_array(items),
        _ => Ok(Map::new()),
    }
}

fn parse_hash_literal(text: &str) -> Result<Map<String, Value>> {
    let normalized = text.replace("=>", ":");
    match serde_json::from_str::<Value>(&normalized) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::coercion(
            PreferenceType::Hash,
            format!("'{text}' parses to {other}, not a hash"),
        )),
        Err(e) => Err(Error::coercion(
            PreferenceType::Hash,
            format!("'{text}' is not a valid hash literal: {e}"),
        )),
    }
}

fn hash_from_array(items: Vec<Value>) -> Result<Map<String, Value>> {
    let mut map = Map::new();

    if !items.is_empty() && items.iter().all(Value::is_array) {
        for pair in items {
            let Value::Array(pair) = pair else {
                continue;
            };
            let [key, value]: [Value; 2] = pair
                .try_into()
                .map_err(|_| Error::coercion(PreferenceType::Hash, EVEN_COUNT_REQUIRED))?;
            map.insert(to_text(key), value);
        }
        return Ok(map);
    }

    if items.len() % 2 != 0 {
        return Err(Error::coercion(PreferenceType::Hash, EVEN_COUNT_REQUIRED));
    }

    let mut iter = items.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        map.insert(to_text(key), value);
    }
    Ok(map)
}

// =============================================================================
// Tests
// =============================================================================
