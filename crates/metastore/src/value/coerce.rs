//! Lenient conversions from raw [`Value`]s.
//!
//! Metadata is read by code that did not write it, so a conversion never
//! fails. Anything that cannot be converted yields a fixed default: `""`,
//! `0`, `0.0` or `false`.

use serde_json::{Number, Value};

/// Render a value as text. `Null` becomes the empty string, strings are
/// returned verbatim and everything else uses its JSON form.
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert to a 64-bit integer.
///
/// Numbers truncate toward zero and saturate at the `i64` bounds. Strings are
/// trimmed and parsed, first as an integer and then as a float, which
/// saturates the same way.
pub fn to_long(value: &Value) -> i64 {
    match value {
        Value::Number(n) => number_to_long(n),
        Value::String(s) => parse_long(s),
        _ => 0,
    }
}

/// Convert to a 32-bit integer, clamping [`to_long`] into range.
pub fn to_int(value: &Value) -> i32 {
    to_long(value).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Convert to a double. Non-numeric strings and non-numbers yield `0.0`.
pub fn to_double(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Convert to a float by narrowing [`to_double`].
pub fn to_float(value: &Value) -> f32 {
    to_double(value) as f32
}

/// Convert to a boolean.
///
/// Numbers are true when their integer part is non-zero and strings only
/// when they are exactly `true` (any case, no surrounding whitespace). Arrays and objects count as present,
/// hence true; `Null` is false.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => number_to_long(n) != 0,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn number_to_long(n: &Number) -> i64 {
    if let Some(i) = n.as_i64() {
        i
    } else if n.is_u64() {
        i64::MAX
    } else {
        // `as` truncates and saturates
        n.as_f64().map_or(0, |f| f as i64)
    }
}

fn parse_long(s: &str) -> i64 {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|f| !f.is_nan())
                .map(|f| f as i64)
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&json!("FOO")), "FOO");
        assert_eq!(to_string(&json!(10)), "10");
        assert_eq!(to_string(&json!(true)), "true");
        assert_eq!(to_string(&Value::Null), "");
        assert_eq!(to_string(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_to_long_numbers() {
        assert_eq!(to_long(&json!(42)), 42);
        assert_eq!(to_long(&json!(-7)), -7);
        assert_eq!(to_long(&json!(3.9)), 3);
        assert_eq!(to_long(&json!(-3.9)), -3);
        assert_eq!(to_long(&json!(u64::MAX)), i64::MAX);
        assert_eq!(to_long(&json!(1e300)), i64::MAX);
    }

    #[test]
    fn test_to_long_strings() {
        assert_eq!(to_long(&json!("123")), 123);
        assert_eq!(to_long(&json!("  12 ")), 12);
        assert_eq!(to_long(&json!("2.75")), 2);
        assert_eq!(to_long(&json!("abc")), 0);
        assert_eq!(to_long(&json!("1e300")), i64::MAX);
        assert_eq!(to_long(&json!("1e400")), i64::MAX);
        assert_eq!(to_long(&json!("-1e400")), i64::MIN);
        assert_eq!(to_long(&json!("NaN")), 0);
    }

    #[test]
    fn test_to_long_fallbacks() {
        assert_eq!(to_long(&Value::Null), 0);
        assert_eq!(to_long(&json!(true)), 0);
        assert_eq!(to_long(&json!({"a": 1})), 0);
    }

    #[test]
    fn test_to_int_clamps() {
        assert_eq!(to_int(&json!(5)), 5);
        assert_eq!(to_int(&json!(i64::MAX)), i32::MAX);
        assert_eq!(to_int(&json!(i64::MIN)), i32::MIN);
    }

    #[test]
    fn test_to_double_and_float() {
        assert_eq!(to_double(&json!(1.5)), 1.5);
        assert_eq!(to_double(&json!(2)), 2.0);
        assert_eq!(to_double(&json!("0.25")), 0.25);
        assert_eq!(to_double(&json!("nope")), 0.0);
        assert_eq!(to_double(&json!(false)), 0.0);
        assert_eq!(to_float(&json!(0.5)), 0.5f32);
    }

    #[test]
    fn test_to_boolean() {
        assert!(to_boolean(&json!(true)));
        assert!(!to_boolean(&json!(false)));
        assert!(to_boolean(&json!(1)));
        assert!(!to_boolean(&json!(0)));
        assert!(!to_boolean(&json!(0.5)));
        assert!(to_boolean(&json!("TRUE")));
        assert!(!to_boolean(&json!("yes")));
        assert!(!to_boolean(&json!(" true ")));
        assert!(!to_boolean(&Value::Null));
        assert!(to_boolean(&json!([])));
    }
}
