//! Assertion helpers for verification routines.
//!
//! All helpers compare JSON values, treat numbers by value (`1 == 1.0`), and
//! report failures located at the calling routine.
use crate::grading::Failure;
use crate::util::truncate_string;
use serde_json::{Number, Value};

/// Relative tolerance used by [`assert_approx`].
pub const APPROX_REL: f64 = 1e-6;
/// Absolute tolerance used by [`assert_approx`].
pub const APPROX_ABS: f64 = 1e-12;

const MAX_RENDERED_BYTES: usize = 512;

/// Structural equality with numeric-aware number comparison.
#[track_caller]
pub fn assert_equal(actual: &Value, expected: &Value) -> Result<(), Failure> {
    if values_equal(actual, expected) {
        Ok(())
    } else {
        Err(Failure::assertion(mismatch("!=", actual, expected)))
    }
}

/// Equality within `APPROX_REL` relative or `APPROX_ABS` absolute tolerance,
/// element-wise through arrays and objects.
#[track_caller]
pub fn assert_approx(actual: &Value, expected: &Value) -> Result<(), Failure> {
    let close: &dyn Fn(f64, f64) -> bool =
        &|a, b| a == b || (a - b).abs() <= f64::max(APPROX_REL * b.abs(), APPROX_ABS);
    if values_close(actual, expected, Some(close)) {
        Ok(())
    } else {
        Err(Failure::assertion(mismatch(
            "!= approx",
            actual,
            expected,
        )))
    }
}

/// Element-wise `|actual - expected| <= atol + rtol * |expected|` with
/// matching shapes.
#[track_caller]
pub fn assert_allclose(actual: &Value, expected: &Value, rtol: f64, atol: f64) -> Result<(), Failure> {
    let close: &dyn Fn(f64, f64) -> bool = &|a, b| a == b || (a - b).abs() <= atol + rtol * b.abs();
    if values_close(actual, expected, Some(close)) {
        Ok(())
    } else {
        Err(Failure::assertion(format!(
            "not close to tolerance rtol={rtol:e}, atol={atol:e}: {}",
            mismatch("vs", actual, expected)
        )))
    }
}

/// Compare two arrays as sets of elements.
#[track_caller]
pub fn assert_set_equal(actual: &Value, expected: &Value) -> Result<(), Failure> {
    let (Some(actual_items), Some(expected_items)) = (actual.as_array(), expected.as_array())
    else {
        return Err(Failure::assertion(format!(
            "expected two collections: {}",
            mismatch("vs", actual, expected)
        )));
    };
    let contains = |items: &[Value], item: &Value| items.iter().any(|other| values_equal(other, item));
    let missing: Vec<&Value> = expected_items
        .iter()
        .filter(|item| !contains(actual_items, item))
        .collect();
    let extra: Vec<&Value> = actual_items
        .iter()
        .filter(|item| !contains(expected_items, item))
        .collect();
    if missing.is_empty() && extra.is_empty() {
        return Ok(());
    }
    Err(Failure::assertion(format!(
        "sets differ: missing {}, unexpected {}",
        render(&Value::Array(missing.into_iter().cloned().collect())),
        render(&Value::Array(extra.into_iter().cloned().collect()))
    )))
}

/// Structural equality where numbers compare by value. Integers compare
/// exactly; floats only ever match by `f64` value.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    values_close(left, right, None)
}

fn values_close(
    left: &Value,
    right: &Value,
    close: Option<&dyn Fn(f64, f64) -> bool>,
) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_close(a, b, close),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_close(a, b, close))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, value)| {
                    b.get(key)
                        .is_some_and(|other| values_close(value, other, close))
                })
        }
        _ => left == right,
    }
}

/// `close` of `None` means exact comparison.
fn numbers_close(a: &Number, b: &Number, close: Option<&dyn Fn(f64, f64) -> bool>) -> bool {
    let within = |x: f64, y: f64| close.map_or(x == y, |close| close(x, y));
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y || close.is_some_and(|close| close(x as f64, y as f64));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y || close.is_some_and(|close| close(x as f64, y as f64));
    }
    if a.is_f64() || b.is_f64() {
        return match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => within(x, y),
            _ => false,
        };
    }
    // A negative i64 against a u64 beyond i64::MAX: never equal.
    match (close, a.as_f64(), b.as_f64()) {
        (Some(close), Some(x), Some(y)) => close(x, y),
        _ => false,
    }
}

fn mismatch(op: &str, actual: &Value, expected: &Value) -> String {
    format!("{} {op} {}", render(actual), render(expected))
}

fn render(value: &Value) -> String {
    let text = value.to_string();
    if text.len() <= MAX_RENDERED_BYTES {
        return text;
    }
    format!("{}...", truncate_string(&text, MAX_RENDERED_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::KIND_ASSERTION;
    use serde_json::json;
    use std::f64::consts::PI;

    #[test]
    fn equal_treats_integers_and_floats_alike() {
        assert!(assert_equal(&json!([[1, 2], [3, 4]]), &json!([[1.0, 2.0], [3, 4.0]])).is_ok());
        assert!(assert_equal(&json!({"a": 1}), &json!({"a": 1.0})).is_ok());
        assert!(assert_equal(&json!([1, 2]), &json!([1, 2, 3])).is_err());
        assert!(assert_equal(&json!("2"), &json!(2)).is_err());
    }

    #[test]
    fn equal_compares_large_integers_exactly() {
        let above = json!(9_007_199_254_740_993_i64);
        let below = json!(9_007_199_254_740_992_i64);
        assert!(assert_equal(&above, &below).is_err());
        assert!(assert_equal(&above, &above).is_ok());
        assert!(assert_equal(&json!(u64::MAX), &json!(u64::MAX - 1)).is_err());
        assert!(assert_equal(&json!(u64::MAX), &json!(u64::MAX)).is_ok());
        assert!(assert_equal(&json!(-1), &json!(u64::MAX)).is_err());
        assert!(assert_approx(&above, &below).is_ok());
    }

    #[test]
    fn equal_failure_describes_both_sides() {
        let failure = assert_equal(&json!(2), &json!(3)).expect_err("mismatch");
        assert_eq!(failure.kind, KIND_ASSERTION);
        assert_eq!(failure.message, "2 != 3");
        assert!(failure
            .location
            .as_deref()
            .is_some_and(|location| location.starts_with(file!())));
    }

    #[test]
    fn approx_uses_relative_tolerance() {
        assert!(assert_approx(&json!(8.0 * PI), &json!(25.132741228718345)).is_ok());
        assert!(assert_approx(&json!(1.0000001), &json!(1.0)).is_ok());
        assert!(assert_approx(&json!(1.001), &json!(1.0)).is_err());
        assert!(assert_approx(&json!(0), &json!(0)).is_ok());
        assert!(assert_approx(&json!({"x": 2.0000000001}), &json!({"x": 2})).is_ok());
    }

    #[test]
    fn allclose_checks_shape_and_tolerance() {
        let expected = json!([-2.121320343559643, 3.5355339059327373]);
        assert!(assert_allclose(&json!([-2.1213203435596424, 3.5355339059327378]), &expected, 1e-7, 1e-9).is_ok());
        assert!(assert_allclose(&json!([-2.12, 3.53]), &expected, 1e-7, 1e-9).is_err());
        assert!(assert_allclose(&json!([1.0]), &json!([1.0, 2.0]), 1e-7, 1e-9).is_err());
        assert!(assert_allclose(&json!([1e-10, 0]), &json!([0, 0]), 1e-7, 1e-9).is_ok());
    }

    #[test]
    fn set_equal_ignores_order_and_reports_differences() {
        assert!(assert_set_equal(&json!([8, 1, 2]), &json!([1, 2, 8])).is_ok());
        assert!(assert_set_equal(&json!([]), &json!([])).is_ok());
        let failure = assert_set_equal(&json!([1, 3]), &json!([1, 2])).expect_err("differ");
        assert_eq!(failure.message, "sets differ: missing [2], unexpected [3]");
        assert!(assert_set_equal(&json!(1), &json!([1])).is_err());
    }

    #[test]
    fn long_values_are_truncated_in_messages() {
        let long = Value::String("x".repeat(2048));
        let failure = assert_equal(&long, &json!("y")).expect_err("mismatch");
        assert!(failure.message.len() < 1100);
        assert!(failure.message.contains("..."));
    }
}
