//! Integration tests for locations and literal values.

use nearlyc_common::{Location, Value, ValueError, ValueKind};

#[test]
fn test_location_advance_and_next_line() {
    let mut loc = Location::new("input.c", 1, 1);
    loc.advance(4);
    assert_eq!((loc.line(), loc.col()), (1, 5));
    loc.next_line();
    assert_eq!((loc.line(), loc.col()), (2, 1));
    assert!(loc.is_valid());
    assert_eq!(loc.to_string(), "input.c:2:1");
}

#[test]
fn test_default_location_is_invalid() {
    assert!(!Location::default().is_valid());
}

#[test]
fn test_value_u64_max_round_trip() {
    let v = Value::convert_str("18446744073709551615", ValueKind::Int).unwrap();
    assert_eq!(v.magnitude(), u64::MAX);
}

#[test]
fn test_value_out_of_range() {
    let err = Value::convert_str("99999999999999999999999999", ValueKind::Int).unwrap_err();
    assert!(matches!(err, ValueError::TooLarge(_)));
    assert_eq!(
        err.to_string(),
        "Value '99999999999999999999999999' is too large to represent"
    );
}

#[test]
fn test_fp_range() {
    assert!(matches!(
        Value::convert_str("1e400", ValueKind::Fp),
        Err(ValueError::TooLarge(_))
    ));
    assert!(matches!(
        Value::convert_str("1e-400", ValueKind::Fp),
        Err(ValueError::TooSmall(_))
    ));
    let v = Value::convert_str("2.5", ValueKind::Fp).unwrap();
    assert_eq!(v.fp_value(), 2.5);
}
