//! Best-effort value conversion.
//!
//! [`coerce`] returns the converted value or a [`CoercionFailure`]. Callers
//! treat a failure as a missing value; it is never propagated past the column
//! validator that asked for the conversion.

use crate::{ColumnType, CoercionFailure, DataValue};

/// Converts `value` to `target`.
///
/// - strings: integers and floats are rendered as text, strings pass through
/// - integers: whole finite floats narrow, text is trimmed and parsed as `i64`
/// - floats: integers widen, text is trimmed and parsed as a finite `f64`
///
/// Null never converts.
pub fn coerce(value: &DataValue, target: ColumnType) -> Result<DataValue, CoercionFailure> {
    if value.is_of_type(target) {
        return Ok(value.clone());
    }

    let converted = match (value, target) {
        (DataValue::Null, _) => None,
        (DataValue::Int(_) | DataValue::Float(_), ColumnType::String) => {
            Some(DataValue::String(value.render()))
        }
        (DataValue::Float(f), ColumnType::Integer) => float_to_int(*f).map(DataValue::Int),
        (DataValue::String(s), ColumnType::Integer) => {
            s.trim().parse::<i64>().ok().map(DataValue::Int)
        }
        (DataValue::Int(i), ColumnType::Float) => Some(DataValue::Float(*i as f64)),
        (DataValue::String(s), ColumnType::Float) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(DataValue::Float),
        _ => None,
    };

    converted.ok_or_else(|| CoercionFailure::new(value, target))
}

fn float_to_int(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_string() {
        assert_eq!(
            coerce(&DataValue::Int(3), ColumnType::String).unwrap(),
            DataValue::String("3".into())
        );
        assert_eq!(
            coerce(&DataValue::Float(1.5), ColumnType::String).unwrap(),
            DataValue::String("1.5".into())
        );
        assert!(coerce(&DataValue::Null, ColumnType::String).is_err());
    }

    #[test]
    fn test_to_integer() {
        assert_eq!(
            coerce(&" 42 ".into(), ColumnType::Integer).unwrap(),
            DataValue::Int(42)
        );
        assert_eq!(
            coerce(&DataValue::Float(10.0), ColumnType::Integer).unwrap(),
            DataValue::Int(10)
        );
        assert!(coerce(&DataValue::Float(10.5), ColumnType::Integer).is_err());
        assert!(coerce(&"abc".into(), ColumnType::Integer).is_err());
        assert!(coerce(&" -  ".into(), ColumnType::Integer).is_err());
        assert!(coerce(&"2.5".into(), ColumnType::Integer).is_err());
    }

    #[test]
    fn test_to_float() {
        assert_eq!(
            coerce(&DataValue::Int(7), ColumnType::Float).unwrap(),
            DataValue::Float(7.0)
        );
        assert_eq!(
            coerce(&"1250.75".into(), ColumnType::Float).unwrap(),
            DataValue::Float(1250.75)
        );
        assert!(coerce(&"NaN".into(), ColumnType::Float).is_err());
        assert!(coerce(&"".into(), ColumnType::Float).is_err());
    }

    #[test]
    fn test_failure_carries_target() {
        let err = coerce(&"abc".into(), ColumnType::Float).unwrap_err();
        assert_eq!(err.target, ColumnType::Float);
        assert_eq!(err.value, "abc");
    }
}
