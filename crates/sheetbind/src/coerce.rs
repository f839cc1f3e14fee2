//! Type-directed conversion of cells into field values.

use std::fmt;

use serde::Serialize;

use crate::error::CellError;
use crate::record::{FieldKind, Setter};
use crate::sheet::Cell;

/// A converted cell value, tagged by field kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i32),
    Int64(i64),
    Float(f64),
    String(String),
    /// Produced for fields whose kind cannot be converted
    Unset,
}

impl Value {
    /// Zero value of a kind: `0`, `0`, `0.0`, `""`
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Int => Value::Int(0),
            FieldKind::Int64 => Value::Int64(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::String => Value::String(String::new()),
            FieldKind::Unsupported(_) => Value::Unset,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Unset => Ok(()),
        }
    }
}

/// Convert `cell` to a value of `kind`.
///
/// Numeric kinds use the cell's typed accessor and propagate its error.
/// Strings always succeed with the raw text. Unsupported kinds yield
/// [`Value::Unset`] without error.
pub fn coerce<C: Cell + ?Sized>(kind: FieldKind, cell: &C) -> Result<Value, CellError> {
    let value = match kind {
        FieldKind::Int => Value::Int(cell.int()?),
        FieldKind::Int64 => Value::Int64(cell.int64()?),
        FieldKind::Float => Value::Float(cell.float()?),
        FieldKind::String => Value::String(cell.string()),
        FieldKind::Unsupported(_) => Value::Unset,
    };
    Ok(value)
}

impl<R> Setter<R> {
    /// Store `value` into `record`.
    ///
    /// Values of a different kind than the setter are ignored; `coerce` never
    /// produces them for the setter's own kind.
    pub fn assign(&self, record: &mut R, value: Value) {
        match (self, value) {
            (Setter::Int(set), Value::Int(v)) => set(record, v),
            (Setter::Int64(set), Value::Int64(v)) => set(record, v),
            (Setter::Float(set), Value::Float(v)) => set(record, v),
            (Setter::String(set), Value::String(v)) => set(record, v),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::CellValue;

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce(FieldKind::Int, "30").unwrap(), Value::Int(30));
        assert_eq!(coerce(FieldKind::Int64, "-7").unwrap(), Value::Int64(-7));
        assert_eq!(coerce(FieldKind::Float, "95.5").unwrap(), Value::Float(95.5));
    }

    #[test]
    fn test_coerce_propagates_cell_error() {
        let err = coerce(FieldKind::Int, "x").unwrap_err();
        assert_eq!(err, "x".int().unwrap_err());
    }

    #[test]
    fn test_coerce_string_never_fails() {
        assert_eq!(
            coerce(FieldKind::String, &CellValue::Float(10.0)).unwrap(),
            Value::String("10".to_string())
        );
        assert_eq!(
            coerce(FieldKind::String, &CellValue::Empty).unwrap(),
            Value::String(String::new())
        );
    }

    #[test]
    fn test_coerce_unsupported_is_unset() {
        let value = coerce(FieldKind::Unsupported("bool"), "true").unwrap();
        assert_eq!(value, Value::Unset);
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero(FieldKind::Int), Value::Int(0));
        assert_eq!(Value::zero(FieldKind::Int64), Value::Int64(0));
        assert_eq!(Value::zero(FieldKind::Float), Value::Float(0.0));
    }

    #[test]
    fn test_assign_matching_kind_only() {
        #[derive(Default)]
        struct Rec {
            age: i32,
        }
        let setter: Setter<Rec> = Setter::Int(|r: &mut Rec, v| r.age = v);
        let mut rec = Rec::default();

        setter.assign(&mut rec, Value::Int(5));
        assert_eq!(rec.age, 5);

        setter.assign(&mut rec, Value::String("9".to_string()));
        assert_eq!(rec.age, 5);
    }
}
