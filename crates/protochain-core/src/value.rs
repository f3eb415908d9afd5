//! Values
//!
//! Primitives are held by value. Records, arrays and callables are held by
//! id, so copying a `Value` copies the reference, never the composite.

use crate::{ArrayId, CallableId, ObjectError, RecordId, Result};
use serde::{Deserialize, Serialize};

/// A value stored in a record entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(Box<str>),
    Record(RecordId),
    Array(ArrayId),
    Callable(CallableId),
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Record(_) => "record",
            Value::Array(_) => "array",
            Value::Callable(_) => "function",
        }
    }

    /// Records and arrays: mutable through every reference
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Record(_) | Value::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))
    }

    pub fn as_record(&self) -> Option<RecordId> {
        match self {
            Value::Record(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into_boxed_str())
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::Record(id)
    }
}

impl From<ArrayId> for Value {
    fn from(id: ArrayId) -> Self {
        Value::Array(id)
    }
}

impl From<CallableId> for Value {
    fn from(id: CallableId) -> Self {
        Value::Callable(id)
    }
}

/// Read a numeric constructor argument.
///
/// Fails with `InvalidArgument` when the argument is missing, is not a
/// number, or is NaN.
pub fn require_number(args: &[Value], index: usize, field: &str) -> Result<f64> {
    match args.get(index) {
        Some(Value::Number(n)) if !n.is_nan() => Ok(*n),
        Some(Value::Number(_)) => Err(ObjectError::invalid(format!("`{field}` is NaN"))),
        Some(other) => Err(ObjectError::invalid(format!(
            "`{field}` must be a number, got {}",
            other.type_name()
        ))),
        None => Err(ObjectError::invalid(format!("missing argument `{field}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_equality_is_identity() {
        assert_eq!(Value::Record(RecordId(1)), Value::Record(RecordId(1)));
        assert_ne!(Value::Record(RecordId(1)), Value::Record(RecordId(2)));
        assert_ne!(Value::Record(RecordId(1)), Value::Array(ArrayId(1)));
    }

    #[test]
    fn test_require_number() {
        let args = [Value::from(2), Value::Number(f64::NAN), Value::from("3")];
        assert_eq!(require_number(&args, 0, "real"), Ok(2.0));
        assert!(matches!(require_number(&args, 1, "imaginary"), Err(ObjectError::InvalidArgument(_))));
        assert!(matches!(require_number(&args, 2, "imaginary"), Err(ObjectError::InvalidArgument(_))));
        assert_eq!(
            require_number(&args, 3, "imaginary"),
            Err(ObjectError::InvalidArgument("missing argument `imaginary`".into()))
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(RecordId(4)).as_record(), Some(RecordId(4)));
        assert_eq!(Value::from("4").as_record(), None);
        assert_eq!(Value::from(2.5).as_number(), Some(2.5));
        assert_eq!(Value::from(true).as_number(), None);
        assert_eq!(Value::from(String::from("doc")).as_str(), Some("doc"));
    }

    #[test]
    fn test_composite_classification() {
        assert!(Value::Array(ArrayId(0)).is_composite());
        assert!(!Value::Callable(CallableId(0)).is_composite());
        assert!(Value::Null.is_primitive());
    }
}
