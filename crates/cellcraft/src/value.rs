//! Values produced when decoding a field from a packed identifier.

use std::fmt;

/// A decoded field value: signed fields yield `I64`, unsigned fields `U64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    I64(i64),
    U64(u64),
}

impl Value {
    /// Two's-complement bit pattern of the value.
    pub fn raw(self) -> u64 {
        match self {
            Value::I64(v) => v as u64,
            Value::U64(v) => v,
        }
    }

    /// Returns the value as `i64` when it fits.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(v),
            Value::U64(v) => i64::try_from(v).ok(),
        }
    }

    /// Returns the value as `u64` when it is non-negative.
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Value::I64(v) => u64::try_from(v).ok(),
            Value::U64(v) => Some(v),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::U64(value as u64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
        }
    }
}
