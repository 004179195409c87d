//! Definition of the named bit ranges that make up a [crate::codec::Codec].

use std::fmt;

use crate::{
    bits::{extract_bits, insert_bits, sign_extend},
    errors::LayoutError,
    value::Value,
};

/// A single named bit range inside a packed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldSpec {
    /// Name used as the key of decoded values.
    pub name: String,
    /// First bit of the range, 0 being the least significant bit.
    pub offset: u32,
    /// Number of bits, `1..=64 - offset`.
    pub width: u32,
    /// If true, the extracted bits are sign-extended from `width` bits.
    pub signed: bool,
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldSpecDef> for FieldSpec {
    fn from(value: crate::serde::FieldSpecDef) -> Self {
        FieldSpec {
            name: value.name,
            offset: value.offset,
            width: value.width,
            signed: value.signed,
        }
    }
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, offset: u32, width: u32) -> Self {
        FieldSpec {
            name: name.into(),
            offset,
            width,
            signed: false,
        }
    }

    pub fn new_signed(name: impl Into<String>, offset: u32, width: u32) -> Self {
        FieldSpec {
            signed: true,
            ..FieldSpec::new(name, offset, width)
        }
    }

    /// Checks the name and bit range.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.name.trim().is_empty() {
            return Err(LayoutError::malformed(self.to_string(), "empty field name"));
        }
        if self.width == 0 {
            return Err(LayoutError::malformed(self.to_string(), "zero width"));
        }
        if self.offset as u64 + self.width as u64 > 64 {
            return Err(LayoutError::malformed(
                self.to_string(),
                format!(
                    "bits {}..{} exceed 64",
                    self.offset,
                    self.offset as u64 + self.width as u64
                ),
            ));
        }
        Ok(())
    }

    /// Mask of the bits covered by this field, in identifier position.
    pub fn mask(&self) -> u64 {
        crate::bits::mask(self.width) << self.offset
    }

    /// Extracts this field from `id`.
    pub fn extract(&self, id: u64) -> Value {
        let raw = extract_bits(id, self.offset, self.width);
        if self.signed {
            Value::I64(sign_extend(raw, self.width))
        } else {
            Value::U64(raw)
        }
    }

    /// Writes `value`, truncated to `width` bits, into `id`.
    pub fn insert(&self, id: u64, value: Value) -> u64 {
        insert_bits(id, self.offset, self.width, value.raw())
    }
}

/// Formats as a layout token, `name:offset:width`, negative width when signed.
impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.signed {
            write!(f, "{}:{}:-{}", self.name, self.offset, self.width)
        } else {
            write!(f, "{}:{}:{}", self.name, self.offset, self.width)
        }
    }
}
