//! Keyed records read from a map source.

use std::collections::BTreeMap;

use crate::value::{FieldValue, Scalar};

/// One map entry: its key plus every stored field by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Scalar,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(key: impl Into<Scalar>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builds a record whose key is also stored as the field `key_field`.
    pub fn keyed(key_field: &str, key: impl Into<Scalar>) -> Self {
        let key = key.into();
        let mut record = Self::new(key.clone());
        record
            .fields
            .insert(key_field.to_string(), FieldValue::Scalar(key));
        record
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
