//! Outcome of a comparison run.

use std::fmt;

use crate::{record::Record, value::Scalar};

/// Which comparison strategy produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Row `i` of the left source against row `i` of the right source.
    Ordered,
    /// Rows matched by key.
    Keyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "1st file"),
            Side::Right => write!(f, "2nd file"),
        }
    }
}

/// Differences counted for one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTally {
    pub name: String,
    pub differences: usize,
}

/// A pair of rows that differ in at least one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub left_position: usize,
    pub right_position: usize,
    pub left: Record,
    pub right: Record,
    /// Names of the declared fields that differ.
    pub fields: Vec<String>,
}

/// A key present in one source only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntry {
    /// Position of the record in the source that has it.
    pub position: usize,
    pub key: Scalar,
}

/// A key seen more than once in one source. Only the first occurrence is compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub side: Side,
    pub key: Scalar,
    pub first: usize,
    pub repeated: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub mode: Mode,
    /// Records in the left source.
    pub left_count: usize,
    /// Records in the right source.
    pub right_count: usize,
    /// Rows (or common keys) compared field by field.
    pub rows_compared: usize,
    pub identical: usize,
    pub different: usize,
    /// Per-field difference counts, in declared field order.
    pub field_differences: Vec<FieldTally>,
    /// Retained mismatches, at most `CompareOptions::max_mismatches`.
    pub mismatches: Vec<Mismatch>,
    /// Keys of the right source absent from the left one (keyed mode).
    pub missing_in_left: Vec<MissingEntry>,
    /// Keys of the left source absent from the right one (keyed mode).
    pub missing_in_right: Vec<MissingEntry>,
    pub duplicates: Vec<DuplicateKey>,
    /// The keyed loop ended at the configured number of differing keys.
    pub stopped_early: bool,
}

impl ComparisonReport {
    pub(crate) fn new<'a>(
        mode: Mode,
        left_count: usize,
        right_count: usize,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            mode,
            left_count,
            right_count,
            rows_compared: 0,
            identical: 0,
            different: 0,
            field_differences: fields
                .into_iter()
                .map(|name| FieldTally {
                    name: name.to_string(),
                    differences: 0,
                })
                .collect(),
            mismatches: Vec::new(),
            missing_in_left: Vec::new(),
            missing_in_right: Vec::new(),
            duplicates: Vec::new(),
            stopped_early: false,
        }
    }

    /// Difference count of a declared field.
    pub fn differences(&self, field: &str) -> Option<usize> {
        self.field_differences
            .iter()
            .find(|tally| tally.name == field)
            .map(|tally| tally.differences)
    }

    /// True when no row differs and no key is missing on either side.
    pub fn is_clean(&self) -> bool {
        self.different == 0 && self.missing_in_left.is_empty() && self.missing_in_right.is_empty()
    }
}
