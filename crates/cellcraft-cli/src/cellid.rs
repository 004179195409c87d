//! Cell identifier literals as typed on the command line.

use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cell id '{literal}': {source}")]
pub struct ParseCellIdError {
    pub literal: String,
    #[source]
    pub source: ParseIntError,
}

/// Parses a decimal, `0x`, `0o` or `0b` literal. Underscores are ignored.
///
/// A negative decimal is taken as the two's complement of the 64-bit
/// identifier, as printed by tools that store ids in signed columns.
pub fn parse_cell_id(literal: &str) -> Result<u64, ParseCellIdError> {
    let cleaned: String = literal.trim().chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    let parsed = if let Some(digits) = lower.strip_prefix("0x") {
        u64::from_str_radix(digits, 16)
    } else if let Some(digits) = lower.strip_prefix("0o") {
        u64::from_str_radix(digits, 8)
    } else if let Some(digits) = lower.strip_prefix("0b") {
        u64::from_str_radix(digits, 2)
    } else if lower.starts_with('-') {
        lower.parse::<i64>().map(|v| v as u64)
    } else {
        lower.parse::<u64>()
    };

    parsed.map_err(|source| ParseCellIdError {
        literal: literal.to_string(),
        source,
    })
}
