//! Error types for record sources and comparisons.

use std::io;

use thiserror::Error;

use crate::report::Side;

/// Failure while reading records from a [crate::source::RecordSource].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying file could not be opened or read.
    #[error("{origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },
    /// A record could not be interpreted.
    #[error("{origin}:{line}: {message}")]
    Parse {
        origin: String,
        line: usize,
        message: String,
    },
    /// The source produced fewer records than it reported.
    #[error("{origin}: ended after {found} of {expected} records")]
    Truncated {
        origin: String,
        expected: usize,
        found: usize,
    },
}

/// Errors that abort a comparison run.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Ordered comparison of sources with different lengths, truncation not allowed.
    #[error("sources do not have equal numbers of entries: {left} and {right}")]
    RowCountMismatch { left: usize, right: usize },
    /// Keyed comparison of a record with no usable key.
    #[error("entry {position} of the {side} has no scalar key field '{field}'")]
    KeyField {
        side: Side,
        position: usize,
        field: String,
    },
    #[error(transparent)]
    SourceRead(#[from] SourceError),
}

/// A map type name that is not one of the known presets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown map type '{0}', expected neighbours, noise or xtalk")]
pub struct UnknownMapKind(pub String);
