//! # cellcraft-compare
//!
//! Compares two versions of a cell map (neighbour lists, noise levels,
//! crosstalk coefficients) record by record.
//!
//! Two strategies are available:
//! - [compare_ordered]: row `i` against row `i`, streaming both sources.
//! - [compare_keyed]: rows matched by key, reporting keys missing on either side.
//!
//! ## Example
//!
//! ```
//! use cellcraft_compare::{MemorySource, NoopObserver, Record, compare_keyed, maps::MapKind};
//!
//! let left = MemorySource::from(vec![
//!     Record::keyed("cellId", 1i64).with("neighbours", vec![2i64, 3]),
//!     Record::keyed("cellId", 2i64).with("neighbours", vec![1i64]),
//! ]);
//! let right = MemorySource::from(vec![
//!     Record::keyed("cellId", 2i64).with("neighbours", vec![1i64]),
//!     Record::keyed("cellId", 1i64).with("neighbours", vec![3i64, 2]),
//! ]);
//!
//! let options = MapKind::Neighbours.options();
//! let report = compare_keyed(&left, &right, &options, &mut NoopObserver).unwrap();
//! assert_eq!(report.identical, 2);
//! assert!(report.is_clean());
//! ```

pub mod compare;
pub mod errors;
pub mod maps;
pub mod record;
pub mod report;
pub mod source;
pub mod value;

pub use compare::{
    CompareObserver, CompareOptions, FieldRule, ListOrder, NoopObserver, ProgressFn, RowView,
    compare_keyed, compare_ordered,
};
pub use errors::{CompareError, SourceError, UnknownMapKind};
pub use record::Record;
pub use report::{ComparisonReport, DuplicateKey, FieldTally, Mismatch, MissingEntry, Mode, Side};
pub use source::{JsonLinesSource, MemorySource, RecordSource};
pub use value::{FieldValue, Scalar};
