//! Ordered and keyed comparison of two record sources.

use std::collections::{HashMap, hash_map::Entry};

use tracing::{debug, trace, warn};

use crate::{
    errors::{CompareError, SourceError},
    record::Record,
    report::{ComparisonReport, DuplicateKey, Mismatch, MissingEntry, Mode, Side},
    source::RecordSource,
    value::{FieldValue, Scalar},
};

/// How list values of a field are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Sorted before comparing, so element order does not matter.
    #[default]
    Sorted,
    /// Compared element by element as stored.
    AsIs,
}

/// A field taking part in the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub order: ListOrder,
}

impl FieldRule {
    pub fn sorted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: ListOrder::Sorted,
        }
    }

    pub fn as_is(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: ListOrder::AsIs,
        }
    }

    /// Compares this field of two records. Absent on both sides counts as equal.
    pub fn matches(&self, left: &Record, right: &Record) -> bool {
        match (left.get(&self.name), right.get(&self.name)) {
            (None, None) => true,
            (Some(a), Some(b)) => self.normalize(a) == self.normalize(b),
            _ => false,
        }
    }

    /// The value as it takes part in the comparison.
    pub fn normalize(&self, value: &FieldValue) -> FieldValue {
        match self.order {
            ListOrder::Sorted => value.sorted(),
            ListOrder::AsIs => value.clone(),
        }
    }
}

/// Configuration of one comparison run.
///
/// Use the builder-style setters to configure, then pass to
/// [compare_ordered] or [compare_keyed].
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Field that identifies a record in keyed mode.
    pub key_field: String,
    /// Fields compared, in report order.
    pub fields: Vec<FieldRule>,
    /// Upper bound on the rows scanned.
    pub max_rows: Option<usize>,
    /// Ordered mode: compare the common prefix when lengths differ.
    pub allow_truncation: bool,
    /// Keyed mode: stop after this many differing keys.
    pub stop_after: Option<usize>,
    /// Number of mismatches kept in the report.
    pub max_mismatches: usize,
    /// Rows between two progress callbacks.
    pub progress_every: usize,
}

impl CompareOptions {
    pub fn new(key_field: impl Into<String>, fields: Vec<FieldRule>) -> Self {
        Self {
            key_field: key_field.into(),
            fields,
            max_rows: None,
            allow_truncation: false,
            stop_after: None,
            max_mismatches: 0,
            progress_every: 10_000,
        }
    }

    pub fn set_max_rows(&mut self, max_rows: usize) -> &mut Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn set_allow_truncation(&mut self, allow: bool) -> &mut Self {
        self.allow_truncation = allow;
        self
    }

    pub fn set_stop_after(&mut self, differences: usize) -> &mut Self {
        self.stop_after = Some(differences);
        self
    }

    pub fn set_max_mismatches(&mut self, max_mismatches: usize) -> &mut Self {
        self.max_mismatches = max_mismatches;
        self
    }

    pub fn set_progress_every(&mut self, rows: usize) -> &mut Self {
        self.progress_every = rows.max(1);
        self
    }

    fn limit(&self, rows: usize) -> usize {
        self.max_rows.map_or(rows, |max| rows.min(max))
    }
}

/// A compared pair of rows, handed to [CompareObserver::on_row].
#[derive(Debug)]
pub struct RowView<'a> {
    pub left_position: usize,
    pub right_position: usize,
    pub left: &'a Record,
    pub right: &'a Record,
    pub differing: &'a [String],
}

/// Hooks called while a comparison runs.
pub trait CompareObserver {
    /// Called every `progress_every` rows and once at the end.
    fn on_progress(&mut self, _processed: usize, _total: usize) {}

    /// Called for every compared pair of rows.
    fn on_row(&mut self, _row: &RowView<'_>) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl CompareObserver for NoopObserver {}

/// Adapts a `FnMut(processed, total)` closure into a progress observer.
pub struct ProgressFn<F>(pub F);

impl<F: FnMut(usize, usize)> CompareObserver for ProgressFn<F> {
    fn on_progress(&mut self, processed: usize, total: usize) {
        (self.0)(processed, total)
    }
}

/// Compares row `i` of `left` with row `i` of `right`, streaming both sources.
///
/// Fails with [CompareError::RowCountMismatch] when the sources have different
/// lengths, unless truncation is allowed.
pub fn compare_ordered<L, R>(
    left: &L,
    right: &R,
    options: &CompareOptions,
    observer: &mut dyn CompareObserver,
) -> Result<ComparisonReport, CompareError>
where
    L: RecordSource + ?Sized,
    R: RecordSource + ?Sized,
{
    let left_count = left.count()?;
    let right_count = right.count()?;

    if left_count != right_count {
        if !options.allow_truncation {
            return Err(CompareError::RowCountMismatch {
                left: left_count,
                right: right_count,
            });
        }
        warn!(
            left = left_count,
            right = right_count,
            "sources differ in length, comparing the common prefix"
        );
    }

    let total = options.limit(left_count.min(right_count));
    let mut tally = Tally::new(Mode::Ordered, left_count, right_count, options);
    let mut lefts = left.records()?;
    let mut rights = right.records()?;

    for position in 0..total {
        let left_record = next_record(&mut lefts, left, total, position)?;
        let right_record = next_record(&mut rights, right, total, position)?;

        tally.compare(position, position, &left_record, &right_record, observer);
        tally.progress(total, observer);
    }

    observer.on_progress(tally.report.rows_compared, total);
    Ok(tally.finish())
}

/// Matches rows of `left` and `right` by the value of `options.key_field` and
/// compares the common ones.
///
/// Both sources are loaded and indexed. Repeated keys are reported as
/// [DuplicateKey] and only their first occurrence takes part. A record whose
/// key field is absent or holds a list fails with [CompareError::KeyField].
pub fn compare_keyed<L, R>(
    left: &L,
    right: &R,
    options: &CompareOptions,
    observer: &mut dyn CompareObserver,
) -> Result<ComparisonReport, CompareError>
where
    L: RecordSource + ?Sized,
    R: RecordSource + ?Sized,
{
    let left_records = left.load()?;
    let right_records = right.load()?;
    let left_keys = resolve_keys(&left_records, &options.key_field, Side::Left)?;
    let right_keys = resolve_keys(&right_records, &options.key_field, Side::Right)?;

    let mut tally = Tally::new(
        Mode::Keyed,
        left_records.len(),
        right_records.len(),
        options,
    );

    let left_index = index_by_key(&left_keys, Side::Left, &mut tally.report.duplicates);
    let right_index = index_by_key(&right_keys, Side::Right, &mut tally.report.duplicates);
    debug!(
        key_field = %options.key_field,
        left = left_index.len(),
        right = right_index.len(),
        duplicates = tally.report.duplicates.len(),
        "indexed sources by key"
    );

    tally.report.missing_in_left = missing_keys(&right_keys, &right_index, &left_index);
    tally.report.missing_in_right = missing_keys(&left_keys, &left_index, &right_index);

    let total = options.limit(left_records.len());
    for (position, key) in left_keys.iter().enumerate().take(total) {
        tally.progress(total, observer);

        if left_index.get(key) != Some(&position) {
            continue;
        }
        let Some(&right_position) = right_index.get(key) else {
            continue;
        };

        let differs = tally.compare(
            position,
            right_position,
            &left_records[position],
            &right_records[right_position],
            observer,
        );

        if differs
            && options
                .stop_after
                .is_some_and(|limit| tally.report.different >= limit)
        {
            debug!(different = tally.report.different, "stopping at configured number of differences");
            tally.report.stopped_early = true;
            break;
        }
    }

    observer.on_progress(tally.scanned, total);
    Ok(tally.finish())
}

fn next_record<S: RecordSource + ?Sized>(
    records: &mut crate::source::RecordIter<'_>,
    source: &S,
    expected: usize,
    position: usize,
) -> Result<Record, SourceError> {
    match records.next() {
        Some(record) => record,
        None => Err(SourceError::Truncated {
            origin: source.origin(),
            expected,
            found: position,
        }),
    }
}

/// The key of every record, read from `key_field`.
fn resolve_keys<'a>(
    records: &'a [Record],
    key_field: &str,
    side: Side,
) -> Result<Vec<&'a Scalar>, CompareError> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| match record.get(key_field) {
            Some(FieldValue::Scalar(key)) => Ok(key),
            _ => Err(CompareError::KeyField {
                side,
                position,
                field: key_field.to_string(),
            }),
        })
        .collect()
}

fn index_by_key<'a>(
    keys: &[&'a Scalar],
    side: Side,
    duplicates: &mut Vec<DuplicateKey>,
) -> HashMap<&'a Scalar, usize> {
    let mut index = HashMap::with_capacity(keys.len());

    for (position, &key) in keys.iter().enumerate() {
        match index.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(position);
            }
            Entry::Occupied(entry) => {
                warn!(%side, %key, first = *entry.get(), repeated = position, "duplicate key");
                duplicates.push(DuplicateKey {
                    side,
                    key: key.clone(),
                    first: *entry.get(),
                    repeated: position,
                });
            }
        }
    }

    index
}

/// First occurrences among `keys` that are absent from `other`.
fn missing_keys(
    keys: &[&Scalar],
    own: &HashMap<&Scalar, usize>,
    other: &HashMap<&Scalar, usize>,
) -> Vec<MissingEntry> {
    keys.iter()
        .enumerate()
        .filter(|&(position, key)| own.get(key) == Some(&position) && !other.contains_key(key))
        .map(|(position, &key)| MissingEntry {
            position,
            key: key.clone(),
        })
        .collect()
}

/// Running counters of one comparison.
struct Tally<'o> {
    options: &'o CompareOptions,
    report: ComparisonReport,
    scanned: usize,
}

impl<'o> Tally<'o> {
    fn new(mode: Mode, left_count: usize, right_count: usize, options: &'o CompareOptions) -> Self {
        let report = ComparisonReport::new(
            mode,
            left_count,
            right_count,
            options.fields.iter().map(|rule| rule.name.as_str()),
        );
        Self {
            options,
            report,
            scanned: 0,
        }
    }

    fn progress(&mut self, total: usize, observer: &mut dyn CompareObserver) {
        self.scanned += 1;
        if self.scanned % self.options.progress_every.max(1) == 0 {
            observer.on_progress(self.scanned, total);
        }
    }

    /// Compares one pair of rows; returns true when they differ.
    fn compare(
        &mut self,
        left_position: usize,
        right_position: usize,
        left: &Record,
        right: &Record,
        observer: &mut dyn CompareObserver,
    ) -> bool {
        let mut differing = Vec::new();
        for (rule, tally) in self
            .options
            .fields
            .iter()
            .zip(self.report.field_differences.iter_mut())
        {
            if !rule.matches(left, right) {
                tally.differences += 1;
                differing.push(rule.name.clone());
            }
        }

        self.report.rows_compared += 1;
        let differs = !differing.is_empty();
        if differs {
            trace!(left_position, right_position, key = %left.key, fields = ?differing, "rows differ");
            self.report.different += 1;
        } else {
            self.report.identical += 1;
        }

        observer.on_row(&RowView {
            left_position,
            right_position,
            left,
            right,
            differing: &differing,
        });

        if differs && self.report.mismatches.len() < self.options.max_mismatches {
            self.report.mismatches.push(Mismatch {
                left_position,
                right_position,
                left: left.clone(),
                right: right.clone(),
                fields: differing,
            });
        }

        differs
    }

    fn finish(self) -> ComparisonReport {
        debug!(
            compared = self.report.rows_compared,
            different = self.report.different,
            "comparison finished"
        );
        self.report
    }
}
