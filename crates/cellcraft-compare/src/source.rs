//! Record sources: where the two sides of a comparison come from.
//!
//! A [RecordSource] is a finite, restartable sequence of [Record]s. Every call
//! to [RecordSource::records] starts a fresh pass, so ordered comparisons can
//! stream both sides while keyed comparisons load them once.

use std::{
    cell::OnceCell,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use serde_json::{Map, Value as Json};

use crate::{
    errors::SourceError,
    record::Record,
    value::{FieldValue, Scalar},
};

pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<Record, SourceError>> + 'a>;

pub trait RecordSource {
    /// Human-readable origin (usually a path) used in messages.
    fn origin(&self) -> String;

    /// Number of records a full pass yields.
    fn count(&self) -> Result<usize, SourceError>;

    /// Starts a new pass over the records.
    fn records(&self) -> Result<RecordIter<'_>, SourceError>;

    /// Reads every record into memory.
    fn load(&self) -> Result<Vec<Record>, SourceError> {
        self.records()?.collect()
    }
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    records: Vec<Record>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl From<Vec<Record>> for MemorySource {
    fn from(records: Vec<Record>) -> Self {
        MemorySource::new("memory", records)
    }
}

impl RecordSource for MemorySource {
    fn origin(&self) -> String {
        self.name.clone()
    }

    fn count(&self) -> Result<usize, SourceError> {
        Ok(self.records.len())
    }

    fn records(&self) -> Result<RecordIter<'_>, SourceError> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}

/// One JSON object per line; blank lines are skipped.
///
/// ```text
/// {"cellId": 1234, "neighbours": [1235, 1233]}
/// {"cellId": 1235, "neighbours": [1234]}
/// ```
///
/// Numbers become [Scalar::Int] when they fit in `i64`, then [Scalar::UInt],
/// then [Scalar::Float]. Arrays of scalars become lists. Nulls, booleans and
/// nested objects or arrays are rejected.
///
/// The record count is read once and cached.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
    key_field: String,
    count: OnceCell<usize>,
}

impl JsonLinesSource {
    pub fn new(path: impl Into<PathBuf>, key_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key_field: key_field.into(),
            count: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    fn open(&self) -> Result<BufReader<File>, SourceError> {
        File::open(&self.path)
            .map(BufReader::new)
            .map_err(|source| SourceError::Io {
                origin: self.origin(),
                source,
            })
    }
}

impl RecordSource for JsonLinesSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn count(&self) -> Result<usize, SourceError> {
        if let Some(count) = self.count.get() {
            return Ok(*count);
        }

        let mut count = 0;
        for line in self.open()?.lines() {
            let line = line.map_err(|source| SourceError::Io {
                origin: self.origin(),
                source,
            })?;
            if !line.trim().is_empty() {
                count += 1;
            }
        }
        Ok(*self.count.get_or_init(|| count))
    }

    fn records(&self) -> Result<RecordIter<'_>, SourceError> {
        let reader = self.open()?;
        let origin = self.origin();
        let key_field = self.key_field.as_str();

        Ok(Box::new(reader.lines().enumerate().filter_map(
            move |(index, line)| match line {
                Err(source) => Some(Err(SourceError::Io {
                    origin: origin.clone(),
                    source,
                })),
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some(parse_line(&line, key_field).map_err(|message| {
                    SourceError::Parse {
                        origin: origin.clone(),
                        line: index + 1,
                        message,
                    }
                })),
            },
        )))
    }
}

fn parse_line(line: &str, key_field: &str) -> Result<Record, String> {
    let object: Map<String, Json> = serde_json::from_str(line).map_err(|err| err.to_string())?;

    let mut fields = std::collections::BTreeMap::new();
    for (name, value) in object {
        let value = json_to_field(&value).map_err(|reason| format!("field '{name}': {reason}"))?;
        fields.insert(name, value);
    }

    let key = match fields.get(key_field) {
        Some(FieldValue::Scalar(key)) => key.clone(),
        Some(FieldValue::List(_)) => return Err(format!("key field '{key_field}' is a list")),
        None => return Err(format!("missing key field '{key_field}'")),
    };

    Ok(Record { key, fields })
}

fn json_to_field(value: &Json) -> Result<FieldValue, String> {
    match value {
        Json::Array(items) => items
            .iter()
            .map(json_to_scalar)
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        other => json_to_scalar(other).map(FieldValue::Scalar),
    }
}

fn json_to_scalar(value: &Json) -> Result<Scalar, String> {
    match value {
        Json::Number(number) => {
            if let Some(v) = number.as_i64() {
                Ok(Scalar::Int(v))
            } else if let Some(v) = number.as_u64() {
                Ok(Scalar::UInt(v))
            } else if let Some(v) = number.as_f64() {
                Ok(Scalar::Float(v))
            } else {
                Err(format!("unsupported number {number}"))
            }
        }
        Json::String(s) => Ok(Scalar::Str(s.clone())),
        Json::Null => Err("null values are not supported".to_string()),
        Json::Bool(_) => Err("boolean values are not supported".to_string()),
        Json::Array(_) => Err("nested arrays are not supported".to_string()),
        Json::Object(_) => Err("nested objects are not supported".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_lines(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn test_parse_line() {
        let record = parse_line(
            r#"{"cellId": 17, "neighbours": [3, 1], "noiseLevel": 0.25, "CellInfo": "x"}"#,
            "cellId",
        )
        .unwrap();

        assert_eq!(record.key, Scalar::Int(17));
        assert_eq!(record.get("neighbours"), Some(&FieldValue::from(vec![3i64, 1])));
        assert_eq!(record.get("noiseLevel"), Some(&FieldValue::from(0.25)));
        assert_eq!(record.get("CellInfo"), Some(&FieldValue::from("x")));
    }

    #[test]
    fn test_parse_large_unsigned_key() {
        let record = parse_line(r#"{"cellId": 18446744073709551615}"#, "cellId").unwrap();
        assert_eq!(record.key, Scalar::UInt(u64::MAX));
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line(r#"{"neighbours": []}"#, "cellId")
            .unwrap_err()
            .contains("missing key field 'cellId'"));
        assert!(parse_line(r#"{"cellId": [1]}"#, "cellId")
            .unwrap_err()
            .contains("is a list"));
        assert!(parse_line(r#"{"cellId": 1, "x": null}"#, "cellId")
            .unwrap_err()
            .contains("field 'x'"));
        assert!(parse_line(r#"{"cellId": 1, "x": [[1]]}"#, "cellId").is_err());
        assert!(parse_line("not json", "cellId").is_err());
    }

    #[test]
    fn test_jsonl_source_skips_blank_lines() {
        let file = write_lines(&[r#"{"cellId": 1}"#, "", r#"{"cellId": 2}"#, "   "]);
        let source = JsonLinesSource::new(file.path(), "cellId");

        assert_eq!(source.count().unwrap(), 2);
        let keys: Vec<Scalar> = source.load().unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![Scalar::Int(1), Scalar::Int(2)]);

        // A second pass starts from the beginning.
        assert_eq!(source.records().unwrap().count(), 2);
    }

    #[test]
    fn test_jsonl_source_reports_line_numbers() {
        let file = write_lines(&[r#"{"cellId": 1}"#, "", r#"{"cellId": true}"#]);
        let source = JsonLinesSource::new(file.path(), "cellId");

        match source.load() {
            Err(SourceError::Parse { line, message, .. }) => {
                assert_eq!(line, 3);
                assert!(message.contains("boolean"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_jsonl_count_is_cached() {
        let file = write_lines(&[r#"{"cellId": 1}"#, r#"{"cellId": 2}"#]);
        let source = JsonLinesSource::new(file.path(), "cellId");
        assert_eq!(source.count().unwrap(), 2);

        // Appending after the first count does not trigger a recount.
        let mut handle = std::fs::OpenOptions::new().append(true).open(file.path()).unwrap();
        writeln!(handle, r#"{{"cellId": 3}}"#).unwrap();
        assert_eq!(source.count().unwrap(), 2);
        assert_eq!(JsonLinesSource::new(file.path(), "cellId").count().unwrap(), 3);
    }

    #[test]
    fn test_missing_file() {
        let source = JsonLinesSource::new("/nonexistent/map.jsonl", "cellId");
        assert!(matches!(source.count(), Err(SourceError::Io { .. })));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::from(vec![Record::new(1i64), Record::new(2i64)]);
        assert_eq!(source.count().unwrap(), 2);
        assert_eq!(source.load().unwrap().len(), 2);
        assert_eq!(source.origin(), "memory");
    }
}
