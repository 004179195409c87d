//! Text reports printed on stdout.
//!
//! Each report is a small wrapper implementing [fmt::Display]; the public
//! functions render them into strings.

use std::fmt;

use cellcraft::Selected;
use cellcraft_compare::{ComparisonReport, FieldRule, MissingEntry, Record, RowView};

const RULE: &str = "====================================";

/// Header printed before each decoded identifier.
pub fn cell_header(id: u64) -> String {
    format!("\n{RULE}\nCellID: {id:#x} ({id})\n")
}

/// System, readout, encoding and the value of every field of `id`.
pub fn cell_fields(id: u64, selected: &Selected<'_>) -> String {
    CellFields { id, selected }.to_string()
}

/// Outcome of the up-front record count check.
pub fn count_check(left: usize, right: usize, ignore_counts: bool) -> String {
    if left == right {
        return format!("Maps have equal numbers of entries: {left}\n");
    }
    let verdict = if ignore_counts { "Ignoring.." } else { "Exiting.." };
    format!("Maps do not have equal numbers of entries\nRespectively: {left} and {right}\n{verdict}\n")
}

/// One compared row, field by field, as printed with `--verbose`.
pub fn row_details(row: &RowView<'_>, fields: &[FieldRule]) -> String {
    RowDetails { row, fields }.to_string()
}

/// Summary of a positional comparison, with the first differing entries.
pub fn ordered_report(report: &ComparisonReport, fields: &[FieldRule], details: usize) -> String {
    OrderedReport {
        report,
        fields,
        details,
    }
    .to_string()
}

/// Summary of a key-matched comparison. `scanned` is the number of left
/// records the comparison loop was allowed to visit.
pub fn keyed_report(
    report: &ComparisonReport,
    fields: &[FieldRule],
    scanned: usize,
    details: usize,
) -> String {
    KeyedReport {
        report,
        fields,
        scanned,
        details,
    }
    .to_string()
}

struct CellFields<'a> {
    id: u64,
    selected: &'a Selected<'a>,
}

impl fmt::Display for CellFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codec = self.selected.codec;
        writeln!(f, "System: {}", self.selected.system)?;
        writeln!(f, "Readout: {}", self.selected.readout)?;
        writeln!(f, "CellID encoding: {}", codec.description())?;
        for (name, value) in codec.decode(self.id) {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

struct RowDetails<'a> {
    row: &'a RowView<'a>,
    fields: &'a [FieldRule],
}

impl fmt::Display for RowDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = self.row;
        if row.left_position == row.right_position {
            writeln!(f, "Entry {}", row.left_position)?;
        } else {
            writeln!(f, "Entry {} (2nd file: {})", row.left_position, row.right_position)?;
        }
        for rule in self.fields {
            writeln!(f, "Field {}", rule.name)?;
            writeln!(f, "  file1: {}", FieldText(row.left, rule))?;
            writeln!(f, "  file2: {}", FieldText(row.right, rule))?;
        }
        Ok(())
    }
}

struct OrderedReport<'a> {
    report: &'a ComparisonReport,
    fields: &'a [FieldRule],
    details: usize,
}

impl fmt::Display for OrderedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "\nNumber of different entries: {}", report.different)?;
        write_field_tallies(f, report)?;

        let shown = self.details.min(report.mismatches.len());
        if shown == 0 {
            return Ok(());
        }
        writeln!(f, "\nContent of first {shown} different entries")?;
        for mismatch in report.mismatches.iter().take(shown) {
            writeln!(f, "\nEntry: {}", mismatch.left_position)?;
            writeln!(f, "File 1:")?;
            for rule in self.fields {
                writeln!(f, "{} {}", rule.name, FieldText(&mismatch.left, rule))?;
            }
            writeln!(f, "File 2:")?;
            for rule in self.fields {
                writeln!(f, "{} {}", rule.name, FieldText(&mismatch.right, rule))?;
            }
        }
        Ok(())
    }
}

struct KeyedReport<'a> {
    report: &'a ComparisonReport,
    fields: &'a [FieldRule],
    scanned: usize,
    details: usize,
}

impl fmt::Display for KeyedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        write_missing(
            f,
            "present in 1st file but missing in 2nd one",
            &report.missing_in_right,
        )?;
        write_missing(
            f,
            "present in 2nd file but missing in 1st one",
            &report.missing_in_left,
        )?;

        if !report.duplicates.is_empty() {
            writeln!(
                f,
                "\nNumber of repeated keys (only the first entry is compared): {}",
                report.duplicates.len()
            )?;
            for duplicate in &report.duplicates {
                writeln!(
                    f,
                    "cellID = {} in {}: entries {} and {}",
                    duplicate.key, duplicate.side, duplicate.first, duplicate.repeated
                )?;
            }
        }

        writeln!(f, "\nRan over {} entries", self.scanned)?;
        if report.stopped_early {
            writeln!(f, "Stopped after {} entries with differences", report.different)?;
        }
        writeln!(
            f,
            "\nNumber of entries common to both files and with same content: {}",
            report.identical
        )?;
        writeln!(
            f,
            "\nNumber of entries common to both files but with differences: {}",
            report.different
        )?;
        write_field_tallies(f, report)?;

        let shown = self.details.min(report.mismatches.len());
        if shown == 0 {
            return Ok(());
        }
        writeln!(f, "\nDetails of first {shown} mismatches:")?;
        for mismatch in report.mismatches.iter().take(shown) {
            writeln!(
                f,
                "\nFile 1: {} File 2: {}",
                mismatch.left_position, mismatch.right_position
            )?;
            for rule in self.fields {
                writeln!(
                    f,
                    "{}: old={}  new={}",
                    rule.name,
                    FieldText(&mismatch.left, rule),
                    FieldText(&mismatch.right, rule)
                )?;
            }
        }
        Ok(())
    }
}

fn write_field_tallies(f: &mut fmt::Formatter<'_>, report: &ComparisonReport) -> fmt::Result {
    for tally in &report.field_differences {
        writeln!(f, "Field {} has {} differences", tally.name, tally.differences)?;
    }
    Ok(())
}

fn write_missing(f: &mut fmt::Formatter<'_>, what: &str, missing: &[MissingEntry]) -> fmt::Result {
    writeln!(f, "\nNumber of entries {what}: {}", missing.len())?;
    if !missing.is_empty() {
        writeln!(f, "List:")?;
        for entry in missing {
            writeln!(f, "Entry = {}, cellID = {}", entry.position, entry.key)?;
        }
    }
    Ok(())
}

/// A field of a record as it takes part in the comparison.
struct FieldText<'a>(&'a Record, &'a FieldRule);

impl fmt::Display for FieldText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let FieldText(record, rule) = self;
        match record.get(&rule.name) {
            Some(value) => write!(f, "{}", rule.normalize(value)),
            None => write!(f, "<missing>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use cellcraft::{DetectorDescription, ReadoutRegistry};
    use cellcraft_compare::{MemorySource, NoopObserver, compare_keyed, compare_ordered, maps::MapKind};

    use super::*;

    fn neighbours(key: i64, list: Vec<i64>) -> Record {
        Record::keyed("cellId", key).with("neighbours", list)
    }

    #[test]
    fn test_cell_header() {
        assert_eq!(
            cell_header(0x834),
            "\n====================================\nCellID: 0x834 (2100)\n"
        );
    }

    #[test]
    fn test_cell_fields() {
        let detector = DetectorDescription::new("toy").with_readout(
            "HCalBarrelReadout",
            "system:5,layer:9,row:9,theta:9,phi:10",
            Some(8),
        );
        let systems = detector.systems().clone();
        let mut registry = ReadoutRegistry::new(&detector, systems);
        let id = 8 | (3 << 5) | (12 << 14);

        let selected = registry.codec_for(id).unwrap();
        assert_eq!(
            cell_fields(id, &selected),
            "System: 8\n\
             Readout: HCalBarrelReadout\n\
             CellID encoding: system:0:5,layer:5:9,row:14:9,theta:23:9,phi:32:10\n\
             system: 8\n\
             layer: 3\n\
             row: 12\n\
             theta: 0\n\
             phi: 0\n"
        );
    }

    #[test]
    fn test_count_check() {
        assert_eq!(count_check(3, 3, false), "Maps have equal numbers of entries: 3\n");
        assert_eq!(
            count_check(2, 3, false),
            "Maps do not have equal numbers of entries\nRespectively: 2 and 3\nExiting..\n"
        );
        assert!(count_check(2, 3, true).ends_with("Ignoring..\n"));
    }

    #[test]
    fn test_ordered_report() {
        let left = MemorySource::from(vec![neighbours(1, vec![2, 3]), neighbours(2, vec![1])]);
        let right = MemorySource::from(vec![neighbours(1, vec![3, 2]), neighbours(2, vec![4, 1])]);
        let kind = MapKind::Neighbours;
        let mut options = kind.options();
        options.set_max_mismatches(5);
        let report = compare_ordered(&left, &right, &options, &mut NoopObserver).unwrap();

        let text = ordered_report(&report, &options.fields, 5);
        assert!(text.contains("Number of different entries: 1\n"));
        assert!(text.contains("Field cellId has 0 differences\n"));
        assert!(text.contains("Field neighbours has 1 differences\n"));
        assert!(text.contains("Content of first 1 different entries\n"));
        assert!(text.contains("\nEntry: 1\nFile 1:\ncellId 2\nneighbours [1]\nFile 2:\ncellId 2\nneighbours [1, 4]\n"));

        let quiet = ordered_report(&report, &options.fields, 0);
        assert!(!quiet.contains("Content of first"));
    }

    #[test]
    fn test_keyed_report() {
        let left = MemorySource::from(vec![
            neighbours(1, vec![2]),
            neighbours(2, vec![1]),
            neighbours(3, vec![1]),
        ]);
        let right = MemorySource::from(vec![
            neighbours(3, vec![2]),
            neighbours(2, vec![1]),
            neighbours(4, vec![]),
        ]);
        let mut options = MapKind::Neighbours.options();
        options.set_max_mismatches(2);
        let report = compare_keyed(&left, &right, &options, &mut NoopObserver).unwrap();

        let text = keyed_report(&report, &options.fields, 3, 2);
        assert!(text.contains(
            "Number of entries present in 1st file but missing in 2nd one: 1\nList:\nEntry = 0, cellID = 1\n"
        ));
        assert!(text.contains(
            "Number of entries present in 2nd file but missing in 1st one: 1\nList:\nEntry = 2, cellID = 4\n"
        ));
        assert!(text.contains("Ran over 3 entries\n"));
        assert!(text.contains("with same content: 1\n"));
        assert!(text.contains("but with differences: 1\n"));
        assert!(text.contains("Details of first 1 mismatches:\n\nFile 1: 2 File 2: 0\n"));
        assert!(text.contains("neighbours: old=[1]  new=[2]\n"));
        assert!(!text.contains("repeated keys"));
    }

    #[test]
    fn test_keyed_report_duplicates_and_early_stop() {
        let left = MemorySource::from(vec![
            neighbours(5, vec![1]),
            neighbours(5, vec![2]),
            neighbours(6, vec![1]),
        ]);
        let right = MemorySource::from(vec![neighbours(5, vec![9]), neighbours(6, vec![9])]);
        let mut options = MapKind::Neighbours.options();
        options.set_stop_after(1);
        let report = compare_keyed(&left, &right, &options, &mut NoopObserver).unwrap();

        let text = keyed_report(&report, &options.fields, 3, 0);
        assert!(text.contains("cellID = 5 in 1st file: entries 0 and 1\n"));
        assert!(text.contains("Stopped after 1 entries with differences\n"));
        assert!(!text.contains("Details of first"));
    }

    #[test]
    fn test_row_details() {
        let left = neighbours(7, vec![3, 1]);
        let right = Record::new(7i64);
        let differing = vec!["cellId".to_string(), "neighbours".to_string()];
        let row = RowView {
            left_position: 4,
            right_position: 9,
            left: &left,
            right: &right,
            differing: &differing,
        };

        assert_eq!(
            row_details(&row, &MapKind::Neighbours.fields()),
            "Entry 4 (2nd file: 9)\n\
             Field cellId\n  file1: 7\n  file2: <missing>\n\
             Field neighbours\n  file1: [1, 3]\n  file2: <missing>\n"
        );
    }
}
