use std::{fs, path::Path};

use cellcraft_compare::{
    CompareError, NoopObserver, RecordSource, Scalar, SourceError, compare_keyed, compare_ordered,
    maps::MapKind,
};

fn write_map(dir: &Path, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn noise_maps_compare_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let left = write_map(
        dir.path(),
        "left.jsonl",
        &[
            r#"{"cellId": 100, "noiseLevel": 0.0125, "noiseOffset": 0.0}"#,
            r#"{"cellId": 101, "noiseLevel": 0.0130, "noiseOffset": 0.0}"#,
        ],
    );
    let right = write_map(
        dir.path(),
        "right.jsonl",
        &[
            r#"{"cellId": 100, "noiseLevel": 0.0125, "noiseOffset": 0.0}"#,
            r#"{"cellId": 101, "noiseLevel": 0.0130000001, "noiseOffset": 0.0}"#,
        ],
    );

    let kind = MapKind::Noise;
    let mut options = kind.options();
    options.set_max_mismatches(5);
    let report = compare_ordered(&kind.open(&left), &kind.open(&right), &options, &mut NoopObserver)
        .unwrap();

    assert_eq!(report.identical, 1);
    assert_eq!(report.different, 1);
    assert_eq!(report.differences("noiseLevel"), Some(1));
    assert_eq!(report.differences("noiseOffset"), Some(0));
    assert_eq!(report.mismatches[0].left.key, Scalar::Int(101));
}

#[test]
fn integer_and_float_spellings_are_equal() {
    let dir = tempfile::tempdir().unwrap();
    let left = write_map(
        dir.path(),
        "left.jsonl",
        &[r#"{"cellId": 5, "noiseLevel": 0.5, "noiseOffset": 0.0}"#],
    );
    let right = write_map(
        dir.path(),
        "right.jsonl",
        &[r#"{"cellId": 5.0, "noiseLevel": 0.5, "noiseOffset": 0}"#],
    );

    let kind = MapKind::Noise;
    let (left, right) = (kind.open(&left), kind.open(&right));

    let report = compare_ordered(&left, &right, &kind.options(), &mut NoopObserver).unwrap();
    assert_eq!(report.different, 0);
    assert_eq!(report.differences("noiseOffset"), Some(0));

    let report = compare_keyed(&left, &right, &kind.options(), &mut NoopObserver).unwrap();
    assert!(report.missing_in_left.is_empty());
    assert!(report.missing_in_right.is_empty());
    assert_eq!(report.identical, 1);
}

#[test]
fn neighbour_maps_in_directories() {
    let old = tempfile::tempdir().unwrap();
    let new = tempfile::tempdir().unwrap();
    write_map(
        old.path(),
        "neighbours.jsonl",
        &[
            r#"{"cellId": 1, "neighbours": [2, 3]}"#,
            r#"{"cellId": 2, "neighbours": [1]}"#,
            r#"{"cellId": 3, "neighbours": [1]}"#,
        ],
    );
    write_map(
        new.path(),
        "neighbours.jsonl",
        &[
            r#"{"cellId": 3, "neighbours": [1]}"#,
            r#"{"cellId": 1, "neighbours": [3, 2]}"#,
            r#"{"cellId": 4, "neighbours": []}"#,
        ],
    );

    let kind = MapKind::Neighbours;
    let left = kind.open(old.path());
    let right = kind.open(new.path());

    // Same length but different order: every row differs positionally.
    let ordered = compare_ordered(&left, &right, &kind.options(), &mut NoopObserver).unwrap();
    assert_eq!(ordered.different, 3);
    assert_eq!(ordered.differences("cellId"), Some(3));

    let report = compare_keyed(&left, &right, &kind.options(), &mut NoopObserver).unwrap();
    assert_eq!(report.identical, 2);
    assert_eq!(report.missing_in_left.len(), 1);
    assert_eq!(report.missing_in_left[0].key, Scalar::Int(4));
    assert_eq!(report.missing_in_right.len(), 1);
    assert_eq!(report.missing_in_right[0].key, Scalar::Int(2));
}

#[test]
fn crosstalk_lists_are_positional() {
    let dir = tempfile::tempdir().unwrap();
    let left = write_map(
        dir.path(),
        "left.jsonl",
        &[r#"{"cellId": 7, "list_crosstalk_neighbours": [8, 9], "list_crosstalks": [0.1, 0.2], "CellInfo": 0}"#],
    );
    let right = write_map(
        dir.path(),
        "right.jsonl",
        &[r#"{"cellId": 7, "list_crosstalk_neighbours": [9, 8], "list_crosstalks": [0.2, 0.1], "CellInfo": 0}"#],
    );

    let kind = MapKind::Crosstalk;
    let report = compare_ordered(&kind.open(&left), &kind.open(&right), &kind.options(), &mut NoopObserver)
        .unwrap();
    assert_eq!(report.differences("list_crosstalk_neighbours"), Some(1));
    assert_eq!(report.differences("list_crosstalks"), Some(1));
    assert_eq!(report.differences("CellInfo"), Some(0));
}

#[test]
fn ordered_mode_rejects_different_lengths() {
    let dir = tempfile::tempdir().unwrap();
    let left = write_map(dir.path(), "left.jsonl", &[r#"{"cellId": 1}"#, r#"{"cellId": 2}"#]);
    let right = write_map(dir.path(), "right.jsonl", &[r#"{"cellId": 1}"#]);

    let kind = MapKind::Noise;
    let err = compare_ordered(&kind.open(&left), &kind.open(&right), &kind.options(), &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(
        err,
        CompareError::RowCountMismatch { left: 2, right: 1 }
    ));

    let mut options = kind.options();
    options.set_allow_truncation(true);
    let report = compare_ordered(&kind.open(&left), &kind.open(&right), &options, &mut NoopObserver)
        .unwrap();
    assert_eq!(report.rows_compared, 1);
    assert!(report.is_clean());
}

#[test]
fn unreadable_record_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let left = write_map(dir.path(), "left.jsonl", &[r#"{"cellId": 1}"#, r#"{"cellId": "#]);
    let right = write_map(dir.path(), "right.jsonl", &[r#"{"cellId": 1}"#, r#"{"cellId": 2}"#]);

    let kind = MapKind::Noise;
    let left = kind.open(&left);
    assert_eq!(left.count().unwrap(), 2);

    let err = compare_keyed(&left, &kind.open(&right), &kind.options(), &mut NoopObserver)
        .unwrap_err();
    match err {
        CompareError::SourceRead(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected {other:?}"),
    }
}
