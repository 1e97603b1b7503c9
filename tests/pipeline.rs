use std::path::Path;

use probation_clean::{run, ExportConfig, PipelineConfig, PipelineError};
use rusqlite::Connection;

const HEADER: &str = "DOC_Number,COMPAS_Score,Sentence_Date,Discharge_Date,\
                      Actual_Discharge_Date,Discharge_Type,Assigned_Officer";

const DIRTY_ROWS: &str = "\
123456,High,2021-01-01,2022-01-01,2020-06-01,Revoked - Tech,Sarah Connor
222222,3,2020-02-01,2021-02-01,2021-03-01,Successful,Ada Wong
222222,3,2020-02-01,2021-02-01,2021-03-01,Successful,Ada Wong
333333,,2020-05-05,2022-05-05,,Active,Leon Kennedy
444444,Med,not a date,2021-01-01,2019-01-01,Parole Violation,Samus Aran
555555,9,2022-07-01,2023-07-01,2023-08-15,revoked-new crime,Lara Croft
";

fn write_rows(dir: &Path, rows: &str) -> std::path::PathBuf {
    let path = dir.join("raw.csv");
    std::fs::write(&path, format!("{}\n{}", HEADER, rows)).unwrap();
    path
}

fn write_input(dir: &Path) -> std::path::PathBuf {
    write_rows(dir, DIRTY_ROWS)
}

fn export_config(dir: &Path) -> ExportConfig {
    ExportConfig {
        csv_path: dir.join("processed/probation_cleaned.csv"),
        db_path: dir.join("processed/probation_data.db"),
        table_name: "probation_records".to_string(),
    }
}

#[test]
fn test_full_run_cleans_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let export = export_config(dir.path());

    let report = run(&input, &export, &PipelineConfig::default()).unwrap();

    assert_eq!(report.rows_loaded, 6);
    assert_eq!(report.dedup.duplicates_removed, 1);
    assert_eq!(report.rows_cleaned(), 5);
    assert_eq!(report.scores.from_numeric, 2);
    assert_eq!(report.scores.from_label, 2);
    assert_eq!(report.scores.imputed, 1);
    // Settled scores 8, 3, 5, 9 -> median 6.5 -> 6
    assert_eq!(report.scores.fill_value, 6);
    assert_eq!(report.dates.impossible_corrected, 1);
    assert_eq!(report.dates.unparseable["sentence_date"], 1);
    assert_eq!(report.categories.unmapped, 1);

    let csv = std::fs::read_to_string(&export.csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "doc_number,compas_score,sentence_date,discharge_date,actual_discharge_date,\
         discharge_type,assigned_officer,compas_score_clean"
    );
    assert_eq!(
        lines.next().unwrap(),
        "123456,High,2021-01-01,2022-01-01,,revoked,Sarah Connor,8"
    );
    assert_eq!(csv.lines().count(), 6);

    let conn = Connection::open(&export.db_path).unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT doc_number, compas_score_clean, sentence_date, actual_discharge_date, \
             discharge_type FROM probation_records ORDER BY doc_number",
        )
        .unwrap();
    type Record = (i64, i64, Option<String>, Option<String>, String);
    let rows: Vec<Record> = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        rows,
        vec![
            (123456, 8, Some("2021-01-01".into()), None, "revoked".into()),
            (
                222222,
                3,
                Some("2020-02-01".into()),
                Some("2021-03-01".into()),
                "successful".into(),
            ),
            (333333, 6, Some("2020-05-05".into()), None, "active".into()),
            // No sentence date, so the early discharge date is kept
            (444444, 5, None, Some("2019-01-01".into()), "other".into()),
            (
                555555,
                9,
                Some("2022-07-01".into()),
                Some("2023-08-15".into()),
                "revoked".into(),
            ),
        ]
    );
}

#[test]
fn test_rerun_replaces_instead_of_appending() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let export = export_config(dir.path());

    run(&input, &export, &PipelineConfig::default()).unwrap();
    let first_csv = std::fs::read_to_string(&export.csv_path).unwrap();
    run(&input, &export, &PipelineConfig::default()).unwrap();
    let second_csv = std::fs::read_to_string(&export.csv_path).unwrap();

    assert_eq!(first_csv, second_csv);

    let conn = Connection::open(&export.db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM probation_records", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 5);
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let export = export_config(dir.path());

    let missing = dir.path().join("absent.csv");
    let err = run(&missing, &export, &PipelineConfig::default()).unwrap_err();

    assert!(matches!(err, PipelineError::MissingInput { .. }));
    assert!(!export.csv_path.exists());
    assert!(!export.db_path.exists());
}

/// Uniqueness holds over the rows as loaded: no two output rows came from
/// identical input lines. Rows that only become equal after normalization
/// (see `test_dedup_compares_loaded_values`) are both kept.
#[test]
fn test_cleaned_output_invariants() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let export = export_config(dir.path());

    let report = run(&input, &export, &PipelineConfig::default()).unwrap();

    let distinct_input: std::collections::HashSet<&str> = DIRTY_ROWS.lines().collect();
    assert_eq!(report.rows_cleaned(), distinct_input.len());

    let conn = Connection::open(&export.db_path).unwrap();
    let impossible: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM probation_records \
             WHERE actual_discharge_date IS NOT NULL AND sentence_date IS NOT NULL \
             AND actual_discharge_date < sentence_date",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(impossible, 0);

    let null_scores: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM probation_records WHERE compas_score_clean IS NULL",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(null_scores, 0);

    let unknown_categories: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM probation_records WHERE discharge_type NOT IN \
             ('successful', 'revoked', 'absconded', 'deceased', 'active', 'other')",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(unknown_categories, 0);
}

#[test]
fn test_number_like_values_survive_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let rows = "\
0123456,5,2021-01-01,2022-01-01,,Active,007
0123456,5,2021-01-01,2022-01-01,,Active,7
111,+5,2021-01-01,2022-01-01,,Successful,Ada Wong
";
    let input = write_rows(dir.path(), rows);
    let export = export_config(dir.path());

    let report = run(&input, &export, &PipelineConfig::default()).unwrap();
    assert_eq!(report.dedup.duplicates_removed, 0);
    assert_eq!(report.scores.from_numeric, 3);

    let csv = std::fs::read_to_string(&export.csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(
        lines,
        vec![
            "0123456,5,2021-01-01,2022-01-01,,active,007,5",
            "0123456,5,2021-01-01,2022-01-01,,active,7,5",
            "111,+5,2021-01-01,2022-01-01,,successful,Ada Wong,5",
        ]
    );

    let conn = Connection::open(&export.db_path).unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT doc_number, compas_score, assigned_officer \
             FROM probation_records ORDER BY rowid",
        )
        .unwrap();
    let stored: Vec<(String, String, String)> = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        stored,
        vec![
            ("0123456".into(), "5".into(), "007".into()),
            ("0123456".into(), "5".into(), "7".into()),
            ("111".into(), "+5".into(), "Ada Wong".into()),
        ]
    );
}

#[test]
fn test_dedup_compares_loaded_values() {
    let dir = tempfile::tempdir().unwrap();
    let rows = "\
123456,High,2021-01-01,2022-01-01,,Revoked,Sarah Connor
123456,High,2021/01/01,2022-01-01,,revoked,Sarah Connor
";
    let input = write_rows(dir.path(), rows);
    let export = export_config(dir.path());

    let report = run(&input, &export, &PipelineConfig::default()).unwrap();

    // Dedup runs on loaded values, before dates and categories are normalized
    assert_eq!(report.dedup.duplicates_removed, 0);
    let csv = std::fs::read_to_string(&export.csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], lines[1]);
}
