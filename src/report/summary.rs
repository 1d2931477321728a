use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::core::TargetRecord;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid {column} value on row {row}: '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Columns written for every run
pub const BASE_COLUMNS: [&str; 6] = [
    "puck_barcode_file",
    "n_barcodes",
    "n_matching",
    "matching_ratio",
    "puck_barcode_file_id",
    "pass_threshold",
];

/// Column added once adjacency refinement has run
pub const PASS_ADJACENCY_COLUMN: &str = "pass_adjacency";

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Write the summary table to `path`, replacing any existing file.
///
/// The `pass_adjacency` column is included when any record carries it. The
/// table is written to a temporary file next to `path` and renamed into
/// place.
///
/// # Errors
///
/// Returns `ReportError::Io` or `ReportError::Csv` if writing fails; the
/// destination is left unchanged in that case.
pub fn write_summary(path: &Path, records: &[TargetRecord]) -> Result<(), ReportError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_summary_to(&mut tmp, records)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ReportError::Io(e.error))?;

    debug!(path = %path.display(), rows = records.len(), "Wrote summary table");
    Ok(())
}

/// Write the summary table as CSV to any writer
///
/// # Errors
///
/// Returns `ReportError::Csv` if a row cannot be written.
pub fn write_summary_to<W: Write>(writer: W, records: &[TargetRecord]) -> Result<(), ReportError> {
    let with_adjacency = records.iter().any(|r| r.pass_adjacency.is_some());
    let mut writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
    if with_adjacency {
        header.push(PASS_ADJACENCY_COLUMN);
    }
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![
            record.path.display().to_string(),
            record.n_barcodes.to_string(),
            record.n_matching.to_string(),
            format!("{:?}", record.matching_ratio),
            record.id.clone(),
            flag(record.pass_threshold).to_string(),
        ];
        if with_adjacency {
            row.push(flag(record.pass_adjacency.unwrap_or(false)).to_string());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SummaryRow {
    puck_barcode_file: PathBuf,
    n_barcodes: usize,
    n_matching: usize,
    matching_ratio: f64,
    puck_barcode_file_id: String,
    pass_threshold: String,
    #[serde(default)]
    pass_adjacency: Option<String>,
}

fn parse_flag(row: usize, column: &'static str, value: &str) -> Result<bool, ReportError> {
    match value.trim() {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        other => Err(ReportError::InvalidValue {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

/// Read a summary table written by [`write_summary`]
///
/// # Errors
///
/// Returns `ReportError::Io` if the file cannot be opened, `ReportError::Csv`
/// if a row does not match the schema, or `ReportError::InvalidValue` for a
/// malformed boolean column.
pub fn read_summary(path: &Path) -> Result<Vec<TargetRecord>, ReportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for (i, result) in reader.deserialize::<SummaryRow>().enumerate() {
        let row = result?;
        let row_num = i + 1;

        let pass_adjacency = row
            .pass_adjacency
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_flag(row_num, PASS_ADJACENCY_COLUMN, v))
            .transpose()?;

        records.push(TargetRecord {
            path: row.puck_barcode_file,
            id: row.puck_barcode_file_id,
            n_barcodes: row.n_barcodes,
            n_matching: row.n_matching,
            matching_ratio: row.matching_ratio,
            pass_threshold: parse_flag(row_num, "pass_threshold", &row.pass_threshold)?,
            pass_adjacency,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetSpec;
    use tempfile::TempDir;

    fn make_records() -> Vec<TargetRecord> {
        let mut t1 = TargetRecord::from_counts(&TargetSpec::new("pucks/t1.txt", "T1"), 3, 2);
        t1.pass_threshold = true;
        let t2 = TargetRecord::from_counts(&TargetSpec::new("pucks/t2.txt", "T2"), 2, 0);
        let t3 = TargetRecord::from_counts(&TargetSpec::new("pucks/t3.txt", "T3"), 0, 0);
        vec![t1, t2, t3]
    }

    #[test]
    fn test_write_threshold_only_table() {
        let mut out = Vec::new();
        write_summary_to(&mut out, &make_records()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "puck_barcode_file,n_barcodes,n_matching,matching_ratio,puck_barcode_file_id,pass_threshold"
        );
        assert_eq!(lines[1], "pucks/t1.txt,3,2,0.6666666666666666,T1,1");
        assert_eq!(lines[2], "pucks/t2.txt,2,0,0.0,T2,0");
        assert_eq!(lines[3], "pucks/t3.txt,0,0,0.0,T3,0");
    }

    #[test]
    fn test_write_with_adjacency_column() {
        let mut records = make_records();
        records[0].pass_adjacency = Some(true);
        records[1].pass_adjacency = Some(true);
        records[2].pass_adjacency = Some(false);

        let mut out = Vec::new();
        write_summary_to(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.lines().next().unwrap().ends_with(",pass_threshold,pass_adjacency"));
        assert_eq!(text.lines().nth(2).unwrap(), "pucks/t2.txt,2,0,0.0,T2,0,1");
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.csv");

        let records = make_records();
        write_summary(&path, &records).unwrap();
        assert_eq!(read_summary(&path).unwrap(), records);

        let mut refined = records;
        refined[0].pass_adjacency = Some(true);
        refined[1].pass_adjacency = Some(false);
        refined[2].pass_adjacency = Some(false);
        write_summary(&path, &refined).unwrap();
        assert_eq!(read_summary(&path).unwrap(), refined);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("summary.csv");
        assert!(matches!(
            write_summary(&path, &make_records()),
            Err(ReportError::Io(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_invalid_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.csv");
        std::fs::write(
            &path,
            "puck_barcode_file,n_barcodes,n_matching,matching_ratio,puck_barcode_file_id,pass_threshold\n\
             t1.txt,3,2,0.66,T1,maybe\n",
        )
        .unwrap();

        let err = read_summary(&path).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidValue {
                row: 1,
                column: "pass_threshold",
                ..
            }
        ));
    }
}
