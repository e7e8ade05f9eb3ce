//! CSV factor writer: `<base>/<factor_name>/<YYYY-MM-DD>.csv`.

use crate::domain::error::FactorError;
use crate::domain::factor::{FactorPoint, FactorTable};
use crate::ports::factor_writer_port::{FactorWriterPort, WriteSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvFactorWriter {
    base_path: PathBuf,
}

impl CsvFactorWriter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn factor_folder(&self, factor_name: &str) -> PathBuf {
        self.base_path.join(factor_name)
    }

    /// Create the factor folder if needed.
    pub fn create_factor_folder(&self, factor_name: &str) -> Result<PathBuf, FactorError> {
        let folder = self.factor_folder(factor_name);
        fs::create_dir_all(&folder)?;
        Ok(folder)
    }
}

fn csv_error(path: &Path, e: csv::Error) -> FactorError {
    FactorError::Csv {
        file: path.display().to_string(),
        line: e.position().map(|p| p.line()).unwrap_or(0),
        reason: e.to_string(),
    }
}

fn write_partition(path: &Path, factor_name: &str, rows: &[&FactorPoint]) -> Result<(), FactorError> {
    // Truncates any file left by a previous run.
    let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    wtr.write_record(["code", "date", factor_name])
        .map_err(|e| csv_error(path, e))?;

    for point in rows {
        let date = point.date.to_string();
        let value = point.value.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([point.code.as_str(), date.as_str(), value.as_str()])
            .map_err(|e| csv_error(path, e))?;
    }

    wtr.flush()?;
    Ok(())
}

impl FactorWriterPort for CsvFactorWriter {
    fn write(&self, table: &FactorTable) -> Result<WriteSummary, FactorError> {
        let folder = self.create_factor_folder(&table.name)?;
        let mut summary = WriteSummary::default();

        for (date, rows) in table.partition_by_date() {
            let path = folder.join(format!("{}.csv", date));
            write_partition(&path, &table.name, &rows)?;
            debug!(file = %path.display(), rows = rows.len(), "wrote partition");
            summary.files += 1;
            summary.rows += rows.len();
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn point(code: &str, day: u32, value: Option<f64>) -> FactorPoint {
        FactorPoint {
            code: code.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            value,
        }
    }

    fn sample_table() -> FactorTable {
        FactorTable {
            name: "momentum_5d".into(),
            points: vec![
                point("000001", 2, None),
                point("000001", 3, Some(0.25)),
                point("600000", 3, Some(-0.5)),
            ],
        }
    }

    #[test]
    fn writes_one_file_per_date() {
        let dir = TempDir::new().unwrap();
        let writer = CsvFactorWriter::new(dir.path().to_path_buf());

        let summary = writer.write(&sample_table()).unwrap();

        assert_eq!(summary, WriteSummary { files: 2, rows: 3 });
        let folder = dir.path().join("momentum_5d");
        assert!(folder.join("2024-01-02.csv").exists());
        assert!(folder.join("2024-01-03.csv").exists());

        let content = fs::read_to_string(folder.join("2024-01-03.csv")).unwrap();
        assert_eq!(
            content,
            "code,date,momentum_5d\n000001,2024-01-03,0.25\n600000,2024-01-03,-0.5\n"
        );
    }

    #[test]
    fn undefined_values_are_empty_fields() {
        let dir = TempDir::new().unwrap();
        let writer = CsvFactorWriter::new(dir.path().to_path_buf());
        writer.write(&sample_table()).unwrap();

        let content =
            fs::read_to_string(dir.path().join("momentum_5d").join("2024-01-02.csv")).unwrap();
        assert_eq!(content, "code,date,momentum_5d\n000001,2024-01-02,\n");
    }

    #[test]
    fn rerun_overwrites() {
        let dir = TempDir::new().unwrap();
        let writer = CsvFactorWriter::new(dir.path().to_path_buf());
        writer.write(&sample_table()).unwrap();

        let mut table = sample_table();
        table.points = vec![point("000001", 3, Some(1.0))];
        writer.write(&table).unwrap();

        let content =
            fs::read_to_string(dir.path().join("momentum_5d").join("2024-01-03.csv")).unwrap();
        assert_eq!(content, "code,date,momentum_5d\n000001,2024-01-03,1\n");
    }

    #[test]
    fn empty_table_creates_folder_only() {
        let dir = TempDir::new().unwrap();
        let writer = CsvFactorWriter::new(dir.path().join("nested").join("factor"));
        let table = FactorTable {
            name: "price_amplitude".into(),
            points: Vec::new(),
        };

        let summary = writer.write(&table).unwrap();

        assert_eq!(summary, WriteSummary::default());
        let folder = writer.factor_folder("price_amplitude");
        assert!(folder.is_dir());
        assert_eq!(fs::read_dir(folder).unwrap().count(), 0);
    }
}
