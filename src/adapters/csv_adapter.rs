//! CSV directory data adapter.
//!
//! One headerless file per symbol; columns follow [`DAILY_COLUMNS`].

use crate::domain::daily_record::{DAILY_COLUMNS, DailyRecord};
use crate::domain::error::FactorError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// `.csv` files in the base directory, sorted by file name.
    pub fn list_files(&self) -> Result<Vec<PathBuf>, FactorError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            FactorError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "failed to read directory {}: {}",
                    self.base_path.display(),
                    e
                ),
            ))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_csv = path.extension().is_some_and(|ext| ext == "csv");
            if is_csv && path.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Read one symbol file.
    pub fn read_file(&self, path: &Path) -> Result<Vec<DailyRecord>, FactorError> {
        let file = path.display().to_string();
        let content = fs::read(path).map_err(|e| {
            FactorError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", file, e),
            ))
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_slice());
        let mut records = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| FactorError::Csv {
                file: file.clone(),
                line: e.position().map(|p| p.line()).unwrap_or(0),
                reason: e.to_string(),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.len() != DAILY_COLUMNS.len() {
                return Err(FactorError::Csv {
                    file,
                    line,
                    reason: format!(
                        "expected {} columns, found {}",
                        DAILY_COLUMNS.len(),
                        record.len()
                    ),
                });
            }

            let date_str = record[0].trim();
            let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|_| {
                FactorError::InvalidDate {
                    file: file.clone(),
                    line,
                    value: date_str.to_string(),
                }
            })?;

            let number = |idx: usize| parse_number(&record[idx], DAILY_COLUMNS[idx], &file, line);

            records.push(DailyRecord {
                date,
                code: record[1].trim().to_string(),
                open: number(2)?,
                close: number(3)?,
                low: number(4)?,
                high: number(5)?,
                volume: number(6)?,
                money: number(7)?,
                turnover_ratio: number(8)?,
            });
        }

        Ok(records)
    }
}

/// Empty fields are source nulls and load as `NaN`.
fn parse_number(raw: &str, column: &str, file: &str, line: u64) -> Result<f64, FactorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse().map_err(|e| FactorError::Csv {
        file: file.to_string(),
        line,
        reason: format!("invalid {} value {:?}: {}", column, trimmed, e),
    })
}

impl DataPort for CsvAdapter {
    fn load_records(&self) -> Result<Vec<DailyRecord>, FactorError> {
        let files = self.list_files()?;
        let mut all = Vec::new();
        let mut skipped = 0usize;

        for path in &files {
            let records = self.read_file(path)?;
            if records.is_empty() {
                warn!(file = %path.display(), "skipping empty file");
                skipped += 1;
                continue;
            }
            debug!(file = %path.display(), rows = records.len(), "loaded file");
            all.extend(records);
        }

        info!(
            dir = %self.base_path.display(),
            files = files.len(),
            skipped,
            rows = all.len(),
            "loaded daily data"
        );
        Ok(all)
    }
}
