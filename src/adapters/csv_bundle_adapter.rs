//! CSV backtest bundle adapter.
//!
//! Layout: `<base>/<factor>/pro.csv`, `pnl.csv`, `ic.csv`. Each file has a
//! `date` column followed by value columns; `ic.csv` has exactly one value
//! column. Every subdirectory holding an `ic.csv` is a factor.

use crate::adapters::csv_adapter::DATE_FORMAT;
use crate::domain::error::FactorError;
use crate::domain::group_table::{BacktestBundle, GroupTable, IcSeries};
use crate::ports::bundle_port::BundlePort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct CsvBundleAdapter {
    base_path: PathBuf,
}

struct RawTable {
    dates: Vec<NaiveDate>,
    labels: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl CsvBundleAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn factor_dirs(&self) -> Result<Vec<(String, PathBuf)>, FactorError> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.is_dir() && path.join("ic.csv").is_file() {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                dirs.push((name, path));
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

fn read_table(path: &Path) -> Result<RawTable, FactorError> {
    let file = path.display().to_string();
    let csv_err = |e: csv::Error| FactorError::Csv {
        file: file.clone(),
        line: e.position().map(|p| p.line()).unwrap_or(0),
        reason: e.to_string(),
    };

    let mut rdr = csv::Reader::from_path(path).map_err(csv_err)?;
    let labels: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .skip(1)
        .map(|h| h.trim().to_string())
        .collect();

    let mut dates = Vec::new();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let date_str = record.get(0).unwrap_or_default().trim();
        // Accept datetime-looking index values such as "2023-01-03 00:00:00".
        let day = date_str.split_whitespace().next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|_| {
            FactorError::InvalidDate {
                file: file.clone(),
                line,
                value: date_str.to_string(),
            }
        })?;

        let values = record
            .iter()
            .skip(1)
            .map(|raw| {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(f64::NAN);
                }
                trimmed.parse::<f64>().map_err(|e| FactorError::Csv {
                    file: file.clone(),
                    line,
                    reason: format!("invalid value {:?}: {}", trimmed, e),
                })
            })
            .collect::<Result<Vec<f64>, FactorError>>()?;

        dates.push(date);
        rows.push(values);
    }

    Ok(RawTable {
        dates,
        labels,
        rows,
    })
}

fn read_group_table(path: &Path) -> Result<GroupTable, FactorError> {
    let raw = read_table(path)?;
    GroupTable::from_rows(raw.dates, raw.labels, raw.rows)
}

fn read_ic(path: &Path) -> Result<IcSeries, FactorError> {
    let raw = read_table(path)?;
    if raw.labels.len() != 1 {
        return Err(FactorError::InvalidTable {
            reason: format!(
                "{}: expected one ic column, found {}",
                path.display(),
                raw.labels.len()
            ),
        });
    }
    Ok(IcSeries {
        dates: raw.dates,
        values: raw.rows.into_iter().map(|r| r[0]).collect(),
    })
}

impl BundlePort for CsvBundleAdapter {
    fn load_bundle(&self) -> Result<BacktestBundle, FactorError> {
        let mut bundle = BacktestBundle::default();

        for (factor, dir) in self.factor_dirs()? {
            bundle.ic.insert(factor.clone(), read_ic(&dir.join("ic.csv"))?);

            let pro_path = dir.join("pro.csv");
            if pro_path.is_file() {
                bundle.pro.insert(factor.clone(), read_group_table(&pro_path)?);
            }
            let pnl_path = dir.join("pnl.csv");
            if pnl_path.is_file() {
                bundle.pnl.insert(factor, read_group_table(&pnl_path)?);
            }
        }

        info!(
            dir = %self.base_path.display(),
            factors = bundle.ic.len(),
            "loaded backtest bundle"
        );
        Ok(bundle)
    }
}
