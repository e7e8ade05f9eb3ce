//! Date-indexed tables of per-group series, as produced by an upstream
//! backtest, and the bundle that carries them into the report stage.

use crate::domain::error::FactorError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Column-major table: one `f64` column per group label, indexed by date.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTable {
    dates: Vec<NaiveDate>,
    labels: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl GroupTable {
    pub fn new(
        dates: Vec<NaiveDate>,
        labels: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, FactorError> {
        if labels.len() != columns.len() {
            return Err(FactorError::InvalidTable {
                reason: format!("{} labels for {} columns", labels.len(), columns.len()),
            });
        }
        if let Some((label, col)) = labels
            .iter()
            .zip(&columns)
            .find(|(_, col)| col.len() != dates.len())
        {
            return Err(FactorError::InvalidTable {
                reason: format!(
                    "column {} has {} values for {} dates",
                    label,
                    col.len(),
                    dates.len()
                ),
            });
        }
        Ok(Self {
            dates,
            labels,
            columns,
        })
    }

    /// Build from row-major values (one inner vec per date).
    pub fn from_rows(
        dates: Vec<NaiveDate>,
        labels: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, FactorError> {
        let mut columns = vec![Vec::with_capacity(rows.len()); labels.len()];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != labels.len() {
                return Err(FactorError::InvalidTable {
                    reason: format!("row {} has {} values for {} labels", i, row.len(), labels.len()),
                });
            }
            for (col, &value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }
        Self::new(dates, labels, columns)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, label: &str) -> Option<&[f64]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.columns[i].as_slice())
    }

    /// Labelled columns in table order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Reassign labels in reverse order. Data stays in place, so the series
    /// under the first label ends up under the last one.
    pub fn reverse_labels(&mut self) {
        self.labels.reverse();
    }

    /// Append a column, replacing any existing column with the same label.
    pub fn set_column(&mut self, label: &str, values: Vec<f64>) -> Result<(), FactorError> {
        if values.len() != self.dates.len() {
            return Err(FactorError::InvalidTable {
                reason: format!(
                    "column {} has {} values for {} dates",
                    label,
                    values.len(),
                    self.dates.len()
                ),
            });
        }
        match self.labels.iter().position(|l| l == label) {
            Some(i) => self.columns[i] = values,
            None => {
                self.labels.push(label.to_string());
                self.columns.push(values);
            }
        }
        Ok(())
    }

    /// Compounded running product `cumprod(1 + r)` per column. A `NaN`
    /// period yields `NaN` and leaves the running product untouched.
    pub fn cumulative_product(&self) -> GroupTable {
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let mut acc = 1.0;
                col.iter()
                    .map(|&r| {
                        if r.is_nan() {
                            f64::NAN
                        } else {
                            acc *= 1.0 + r;
                            acc
                        }
                    })
                    .collect()
            })
            .collect();
        GroupTable {
            dates: self.dates.clone(),
            labels: self.labels.clone(),
            columns,
        }
    }
}

/// Per-period information coefficient of one factor.
#[derive(Debug, Clone, PartialEq)]
pub struct IcSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl IcSeries {
    /// Mean over the non-`NaN` periods, rounded to 3 decimals with ties to
    /// even. An empty series has mean 0.
    pub fn rounded_mean(&self) -> f64 {
        let finite: Vec<f64> = self.values.iter().copied().filter(|v| !v.is_nan()).collect();
        if finite.is_empty() {
            return 0.0;
        }
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        (mean * 1000.0).round_ties_even() / 1000.0
    }
}

/// Upstream backtest output, keyed by factor name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestBundle {
    pub pro: BTreeMap<String, GroupTable>,
    pub pnl: BTreeMap<String, GroupTable>,
    pub ic: BTreeMap<String, IcSeries>,
}

impl BacktestBundle {
    pub fn factors(&self) -> impl Iterator<Item = &str> {
        self.ic.keys().map(String::as_str)
    }
}
