//! Daily factor implementations.
//!
//! This module provides the types shared by every factor:
//! - `FactorKind`: factor identity + parameters (parses from its output name)
//! - `FactorPoint`: a single (code, date, value) row
//! - `FactorTable`: the long-form output of one factor over a unified table
//!
//! Each factor function receives the records of exactly one code, in date
//! order, and returns one value per record. `None` marks an undefined value
//! (insufficient history, division by zero, missing source field).

pub mod amplitude;
pub mod close_diff;
pub mod momentum;
pub mod volume_turnover;

use crate::domain::daily_record::DailyRecord;
use crate::domain::error::FactorError;
use crate::domain::unified_table::UnifiedTable;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MOMENTUM_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKind {
    Momentum(usize),
    PriceAmplitude,
    OpenCloseDiff,
    HighCloseDiff,
    LowCloseDiff,
    VolumeTurnoverRatio,
}

impl FactorKind {
    /// The six factors in run order.
    pub fn default_set(window: usize) -> Vec<FactorKind> {
        vec![
            FactorKind::Momentum(window),
            FactorKind::PriceAmplitude,
            FactorKind::OpenCloseDiff,
            FactorKind::HighCloseDiff,
            FactorKind::LowCloseDiff,
            FactorKind::VolumeTurnoverRatio,
        ]
    }

    /// Output name, used as the column header and the output folder name.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Apply the factor to one code's date-ordered records.
    pub fn apply(&self, records: &[DailyRecord]) -> Vec<Option<f64>> {
        match self {
            FactorKind::Momentum(window) => momentum::calculate_momentum(records, *window),
            FactorKind::PriceAmplitude => amplitude::calculate_price_amplitude(records),
            FactorKind::OpenCloseDiff => close_diff::calculate_open_close_diff(records),
            FactorKind::HighCloseDiff => close_diff::calculate_high_close_diff(records),
            FactorKind::LowCloseDiff => close_diff::calculate_low_close_diff(records),
            FactorKind::VolumeTurnoverRatio => {
                volume_turnover::calculate_volume_turnover_ratio(records)
            }
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorKind::Momentum(window) => write!(f, "momentum_{}d", window),
            FactorKind::PriceAmplitude => write!(f, "price_amplitude"),
            FactorKind::OpenCloseDiff => write!(f, "open_close_diff"),
            FactorKind::HighCloseDiff => write!(f, "high_close_diff"),
            FactorKind::LowCloseDiff => write!(f, "low_close_diff"),
            FactorKind::VolumeTurnoverRatio => write!(f, "volume_turnover_ratio"),
        }
    }
}

impl FromStr for FactorKind {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let kind = match name.as_str() {
            "momentum" => FactorKind::Momentum(DEFAULT_MOMENTUM_WINDOW),
            "price_amplitude" => FactorKind::PriceAmplitude,
            "open_close_diff" => FactorKind::OpenCloseDiff,
            "high_close_diff" => FactorKind::HighCloseDiff,
            "low_close_diff" => FactorKind::LowCloseDiff,
            "volume_turnover_ratio" => FactorKind::VolumeTurnoverRatio,
            other => {
                let window = other
                    .strip_prefix("momentum_")
                    .and_then(|rest| rest.strip_suffix('d'))
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|&n| n > 0)
                    .ok_or_else(|| FactorError::UnknownFactor(s.to_string()))?;
                FactorKind::Momentum(window)
            }
        };
        Ok(kind)
    }
}

/// Keep finite results only.
pub(crate) fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorPoint {
    pub code: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct FactorTable {
    pub name: String,
    pub points: Vec<FactorPoint>,
}

impl FactorTable {
    /// Compute `kind` over every code of `table`. Row order follows the
    /// unified table: by code, then date.
    pub fn compute(kind: FactorKind, table: &UnifiedTable) -> Self {
        let mut points = Vec::with_capacity(table.len());

        for group in table.groups() {
            let values = kind.apply(group);
            points.extend(group.iter().zip(values).map(|(record, value)| FactorPoint {
                code: record.code.clone(),
                date: record.date,
                value,
            }));
        }

        Self {
            name: kind.name(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }

    /// Rows grouped by date, ascending. Within a date rows keep code order.
    pub fn partition_by_date(&self) -> BTreeMap<NaiveDate, Vec<&FactorPoint>> {
        let mut partitions: BTreeMap<NaiveDate, Vec<&FactorPoint>> = BTreeMap::new();
        for point in &self.points {
            partitions.entry(point.date).or_default().push(point);
        }
        partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(code: &str, day: u32, close: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            code: code.to_string(),
            open: close,
            close,
            low: close - 1.0,
            high: close + 1.0,
            volume: 100.0,
            money: 100.0 * close,
            turnover_ratio: 2.0,
        }
    }

    #[test]
    fn names_match_output_folders() {
        let names: Vec<String> = FactorKind::default_set(5).iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec![
                "momentum_5d",
                "price_amplitude",
                "open_close_diff",
                "high_close_diff",
                "low_close_diff",
                "volume_turnover_ratio",
            ]
        );
    }

    #[test]
    fn parse_round_trips_names() {
        for kind in FactorKind::default_set(20) {
            assert_eq!(kind.name().parse::<FactorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_bare_momentum_uses_default_window() {
        assert_eq!(
            "momentum".parse::<FactorKind>().unwrap(),
            FactorKind::Momentum(DEFAULT_MOMENTUM_WINDOW)
        );
        assert_eq!(
            " Momentum_10d ".parse::<FactorKind>().unwrap(),
            FactorKind::Momentum(10)
        );
    }

    #[test]
    fn parse_rejects_unknown_and_zero_window() {
        assert!(matches!(
            "rsi_14".parse::<FactorKind>(),
            Err(FactorError::UnknownFactor(_))
        ));
        assert!("momentum_0d".parse::<FactorKind>().is_err());
        assert!("momentum_xd".parse::<FactorKind>().is_err());
    }

    #[test]
    fn compute_does_not_leak_across_codes() {
        let table = UnifiedTable::from_records(vec![
            make_record("A", 1, 10.0),
            make_record("A", 2, 20.0),
            make_record("B", 1, 40.0),
            make_record("B", 2, 10.0),
        ])
        .unwrap();

        let factor = FactorTable::compute(FactorKind::Momentum(1), &table);

        assert_eq!(factor.name, "momentum_1d");
        let values: Vec<Option<f64>> = factor.points.iter().map(|p| p.value).collect();
        // B's first row must not look back at A's last close.
        assert_eq!(values, vec![None, Some(1.0), None, Some(-0.75)]);
    }

    #[test]
    fn compute_emits_one_row_per_record() {
        let table = UnifiedTable::from_records(vec![
            make_record("A", 1, 10.0),
            make_record("B", 1, 11.0),
            make_record("B", 2, 12.0),
        ])
        .unwrap();

        for kind in FactorKind::default_set(5) {
            let factor = FactorTable::compute(kind, &table);
            assert_eq!(factor.len(), table.len(), "{}", kind);
        }
    }

    #[test]
    fn partition_by_date_groups_all_codes() {
        let table = UnifiedTable::from_records(vec![
            make_record("A", 1, 10.0),
            make_record("A", 2, 11.0),
            make_record("B", 2, 12.0),
        ])
        .unwrap();
        let factor = FactorTable::compute(FactorKind::PriceAmplitude, &table);

        let partitions = factor.partition_by_date();
        assert_eq!(partitions.len(), 2);

        let day2 = &partitions[&NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()];
        let codes: Vec<&str> = day2.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B"]);
    }

    #[test]
    fn compute_on_empty_table() {
        let table = UnifiedTable::default();
        let factor = FactorTable::compute(FactorKind::Momentum(5), &table);
        assert!(factor.is_empty());
        assert!(factor.partition_by_date().is_empty());
    }
}
