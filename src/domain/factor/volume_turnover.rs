//! Volume to turnover ratio factor.
//!
//! VTR[i] = V[i] / T[i]
//! T[i] == 0 is undefined, not an error.

use crate::domain::daily_record::DailyRecord;
use crate::domain::factor::defined;

pub fn calculate_volume_turnover_ratio(records: &[DailyRecord]) -> Vec<Option<f64>> {
    records
        .iter()
        .map(|r| defined(r.volume / r.turnover_ratio))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_record(volume: f64, turnover_ratio: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            code: "300750".into(),
            open: 1.0,
            close: 1.0,
            low: 1.0,
            high: 1.0,
            volume,
            money: volume,
            turnover_ratio,
        }
    }

    #[test]
    fn ratio_basic() {
        let values = calculate_volume_turnover_ratio(&[make_record(1_000_000.0, 2.5)]);
        assert_relative_eq!(values[0].unwrap(), 400_000.0);
    }

    #[test]
    fn zero_turnover_is_undefined() {
        let values = calculate_volume_turnover_ratio(&[
            make_record(1_000.0, 0.0),
            make_record(0.0, 0.0),
            make_record(-5.0, 0.0),
        ]);
        assert_eq!(values, vec![None, None, None]);
    }

    #[test]
    fn zero_volume_is_zero() {
        let values = calculate_volume_turnover_ratio(&[make_record(0.0, 1.5)]);
        assert_eq!(values, vec![Some(0.0)]);
    }
}
