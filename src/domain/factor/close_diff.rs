//! Spreads of open, high and low against the close.
//!
//! open_close_diff[i] = O[i] - C[i]
//! high_close_diff[i] = H[i] - C[i]
//! low_close_diff[i]  = L[i] - C[i]

use crate::domain::daily_record::DailyRecord;
use crate::domain::factor::defined;

fn against_close(records: &[DailyRecord], field: fn(&DailyRecord) -> f64) -> Vec<Option<f64>> {
    records.iter().map(|r| defined(field(r) - r.close)).collect()
}

pub fn calculate_open_close_diff(records: &[DailyRecord]) -> Vec<Option<f64>> {
    against_close(records, |r| r.open)
}

pub fn calculate_high_close_diff(records: &[DailyRecord]) -> Vec<Option<f64>> {
    against_close(records, |r| r.high)
}

pub fn calculate_low_close_diff(records: &[DailyRecord]) -> Vec<Option<f64>> {
    against_close(records, |r| r.low)
}
