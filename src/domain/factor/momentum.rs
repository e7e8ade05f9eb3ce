//! Momentum factor.
//!
//! MOM(n)[i] = C[i] / C[i-n] - 1
//! Warmup: first n records undefined. C[i-n] == 0 is undefined.

use crate::domain::daily_record::DailyRecord;
use crate::domain::factor::defined;

pub fn calculate_momentum(records: &[DailyRecord], window: usize) -> Vec<Option<f64>> {
    (0..records.len())
        .map(|i| {
            if window == 0 || i < window {
                return None;
            }
            let prev_close = records[i - window].close;
            defined(records[i].close / prev_close - 1.0)
        })
        .collect()
}
