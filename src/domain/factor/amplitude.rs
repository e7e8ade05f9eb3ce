//! Price amplitude factor: H[i] - L[i].

use crate::domain::daily_record::DailyRecord;
use crate::domain::factor::defined;

pub fn calculate_price_amplitude(records: &[DailyRecord]) -> Vec<Option<f64>> {
    records.iter().map(|r| defined(r.high - r.low)).collect()
}
