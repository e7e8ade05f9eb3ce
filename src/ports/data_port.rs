//! Daily data access port trait.

use crate::domain::daily_record::DailyRecord;
use crate::domain::error::FactorError;

pub trait DataPort {
    /// Every daily record from every source, in no particular order.
    fn load_records(&self) -> Result<Vec<DailyRecord>, FactorError>;
}
