//! Backtest result bundle access port trait.

use crate::domain::error::FactorError;
use crate::domain::group_table::BacktestBundle;

pub trait BundlePort {
    fn load_bundle(&self) -> Result<BacktestBundle, FactorError>;
}
