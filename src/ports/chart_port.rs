//! Chart rendering port trait.

use crate::domain::error::FactorError;
use crate::domain::report::LineChart;

/// Port for rendering report charts.
pub trait ChartPort {
    fn render(&self, chart: &LineChart) -> Result<(), FactorError>;
}
