//! Factor output port trait.

use crate::domain::error::FactorError;
use crate::domain::factor::FactorTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub files: usize,
    pub rows: usize,
}

/// Port for persisting a computed factor, one partition per date.
pub trait FactorWriterPort {
    fn write(&self, table: &FactorTable) -> Result<WriteSummary, FactorError>;
}
