//! Factor computation driver: load → compute → write, once per factor.

use crate::domain::error::FactorError;
use crate::domain::factor::{FactorKind, FactorTable};
use crate::domain::unified_table::UnifiedTable;
use crate::ports::data_port::DataPort;
use crate::ports::factor_writer_port::FactorWriterPort;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorRunSummary {
    pub factor: String,
    pub rows: usize,
    pub defined: usize,
    pub files: usize,
}

/// Read every daily record and build the sorted unified table.
pub fn load_unified_table(data_port: &dyn DataPort) -> Result<UnifiedTable, FactorError> {
    let table = UnifiedTable::from_records(data_port.load_records()?)?;
    info!(
        rows = table.len(),
        codes = table.code_count(),
        "built unified table"
    );
    Ok(table)
}

/// Compute one factor over `table` and persist it.
pub fn process_and_save_factor(
    table: &UnifiedTable,
    kind: FactorKind,
    writer: &dyn FactorWriterPort,
) -> Result<FactorRunSummary, FactorError> {
    let factor = FactorTable::compute(kind, table);
    let written = writer.write(&factor)?;

    let summary = FactorRunSummary {
        factor: factor.name.clone(),
        rows: written.rows,
        defined: factor.defined_count(),
        files: written.files,
    };
    info!(
        factor = %summary.factor,
        rows = summary.rows,
        defined = summary.defined,
        files = summary.files,
        "factor written"
    );
    Ok(summary)
}

/// Load once, then compute and write each factor in order.
pub fn run_factors(
    data_port: &dyn DataPort,
    writer: &dyn FactorWriterPort,
    kinds: &[FactorKind],
) -> Result<Vec<FactorRunSummary>, FactorError> {
    let table = load_unified_table(data_port)?;
    kinds
        .iter()
        .map(|&kind| process_and_save_factor(&table, kind, writer))
        .collect()
}
