//! Unified table of daily records across all codes.
//!
//! Records are kept sorted by (code, date). Every factor relies on this
//! ordering so that lag operations never cross a code boundary.

use crate::domain::daily_record::DailyRecord;
use crate::domain::error::FactorError;
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    records: Vec<DailyRecord>,
}

impl UnifiedTable {
    /// Concatenate records from any number of sources, sort by (code, date)
    /// and reject duplicate (code, date) pairs.
    pub fn from_records(mut records: Vec<DailyRecord>) -> Result<Self, FactorError> {
        records.sort_by(|a, b| a.key().cmp(&b.key()));

        if let Some(dup) = records.windows(2).find(|w| w[0].key() == w[1].key()) {
            return Err(FactorError::DuplicateRecord {
                code: dup[1].code.clone(),
                date: dup[1].date,
            });
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// Contiguous per-code slices, in code order.
    pub fn groups(&self) -> CodeGroups<'_> {
        CodeGroups {
            rest: &self.records,
        }
    }

    pub fn code_count(&self) -> usize {
        self.groups().count()
    }

    /// All distinct dates across every code, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let unique: BTreeSet<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        unique.into_iter().collect()
    }
}

/// Iterator over the per-code runs of a [`UnifiedTable`].
pub struct CodeGroups<'a> {
    rest: &'a [DailyRecord],
}

impl<'a> Iterator for CodeGroups<'a> {
    type Item = &'a [DailyRecord];

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.first()?;
        let end = self
            .rest
            .iter()
            .position(|r| r.code != first.code)
            .unwrap_or(self.rest.len());
        let (group, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(group)
    }
}
