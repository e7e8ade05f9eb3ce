//! Core domain types and logic.

pub mod daily_record;
pub mod unified_table;
pub mod factor;
pub mod pipeline;
pub mod group_table;
pub mod report;
pub mod error;
