//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_bundle_adapter;
pub mod csv_factor_writer;
pub mod file_config_adapter;
pub mod svg_chart;
