//! Port traits at the I/O boundary.

pub mod bundle_port;
pub mod chart_port;
pub mod config_port;
pub mod data_port;
pub mod factor_writer_port;
