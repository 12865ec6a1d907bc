//! Metric catalog adapters

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileMetricSource;
pub use memory::InMemoryMetricSource;
