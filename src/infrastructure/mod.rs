//! Infrastructure layer - external concerns

pub mod catalog;

pub use catalog::{InMemoryMetricSource, JsonFileMetricSource};
