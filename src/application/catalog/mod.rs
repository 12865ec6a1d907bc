pub mod snapshot;

pub use snapshot::MetricSnapshot;
