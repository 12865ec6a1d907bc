//! Usage component aggregate

pub mod model;

pub use model::{PlanDuration, UsageComponent};
