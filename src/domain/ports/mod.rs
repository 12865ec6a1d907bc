//! Domain ports (hexagonal architecture boundaries)
//!
//! Ports define the interfaces between the domain core and the outside world.
//! These are trait contracts that external adapters implement.

use async_trait::async_trait;

use crate::domain::metric::Metric;
use crate::shared::errors::CatalogError;

/// Supplies metric definitions to editing sessions
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn list_metrics(&self) -> Result<Vec<Metric>, CatalogError>;
}
