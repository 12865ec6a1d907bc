//! # Pricing Console
//!
//! Usage-based pricing components for a billing console: metric selection,
//! tiered price ladders and their validation, served over a REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: tiers, metrics, usage components, validation rules and ports
//! - **application**: catalog snapshots, tier and component editors, the session registry
//! - **infrastructure**: metric catalog sources (in-memory, JSON file)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: error types and shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use interfaces::http::create_api_router;
pub use shared::errors::{AppError, CatalogError, ConfigError, EditorError};
