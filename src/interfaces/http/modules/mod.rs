pub mod catalog;
pub mod editor;
pub mod health;
pub mod metrics;
pub mod tiers;
