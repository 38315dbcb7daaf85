//! HTTP API handlers for pearl-analyzer
//!
//! JSON endpoints consumed by the comparison page, CSV downloads and the
//! health check.

pub mod analysis;
pub mod export;
pub mod health;
pub mod ui;

pub use analysis::analysis_routes;
pub use export::export_routes;
pub use health::health_routes;
pub use ui::ui_routes;
