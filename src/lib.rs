//! NutriScan core — personalized product-health compatibility engine.
//!
//! The engine converts a user's [`models::HealthProfile`] and a scanned
//! product's [`models::ProductRecord`] into a compatibility score plus
//! categorized insights, assembled into an immutable
//! [`models::PersonalizedReport`]. Reports can be persisted to the local
//! scan history and optionally enriched by remote collaborators, but are
//! fully usable without either.

pub mod config;
pub mod db;
pub mod engine;
pub mod history;
pub mod models;
pub mod remote;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the host application. Honors RUST_LOG, falling
/// back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
}
