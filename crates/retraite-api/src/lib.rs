//! JSON REST API for the retraite pension-risk service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`retraite_core::store::PensionStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", retraite_api::api_router(store.clone(), config))
//! ```

pub mod error;
pub mod imports;
pub mod pensions;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use retraite_core::store::PensionStore;

pub use error::ApiError;

// ─── Configuration & state ───────────────────────────────────────────────────

/// Handler tunables, passed in explicitly at router construction — there is
/// no ambient configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Page size used when a list request omits `limit`.
  pub default_page_limit: u64,
  /// Write-concurrency bound handed to the ingestion pipeline.
  pub ingest_concurrency: usize,
}

impl Default for ApiConfig {
  fn default() -> Self {
    ApiConfig { default_page_limit: 10, ingest_concurrency: 4 }
  }
}

/// Shared state threaded through all axum handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
}

// Manual impl: `S` itself does not need to be `Clone` behind the `Arc`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    ApiState {
      store:  Arc::clone(&self.store),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, config: ApiConfig) -> Router<()>
where
  S: PensionStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let state = ApiState { store, config: Arc::new(config) };

  Router::new()
    // Pension records
    .route(
      "/pensions",
      get(pensions::list::<S>).post(pensions::create::<S>),
    )
    .route(
      "/pensions/{id}",
      get(pensions::get_one::<S>)
        .put(pensions::update_one::<S>)
        .delete(pensions::delete_one::<S>),
    )
    // Risk statistics
    .route("/stats/risk-levels", get(stats::risk_levels::<S>))
    // Bulk import
    .route("/imports", post(imports::upload::<S>))
    .with_state(state)
}
