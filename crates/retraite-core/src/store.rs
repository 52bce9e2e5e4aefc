//! The `PensionStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `retraite-store-sqlite`). Higher layers (`retraite-api`,
//! `retraite-ingest`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  filter::StatsFilter,
  record::{NewPensionRecord, PensionRecord},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Pagination parameters for [`PensionStore::list`]. Pages are 1-based.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
  pub page:  u64,
  pub limit: u64,
}

impl PageQuery {
  pub fn offset(self) -> u64 {
    self.page.saturating_sub(1) * self.limit
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a pension-record store backend.
///
/// Records are created in bulk by the ingestion pipeline or singly through
/// the API; reads, updates and deletes address one record by id. The one
/// aggregate operation is [`PensionStore::risk_tier_counts`], which the risk
/// aggregator turns into a labelled distribution.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PensionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new record and return it with its store-assigned id.
  fn create(
    &self,
    record: NewPensionRecord,
  ) -> impl Future<Output = Result<PensionRecord, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PensionRecord>, Self::Error>> + Send + '_;

  /// One page of records plus the unpaginated total count.
  fn list(
    &self,
    page: PageQuery,
  ) -> impl Future<Output = Result<(Vec<PensionRecord>, u64), Self::Error>> + Send + '_;

  /// Overwrite an existing record in place. Errors if the id is unknown.
  fn update(
    &self,
    record: PensionRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a record by id. Errors if the id is unknown.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Count matching records grouped by raw `predicted_risk_tier`.
  ///
  /// Only tiers with at least one matching record are returned; ordering is
  /// unspecified.
  fn risk_tier_counts(
    &self,
    filter: StatsFilter,
  ) -> impl Future<Output = Result<Vec<(u8, u64)>, Self::Error>> + Send + '_;
}
