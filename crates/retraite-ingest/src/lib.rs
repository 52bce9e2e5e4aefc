//! Bulk ingestion pipeline: drives the row parser over a whole sheet and
//! fans accepted records out to a bounded pool of storage writers.
//!
//! Failure accounting is per-row: a malformed cell or a storage error for one
//! row becomes a [`RowRejection`] in the summary and never aborts the batch.
//! The only fatal conditions are an unreadable source and a sheet with no
//! data rows. The pool joins on every outstanding write before the summary is
//! returned, so `accepted + rejected` always equals the data-row count
//! regardless of completion order.

use std::{path::Path, sync::Arc};

use serde::Serialize;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

use retraite_core::store::PensionStore;
use retraite_sheet::{RejectReason, RowRejection, Workbook, parse_row};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Fatal ingestion errors. Everything row-shaped is a rejection instead.
#[derive(Debug, Error)]
pub enum Error {
  #[error("sheet has no data rows (header only or empty)")]
  NoDataRows,

  #[error(transparent)]
  Sheet(#[from] retraite_sheet::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Summary ─────────────────────────────────────────────────────────────────

/// The outcome of one ingestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSummary {
  pub accepted:   u64,
  pub rejected:   u64,
  /// Every rejected row with its original 1-based sheet position, for
  /// operator diagnosis. Rejected rows are never retried.
  pub rejections: Vec<RowRejection>,
}

impl IngestSummary {
  fn reject(&mut self, rejection: RowRejection) {
    tracing::warn!(
      position = rejection.position,
      reason = %rejection.reason,
      "row rejected"
    );
    self.rejected += 1;
    self.rejections.push(rejection);
  }

  fn absorb(&mut self, outcome: Result<Result<(), RowRejection>, JoinError>) {
    match outcome {
      Ok(Ok(())) => self.accepted += 1,
      Ok(Err(rejection)) => self.reject(rejection),
      // Worker bodies are panic-free; should one be lost anyway, the row
      // must still be accounted for so the counts stay exact.
      Err(join_error) => self.reject(RowRejection {
        position: 0,
        reason:   RejectReason::StorageError(join_error.to_string()),
      }),
    }
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Drives ingestion against one store with a fixed write-concurrency bound.
pub struct Ingestor<S> {
  store:       Arc<S>,
  concurrency: usize,
}

impl<S> Ingestor<S>
where
  S: PensionStore + 'static,
{
  /// `concurrency` is the maximum number of in-flight storage writes; it is
  /// clamped to at least 1.
  pub fn new(store: Arc<S>, concurrency: usize) -> Self {
    Ingestor { store, concurrency: concurrency.max(1) }
  }

  /// Open the workbook at `path` and ingest its first sheet.
  pub async fn ingest_file(
    &self,
    path: impl AsRef<Path>,
  ) -> Result<IngestSummary> {
    let workbook = Workbook::open(path)?;
    self.ingest_workbook(&workbook).await
  }

  /// Ingest an already-read workbook.
  pub async fn ingest_workbook(
    &self,
    workbook: &Workbook,
  ) -> Result<IngestSummary> {
    tracing::info!(
      sheet = %workbook.name,
      rows = workbook.rows.len(),
      "ingesting sheet"
    );
    self.ingest_rows(&workbook.rows).await
  }

  /// Ingest raw rows. The first row is the header and is discarded.
  pub async fn ingest_rows(
    &self,
    rows: &[Vec<String>],
  ) -> Result<IngestSummary> {
    if rows.len() < 2 {
      return Err(Error::NoDataRows);
    }

    let mut summary = IngestSummary::default();
    let mut pool: JoinSet<Result<(), RowRejection>> = JoinSet::new();

    for (index, cells) in rows.iter().enumerate().skip(1) {
      let position = index + 1; // 1-based sheet position

      let record = match parse_row(position, cells) {
        Ok(record) => record,
        Err(rejection) => {
          summary.reject(rejection);
          continue;
        }
      };

      // Keep at most `concurrency` writes in flight.
      while pool.len() >= self.concurrency {
        if let Some(outcome) = pool.join_next().await {
          summary.absorb(outcome);
        }
      }

      let store = Arc::clone(&self.store);
      pool.spawn(async move {
        match store.create(record).await {
          Ok(_) => Ok(()),
          Err(e) => Err(RowRejection {
            position,
            reason: RejectReason::StorageError(e.to_string()),
          }),
        }
      });
    }

    // Join barrier: every row's outcome is in before we report.
    while let Some(outcome) = pool.join_next().await {
      summary.absorb(outcome);
    }

    tracing::info!(
      accepted = summary.accepted,
      rejected = summary.rejected,
      "ingest finished"
    );
    Ok(summary)
  }
}
