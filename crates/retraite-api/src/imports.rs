//! Handler for `POST /imports` — bulk spreadsheet ingestion.
//!
//! The request body is the raw workbook file. The response is always a full
//! ingest summary when the sheet could be read (even at 100% row failure);
//! an unreadable workbook or a sheet with no data rows is a 400.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};

use retraite_core::store::PensionStore;
use retraite_ingest::{IngestSummary, Ingestor};
use retraite_sheet::Workbook;

use crate::{ApiState, error::ApiError};

/// `POST /imports` — body: the spreadsheet file bytes.
pub async fn upload<S>(
  State(state): State<ApiState<S>>,
  body: Bytes,
) -> Result<Json<IngestSummary>, ApiError>
where
  S: PensionStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let workbook = Workbook::from_bytes(&body)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let ingestor =
    Ingestor::new(Arc::clone(&state.store), state.config.ingest_concurrency);

  // Both fatal cases — unreadable sheet, no data rows — are caller errors.
  let summary = ingestor
    .ingest_workbook(&workbook)
    .await
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  Ok(Json(summary))
}
