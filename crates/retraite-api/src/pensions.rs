//! Handlers for `/pensions` endpoints — plain pass-through CRUD.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/pensions` | Optional `?page=` and `?limit=` (1-based pages) |
//! | `POST`   | `/pensions` | Body: [`NewPensionRecord`]; returns 201 |
//! | `GET`    | `/pensions/:id` | 404 if not found |
//! | `PUT`    | `/pensions/:id` | Body: [`NewPensionRecord`]; overwrites in place |
//! | `DELETE` | `/pensions/:id` | 204 on success |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use retraite_core::{
  record::{NewPensionRecord, PensionRecord},
  store::{PageQuery, PensionStore},
};

use crate::{ApiState, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub page:  Option<u64>,
  pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ListMeta {
  pub total: u64,
  pub page:  u64,
  pub limit: u64,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub data: Vec<PensionRecord>,
  pub meta: ListMeta,
}

/// `GET /pensions[?page=1][&limit=10]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: PensionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = params.page.unwrap_or(1).max(1);
  let limit = params
    .limit
    .unwrap_or(state.config.default_page_limit)
    .max(1);

  let (data, total) = state
    .store
    .list(PageQuery { page, limit })
    .await
    .map_err(ApiError::store)?;

  Ok(Json(ListResponse { data, meta: ListMeta { total, page, limit } }))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /pensions` — body is a full record minus the id.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPensionRecord>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PensionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = state.store.create(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /pensions/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PensionRecord>, ApiError>
where
  S: PensionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("pension record {id} not found")))?;
  Ok(Json(record))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /pensions/:id` — overwrites every non-id field.
pub async fn update_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewPensionRecord>,
) -> Result<Json<PensionRecord>, ApiError>
where
  S: PensionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("pension record {id} not found")))?;

  let record = body.into_record(id);
  state
    .store
    .update(record.clone())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(record))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /pensions/:id`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PensionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("pension record {id} not found")))?;

  state.store.delete(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
