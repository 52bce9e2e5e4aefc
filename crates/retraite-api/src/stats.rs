//! Handler for `GET /stats/risk-levels`.
//!
//! Query params map onto [`StatsFilter::from_parts`]; `statuses` and
//! `groups` are accepted as comma-separated strings. The response is the
//! labelled tier distribution, complete or not at all — a failed store query
//! surfaces as a 500, never as a partial result.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;

use retraite_core::{
  filter::StatsFilter,
  stats::{RiskLevelStat, distribution},
  store::PensionStore,
};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct StatsParams {
  /// Exact region (wilaya) code; empty or absent = unfiltered.
  pub region:   Option<String>,
  /// Comma-separated `pension_status` values, e.g. `décès,fin droit`.
  pub statuses: Option<String>,
  /// Comma-separated advantage-group labels, e.g. `direct,veuves,(vide)`.
  pub groups:   Option<String>,
}

/// `GET /stats/risk-levels[?region=...][&statuses=...][&groups=...]`
pub async fn risk_levels<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<StatsParams>,
) -> Result<Json<Vec<RiskLevelStat>>, ApiError>
where
  S: PensionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let statuses = split_csv(params.statuses.as_deref());
  let groups = split_csv(params.groups.as_deref());
  let filter = StatsFilter::from_parts(params.region, statuses, &groups);

  let counts = state
    .store
    .risk_tier_counts(filter)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(distribution(&counts)))
}

fn split_csv(value: Option<&str>) -> Vec<String> {
  value
    .map(|s| {
      s.split(',')
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect()
    })
    .unwrap_or_default()
}
