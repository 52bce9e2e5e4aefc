//! Positional row parser: one raw spreadsheet row → one validated record, or
//! a structured rejection naming the offending field.
//!
//! Column order is fixed (not header-driven); the source format puts the 16
//! record fields at columns 0–15 in declaration order. Malformed input never
//! panics — every conversion failure becomes a [`RejectReason`] that aborts
//! that row only.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use thiserror::Error;

use retraite_core::record::NewPensionRecord;

/// Minimum cell count for a parseable row.
pub const MIN_COLUMNS: usize = 16;

/// Accepted date-time formats, tried in order. Day-first wins for ambiguous
/// values like `03/04/2025 00:00:00`.
const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

// ─── Rejection ───────────────────────────────────────────────────────────────

/// Why a row was rejected. The display form is the stable, kebab-case reason
/// string reported in ingest summaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
  #[error("insufficient-columns")]
  InsufficientColumns,

  #[error("invalid-integer:{0}")]
  InvalidInteger(&'static str),

  #[error("invalid-decimal:{0}")]
  InvalidDecimal(&'static str),

  #[error("invalid-date:{0}")]
  InvalidDate(&'static str),

  /// Recorded by the ingestion driver when an otherwise-valid row fails at
  /// the storage layer.
  #[error("storage-error:{0}")]
  StorageError(String),
}

impl Serialize for RejectReason {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// One rejected row: its original 1-based sheet position and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
  pub position: usize,
  pub reason:   RejectReason,
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse one data row at 1-based sheet `position`.
///
/// Returns a fully-populated record or the first rejection encountered; a
/// partially-populated record is never produced.
pub fn parse_row(
  position: usize,
  cells: &[String],
) -> Result<NewPensionRecord, RowRejection> {
  parse_fields(cells).map_err(|reason| RowRejection { position, reason })
}

fn parse_fields(cells: &[String]) -> Result<NewPensionRecord, RejectReason> {
  if cells.len() < MIN_COLUMNS {
    return Err(RejectReason::InsufficientColumns);
  }

  // Text fields pass through verbatim; only numeric and date cells are
  // interpreted.
  Ok(NewPensionRecord {
    region_code:             cells[0].clone(),
    advantage_code:          cells[1].clone(),
    pension_number:          cells[2].clone(),
    pension_status:          cells[3].clone(),
    birth_date:              parse_date("birth_date", &cells[4])?,
    entitlement_date:        parse_date("entitlement_date", &cells[5])?,
    sex:                     cells[6].clone(),
    net_monthly_amount:      parse_decimal("net_monthly_amount", &cells[7])?,
    direct_rate:             parse_decimal("direct_rate", &cells[8])?,
    survivor_rate:           parse_decimal("survivor_rate", &cells[9])?,
    global_rate:             parse_decimal("global_rate", &cells[10])?,
    age_at_entitlement:      parse_small_int("age_at_entitlement", &cells[11])?,
    pension_duration_months: parse_duration(
      "pension_duration_months",
      &cells[12],
    )?,
    category_average_age:    parse_small_int("category_average_age", &cells[13])?,
    age_risk_flag:           parse_small_int("age_risk_flag", &cells[14])?,
    predicted_risk_tier:     parse_small_int("predicted_risk_tier", &cells[15])?,
  })
}

// ─── Field helpers ───────────────────────────────────────────────────────────

fn parse_small_int(field: &'static str, cell: &str) -> Result<u8, RejectReason> {
  cell
    .trim()
    .parse()
    .map_err(|_| RejectReason::InvalidInteger(field))
}

fn parse_duration(field: &'static str, cell: &str) -> Result<u32, RejectReason> {
  cell
    .trim()
    .parse()
    .map_err(|_| RejectReason::InvalidInteger(field))
}

fn parse_decimal(field: &'static str, cell: &str) -> Result<f64, RejectReason> {
  cell
    .trim()
    .parse()
    .map_err(|_| RejectReason::InvalidDecimal(field))
}

fn parse_date(
  field: &'static str,
  cell: &str,
) -> Result<NaiveDateTime, RejectReason> {
  let cell = cell.trim();
  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
    .ok_or(RejectReason::InvalidDate(field))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
