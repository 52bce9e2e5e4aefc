//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings; date-times as
//! `%Y-%m-%d %H:%M:%S` text, which is also one of the accepted spreadsheet
//! input formats.

use chrono::NaiveDateTime;
use retraite_core::record::PensionRecord;
use uuid::Uuid;

use crate::{Error, Result};

/// Storage format for date-time columns.
pub const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: NaiveDateTime) -> String { dt.format(DT_FORMAT).to_string() }

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DT_FORMAT)
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// Column list shared by every SELECT over `pension_records`; order matches
/// [`RawRecord::from_row`].
pub const SELECT_COLUMNS: &str = "id, region_code, advantage_code, \
  pension_number, pension_status, birth_date, entitlement_date, sex, \
  net_monthly_amount, direct_rate, survivor_rate, global_rate, \
  age_at_entitlement, pension_duration_months, category_average_age, \
  age_risk_flag, predicted_risk_tier";

/// A `pension_records` row as it comes out of SQLite, before id/date
/// decoding.
pub struct RawRecord {
  pub id:                      String,
  pub region_code:             String,
  pub advantage_code:          String,
  pub pension_number:          String,
  pub pension_status:          String,
  pub birth_date:              String,
  pub entitlement_date:        String,
  pub sex:                     String,
  pub net_monthly_amount:      f64,
  pub direct_rate:             f64,
  pub survivor_rate:           f64,
  pub global_rate:             f64,
  pub age_at_entitlement:      u8,
  pub pension_duration_months: u32,
  pub category_average_age:    u8,
  pub age_risk_flag:           u8,
  pub predicted_risk_tier:     u8,
}

impl RawRecord {
  /// Read a row produced by a [`SELECT_COLUMNS`] projection.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawRecord {
      id:                      row.get(0)?,
      region_code:             row.get(1)?,
      advantage_code:          row.get(2)?,
      pension_number:          row.get(3)?,
      pension_status:          row.get(4)?,
      birth_date:              row.get(5)?,
      entitlement_date:        row.get(6)?,
      sex:                     row.get(7)?,
      net_monthly_amount:      row.get(8)?,
      direct_rate:             row.get(9)?,
      survivor_rate:           row.get(10)?,
      global_rate:             row.get(11)?,
      age_at_entitlement:      row.get(12)?,
      pension_duration_months: row.get(13)?,
      category_average_age:    row.get(14)?,
      age_risk_flag:           row.get(15)?,
      predicted_risk_tier:     row.get(16)?,
    })
  }

  pub fn into_record(self) -> Result<PensionRecord> {
    Ok(PensionRecord {
      id:                      decode_uuid(&self.id)?,
      region_code:             self.region_code,
      advantage_code:          self.advantage_code,
      pension_number:          self.pension_number,
      pension_status:          self.pension_status,
      birth_date:              decode_dt(&self.birth_date)?,
      entitlement_date:        decode_dt(&self.entitlement_date)?,
      sex:                     self.sex,
      net_monthly_amount:      self.net_monthly_amount,
      direct_rate:             self.direct_rate,
      survivor_rate:           self.survivor_rate,
      global_rate:             self.global_rate,
      age_at_entitlement:      self.age_at_entitlement,
      pension_duration_months: self.pension_duration_months,
      category_average_age:    self.category_average_age,
      age_risk_flag:           self.age_risk_flag,
      predicted_risk_tier:     self.predicted_risk_tier,
    })
  }
}
