//! The beneficiary pension record — the one row shape everything else
//! consumes.
//!
//! A record's identity is immutable once assigned by the store; every other
//! field may be overwritten in place by an update. There is no versioning.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted beneficiary pension record.
///
/// Every numeric and date field is guaranteed parsed and present: rows that
/// fail field parsing are rejected before they ever reach the store, so a
/// partially-populated record cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionRecord {
  /// Opaque identifier, assigned by the store on creation.
  pub id:                      Uuid,
  /// Administrative region ("wilaya") code, kept verbatim from the source.
  pub region_code:             String,
  /// Beneficiary advantage code. `""` and `"0"` are the unspecified sentinel.
  pub advantage_code:          String,
  pub pension_number:          String,
  /// Source-system status category, e.g. "décès", "fin droit", "révision".
  pub pension_status:          String,
  pub birth_date:              NaiveDateTime,
  pub entitlement_date:        NaiveDateTime,
  pub sex:                     String,
  pub net_monthly_amount:      f64,
  pub direct_rate:             f64,
  pub survivor_rate:           f64,
  pub global_rate:             f64,
  pub age_at_entitlement:      u8,
  pub pension_duration_months: u32,
  pub category_average_age:    u8,
  pub age_risk_flag:           u8,
  /// Pre-computed risk tier in {0, 1, 2}. Opaque upstream input — it is the
  /// sole grouping key for statistics and is never recomputed here.
  pub predicted_risk_tier:     u8,
}

/// A record as produced by the row parser, before the store has assigned an
/// id. Same shape as [`PensionRecord`] minus identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPensionRecord {
  pub region_code:             String,
  pub advantage_code:          String,
  pub pension_number:          String,
  pub pension_status:          String,
  pub birth_date:              NaiveDateTime,
  pub entitlement_date:        NaiveDateTime,
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

impl NewPensionRecord {
  /// Attach a store-assigned id, turning the input into a persisted record.
  pub fn into_record(self, id: Uuid) -> PensionRecord {
    PensionRecord {
      id,
      region_code:             self.region_code,
      advantage_code:          self.advantage_code,
      pension_number:          self.pension_number,
      pension_status:          self.pension_status,
      birth_date:              self.birth_date,
      entitlement_date:        self.entitlement_date,
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
    }
  }
}
