//! Risk-tier labels and the distribution arithmetic behind the stats
//! endpoint.
//!
//! The tier → label mapping is a documented contract, not an inference from
//! source data (upstream revisions disagree about its direction): tier 0 is
//! "low risk", 1 is "medium risk", 2 is "high risk". Any other value labels
//! as "unknown risk" rather than failing the aggregation.

use serde::{Deserialize, Serialize};

// ─── Tiers ───────────────────────────────────────────────────────────────────

/// The three-valued ordinal classification driving statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
  Low,
  Medium,
  High,
}

impl RiskTier {
  /// Decode the raw upstream ordinal. Values outside {0, 1, 2} yield `None`.
  pub fn from_raw(raw: u8) -> Option<Self> {
    match raw {
      0 => Some(RiskTier::Low),
      1 => Some(RiskTier::Medium),
      2 => Some(RiskTier::High),
      _ => None,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      RiskTier::Low => "low risk",
      RiskTier::Medium => "medium risk",
      RiskTier::High => "high risk",
    }
  }
}

/// Caller-facing label for a raw tier value.
pub fn tier_label(raw: u8) -> &'static str {
  RiskTier::from_raw(raw).map_or("unknown risk", RiskTier::label)
}

// ─── Distribution ────────────────────────────────────────────────────────────

/// One entry of a risk-tier distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLevelStat {
  pub risk_level: String,
  pub count:      u64,
  pub percentage: f64,
}

/// Turn `(raw tier, count)` pairs — as returned by the store's grouped count
/// query — into labelled percentages of the matching total.
///
/// Zero matching records yields the empty distribution; tiers with no
/// matching records do not appear. Ordering follows the input pairs and is
/// not part of the contract.
pub fn distribution(tier_counts: &[(u8, u64)]) -> Vec<RiskLevelStat> {
  let total: u64 = tier_counts.iter().map(|&(_, count)| count).sum();
  if total == 0 {
    return Vec::new();
  }

  tier_counts
    .iter()
    .filter(|&&(_, count)| count > 0)
    .map(|&(tier, count)| RiskLevelStat {
      risk_level: tier_label(tier).to_owned(),
      count,
      percentage: (count as f64 / total as f64) * 100.0,
    })
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
