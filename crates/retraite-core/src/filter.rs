//! The stats filter — three optional dimensions ANDed into one record
//! predicate.
//!
//! The advantage-group → code table is static data on [`AdvantageGroup`], not
//! inline conditional logic, so the table itself is the unit under test and
//! can be corrected without touching the aggregation path.

use serde::{Deserialize, Serialize};

use crate::record::PensionRecord;

// ─── Advantage groups ────────────────────────────────────────────────────────

/// A named, fixed set of advantage codes exposed to filter callers as one
/// semantic option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvantageGroup {
  /// Direct beneficiaries of the pension.
  Direct,
  /// Adult-daughter dependents ("fille majeur").
  AdultDaughter,
  /// Surviving widows ("veuves").
  Widow,
  /// Sentinel group: records whose advantage code is empty/zero ("(vide)").
  Unspecified,
}

impl AdvantageGroup {
  /// Underlying advantage codes for this group.
  ///
  /// [`AdvantageGroup::Unspecified`] carries no codes; it matches through
  /// [`advantage_code_is_empty`] instead.
  pub fn codes(self) -> &'static [&'static str] {
    match self {
      AdvantageGroup::Direct => &["1", "7", "W", "Z", "4", "9", "G", "5"],
      AdvantageGroup::AdultDaughter => &["H", "D", "Y"],
      AdvantageGroup::Widow => &["3", "2", "F", "E", "8", "J"],
      AdvantageGroup::Unspecified => &[],
    }
  }

  /// Resolve a caller-facing label. Matching is case-insensitive; an
  /// unrecognised label yields `None` and is ignored by the filter builder.
  pub fn parse(label: &str) -> Option<Self> {
    match label.trim().to_lowercase().as_str() {
      "direct" => Some(AdvantageGroup::Direct),
      "fille majeur" => Some(AdvantageGroup::AdultDaughter),
      "veuves" => Some(AdvantageGroup::Widow),
      "(vide)" => Some(AdvantageGroup::Unspecified),
      _ => None,
    }
  }
}

/// Whether an advantage code is the empty/unspecified sentinel.
///
/// Spreadsheet cells arrive as text, so both the blank cell and the literal
/// zero count as unspecified.
pub fn advantage_code_is_empty(code: &str) -> bool {
  code.is_empty() || code == "0"
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// The normalized record predicate behind a risk-stats request.
///
/// Every dimension left empty is unfiltered; the three dimensions combine
/// with logical AND. The default value matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsFilter {
  /// Exact match on `region_code` when set.
  pub region:           Option<String>,
  /// Accepted `pension_status` values (logical OR). Empty = unfiltered.
  pub statuses:         Vec<String>,
  /// Requested advantage groups. Empty = unfiltered.
  pub advantage_groups: Vec<AdvantageGroup>,
}

impl StatsFilter {
  /// Build a filter from raw request inputs.
  ///
  /// An empty or whitespace region means unfiltered; unrecognised group
  /// labels are dropped without error.
  pub fn from_parts<L: AsRef<str>>(
    region: Option<String>,
    statuses: Vec<String>,
    group_labels: &[L],
  ) -> Self {
    let region = region.filter(|r| !r.trim().is_empty());
    let advantage_groups = group_labels
      .iter()
      .filter_map(|l| AdvantageGroup::parse(l.as_ref()))
      .collect();
    StatsFilter { region, statuses, advantage_groups }
  }

  /// Flatten the requested groups into `(concrete codes, include sentinel)`.
  ///
  /// Requesting the sentinel group alongside concrete groups matches either;
  /// the sentinel alone matches only empty-code records.
  pub fn advantage_codes(&self) -> (Vec<&'static str>, bool) {
    let mut codes = Vec::new();
    let mut include_empty = false;
    for group in &self.advantage_groups {
      if *group == AdvantageGroup::Unspecified {
        include_empty = true;
      } else {
        codes.extend_from_slice(group.codes());
      }
    }
    (codes, include_empty)
  }

  /// Evaluate the predicate against one record.
  pub fn matches(&self, record: &PensionRecord) -> bool {
    if let Some(region) = &self.region
      && record.region_code != *region
    {
      return false;
    }

    if !self.statuses.is_empty()
      && !self.statuses.contains(&record.pension_status)
    {
      return false;
    }

    if !self.advantage_groups.is_empty() {
      let (codes, include_empty) = self.advantage_codes();
      let empty_hit =
        include_empty && advantage_code_is_empty(&record.advantage_code);
      let code_hit = codes.contains(&record.advantage_code.as_str());
      if !empty_hit && !code_hit {
        return false;
      }
    }

    true
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::record::PensionRecord;

  fn record(region: &str, status: &str, advantage: &str) -> PensionRecord {
    let date = NaiveDate::from_ymd_opt(1950, 6, 1)
      .unwrap()
      .and_hms_opt(0, 0, 0)
      .unwrap();
    PensionRecord {
      id:                      uuid::Uuid::new_v4(),
      region_code:             region.to_owned(),
      advantage_code:          advantage.to_owned(),
      pension_number:          "P-1".to_owned(),
      pension_status:          status.to_owned(),
      birth_date:              date,
      entitlement_date:        date,
      sex:                     "F".to_owned(),
      net_monthly_amount:      32000.0,
      direct_rate:             80.0,
      survivor_rate:           0.0,
      global_rate:             80.0,
      age_at_entitlement:      60,
      pension_duration_months: 120,
      category_average_age:    72,
      age_risk_flag:           1,
      predicted_risk_tier:     0,
    }
  }

  #[test]
  fn group_table_is_exact() {
    assert_eq!(
      AdvantageGroup::Direct.codes(),
      &["1", "7", "W", "Z", "4", "9", "G", "5"]
    );
    assert_eq!(AdvantageGroup::AdultDaughter.codes(), &["H", "D", "Y"]);
    assert_eq!(AdvantageGroup::Widow.codes(), &["3", "2", "F", "E", "8", "J"]);
    assert!(AdvantageGroup::Unspecified.codes().is_empty());
  }

  #[test]
  fn group_labels_parse_case_insensitively() {
    assert_eq!(AdvantageGroup::parse("direct"), Some(AdvantageGroup::Direct));
    assert_eq!(AdvantageGroup::parse("Veuves"), Some(AdvantageGroup::Widow));
    assert_eq!(
      AdvantageGroup::parse("fille majeur"),
      Some(AdvantageGroup::AdultDaughter)
    );
    assert_eq!(
      AdvantageGroup::parse("(Vide)"),
      Some(AdvantageGroup::Unspecified)
    );
    assert_eq!(AdvantageGroup::parse("retraité anticipé"), None);
  }

  #[test]
  fn default_filter_matches_everything() {
    let filter = StatsFilter::default();
    assert!(filter.matches(&record("16", "décès", "1")));
    assert!(filter.matches(&record("31", "révision", "")));
  }

  #[test]
  fn empty_region_string_is_unfiltered() {
    let filter =
      StatsFilter::from_parts(Some("  ".to_owned()), vec![], &[] as &[&str]);
    assert_eq!(filter.region, None);
    assert!(filter.matches(&record("16", "décès", "1")));
  }

  #[test]
  fn region_matches_exactly() {
    let filter =
      StatsFilter::from_parts(Some("16".to_owned()), vec![], &[] as &[&str]);
    assert!(filter.matches(&record("16", "décès", "1")));
    assert!(!filter.matches(&record("31", "décès", "1")));
  }

  #[test]
  fn statuses_are_a_union() {
    let filter = StatsFilter::from_parts(
      None,
      vec!["décès".to_owned(), "fin droit".to_owned()],
      &[] as &[&str],
    );
    assert!(filter.matches(&record("16", "décès", "1")));
    assert!(filter.matches(&record("16", "fin droit", "1")));
    assert!(!filter.matches(&record("16", "révision", "1")));
  }

  #[test]
  fn concrete_groups_union_their_codes() {
    let filter =
      StatsFilter::from_parts(None, vec![], &["direct", "Veuves"]);
    assert!(filter.matches(&record("16", "décès", "7")));
    assert!(filter.matches(&record("16", "décès", "F")));
    assert!(!filter.matches(&record("16", "décès", "H")));
    assert!(!filter.matches(&record("16", "décès", "0")));
  }

  #[test]
  fn sentinel_group_alone_matches_only_empty_codes() {
    let filter = StatsFilter::from_parts(None, vec![], &["(Vide)"]);
    assert!(filter.matches(&record("16", "décès", "0")));
    assert!(filter.matches(&record("16", "décès", "")));
    assert!(!filter.matches(&record("16", "décès", "1")));
  }

  #[test]
  fn sentinel_plus_concrete_matches_either() {
    let filter = StatsFilter::from_parts(None, vec![], &["(Vide)", "direct"]);
    assert!(filter.matches(&record("16", "décès", "0")));
    assert!(filter.matches(&record("16", "décès", "1")));
    assert!(!filter.matches(&record("16", "décès", "F")));
  }

  #[test]
  fn unrecognised_labels_are_ignored() {
    let filter =
      StatsFilter::from_parts(None, vec![], &["inconnu", "mystère"]);
    // Nothing recognised: the dimension stays unfiltered.
    assert!(filter.advantage_groups.is_empty());
    assert!(filter.matches(&record("16", "décès", "1")));
  }

  #[test]
  fn dimensions_combine_with_and() {
    let filter = StatsFilter::from_parts(
      Some("16".to_owned()),
      vec!["décès".to_owned()],
      &["direct"],
    );
    assert!(filter.matches(&record("16", "décès", "1")));
    assert!(!filter.matches(&record("31", "décès", "1")));
    assert!(!filter.matches(&record("16", "révision", "1")));
    assert!(!filter.matches(&record("16", "décès", "H")));
  }
}
