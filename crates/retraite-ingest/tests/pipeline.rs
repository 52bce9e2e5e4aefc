//! Pipeline integration tests: summary accounting, fatal-vs-row errors, and
//! exactness of the counts under concurrent persistence.

use std::{
  collections::{BTreeMap, HashSet},
  sync::{Arc, Mutex},
};

use retraite_core::{
  filter::StatsFilter,
  record::{NewPensionRecord, PensionRecord},
  store::{PageQuery, PensionStore},
};
use retraite_ingest::{Error, Ingestor};
use retraite_store_sqlite::SqliteStore;
use uuid::Uuid;

// ─── Scripted in-memory store ────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct MemError(String);

/// Minimal in-memory store; `fail_numbers` scripts per-row storage failures.
#[derive(Default)]
struct MemStore {
  records:      Mutex<Vec<PensionRecord>>,
  fail_numbers: HashSet<String>,
}

impl MemStore {
  fn failing(numbers: &[&str]) -> Self {
    MemStore {
      records:      Mutex::new(Vec::new()),
      fail_numbers: numbers.iter().map(|n| (*n).to_owned()).collect(),
    }
  }

  fn len(&self) -> usize {
    self.records.lock().unwrap().len()
  }
}

impl PensionStore for MemStore {
  type Error = MemError;

  async fn create(
    &self,
    record: NewPensionRecord,
  ) -> Result<PensionRecord, MemError> {
    if self.fail_numbers.contains(&record.pension_number) {
      return Err(MemError("unique constraint violated".to_owned()));
    }
    let record = record.into_record(Uuid::new_v4());
    self.records.lock().unwrap().push(record.clone());
    Ok(record)
  }

  async fn get(&self, id: Uuid) -> Result<Option<PensionRecord>, MemError> {
    Ok(
      self
        .records
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.id == id)
        .cloned(),
    )
  }

  async fn list(
    &self,
    page: PageQuery,
  ) -> Result<(Vec<PensionRecord>, u64), MemError> {
    let records = self.records.lock().unwrap();
    let total = records.len() as u64;
    let page_records = records
      .iter()
      .skip(page.offset() as usize)
      .take(page.limit as usize)
      .cloned()
      .collect();
    Ok((page_records, total))
  }

  async fn update(&self, record: PensionRecord) -> Result<(), MemError> {
    let mut records = self.records.lock().unwrap();
    match records.iter_mut().find(|r| r.id == record.id) {
      Some(slot) => {
        *slot = record;
        Ok(())
      }
      None => Err(MemError("record not found".to_owned())),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<(), MemError> {
    let mut records = self.records.lock().unwrap();
    let before = records.len();
    records.retain(|r| r.id != id);
    if records.len() == before {
      return Err(MemError("record not found".to_owned()));
    }
    Ok(())
  }

  async fn risk_tier_counts(
    &self,
    filter: StatsFilter,
  ) -> Result<Vec<(u8, u64)>, MemError> {
    let records = self.records.lock().unwrap();
    let mut counts: BTreeMap<u8, u64> = BTreeMap::new();
    for record in records.iter().filter(|r| filter.matches(r)) {
      *counts.entry(record.predicted_risk_tier).or_default() += 1;
    }
    Ok(counts.into_iter().collect())
  }
}

// ─── Row builders ────────────────────────────────────────────────────────────

fn header() -> Vec<String> {
  (0..16).map(|i| format!("col{i}")).collect()
}

fn row(pension_number: &str, tier: u8) -> Vec<String> {
  [
    "16",
    "1",
    pension_number,
    "décès",
    "1950-06-01 00:00:00",
    "2010-02-15 00:00:00",
    "F",
    "32500.75",
    "80",
    "0",
    "80",
    "60",
    "168",
    "72",
    "1",
    &tier.to_string(),
  ]
  .map(str::to_owned)
  .to_vec()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mixed_rows_summary_is_exact() {
  let store = Arc::new(MemStore::default());
  let ingestor = Ingestor::new(Arc::clone(&store), 4);

  let mut bad_date = row("P-3", 1);
  bad_date[4] = "never".to_owned();
  let short = vec!["16".to_owned(), "1".to_owned()];

  let rows = vec![header(), row("P-1", 0), bad_date, row("P-2", 2), short];
  let summary = ingestor.ingest_rows(&rows).await.unwrap();

  assert_eq!(summary.accepted, 2);
  assert_eq!(summary.rejected, 2);
  assert_eq!(summary.accepted + summary.rejected, rows.len() as u64 - 1);
  assert_eq!(store.len(), 2);

  let mut positions: Vec<usize> =
    summary.rejections.iter().map(|r| r.position).collect();
  positions.sort_unstable();
  assert_eq!(positions, vec![3, 5]);
}

#[tokio::test]
async fn header_only_sheet_fails_fast() {
  let store = Arc::new(MemStore::default());
  let ingestor = Ingestor::new(Arc::clone(&store), 4);

  let err = ingestor.ingest_rows(&[header()]).await.unwrap_err();
  assert!(matches!(err, Error::NoDataRows));
  assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn empty_sheet_fails_fast() {
  let store = Arc::new(MemStore::default());
  let ingestor = Ingestor::new(Arc::clone(&store), 4);

  let err = ingestor.ingest_rows(&[]).await.unwrap_err();
  assert!(matches!(err, Error::NoDataRows));
}

#[tokio::test]
async fn storage_failure_is_a_row_rejection_not_a_fault() {
  let store = Arc::new(MemStore::failing(&["P-2"]));
  let ingestor = Ingestor::new(Arc::clone(&store), 4);

  let rows = vec![header(), row("P-1", 0), row("P-2", 1), row("P-3", 2)];
  let summary = ingestor.ingest_rows(&rows).await.unwrap();

  assert_eq!(summary.accepted, 2);
  assert_eq!(summary.rejected, 1);
  assert_eq!(store.len(), 2);

  let rejection = &summary.rejections[0];
  assert_eq!(rejection.position, 3);
  assert!(
    rejection
      .reason
      .to_string()
      .starts_with("storage-error:unique constraint")
  );
}

#[tokio::test]
async fn total_failure_still_reports_a_summary() {
  let store = Arc::new(MemStore::default());
  let ingestor = Ingestor::new(Arc::clone(&store), 4);

  let rows = vec![
    header(),
    vec!["not".to_owned(), "enough".to_owned()],
    vec![],
  ];
  let summary = ingestor.ingest_rows(&rows).await.unwrap();

  assert_eq!(summary.accepted, 0);
  assert_eq!(summary.rejected, 2);
  assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn parallel_ingest_keeps_counts_exact() {
  let store = Arc::new(MemStore::default());
  let ingestor = Ingestor::new(Arc::clone(&store), 8);

  let mut rows = vec![header()];
  for i in 0..200u8 {
    rows.push(row(&format!("P-{i}"), i % 3));
  }
  let summary = ingestor.ingest_rows(&rows).await.unwrap();

  assert_eq!(summary.accepted, 200);
  assert_eq!(summary.rejected, 0);
  assert_eq!(store.len(), 200);
}

#[tokio::test]
async fn ingested_records_land_in_sqlite() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let ingestor = Ingestor::new(Arc::clone(&store), 4);

  let rows = vec![header(), row("P-1", 0), row("P-2", 1), row("P-3", 2)];
  let summary = ingestor.ingest_rows(&rows).await.unwrap();
  assert_eq!(summary.accepted, 3);

  let (records, total) = store
    .list(PageQuery { page: 1, limit: 10 })
    .await
    .unwrap();
  assert_eq!(total, 3);
  assert_eq!(records.len(), 3);
  assert!(records.iter().all(|r| r.region_code == "16"));
}
