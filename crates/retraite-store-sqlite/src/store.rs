//! [`SqliteStore`] — the SQLite implementation of [`PensionStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use retraite_core::{
  filter::StatsFilter,
  record::{NewPensionRecord, PensionRecord},
  store::{PageQuery, PensionStore},
};

use crate::{
  Error, Result,
  encode::{RawRecord, SELECT_COLUMNS, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A pension-record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Filter → SQL ────────────────────────────────────────────────────────────

fn placeholders(n: usize) -> String { vec!["?"; n].join(", ") }

/// Assemble the WHERE clause and its text parameters for `filter`.
///
/// The sentinel advantage codes are matched literally (no parameters); the
/// concrete code lists and status sets become IN-list placeholders.
fn filter_sql(filter: &StatsFilter) -> (String, Vec<String>) {
  let mut conds: Vec<String> = Vec::new();
  let mut params: Vec<String> = Vec::new();

  if let Some(region) = &filter.region {
    conds.push("region_code = ?".to_owned());
    params.push(region.clone());
  }

  if !filter.statuses.is_empty() {
    let marks = placeholders(filter.statuses.len());
    conds.push(format!("pension_status IN ({marks})"));
    params.extend(filter.statuses.iter().cloned());
  }

  let (codes, include_empty) = filter.advantage_codes();
  let empty_cond = "advantage_code IN ('', '0')";
  if !codes.is_empty() {
    let marks = placeholders(codes.len());
    let in_list = format!("advantage_code IN ({marks})");
    conds.push(if include_empty {
      format!("({in_list} OR {empty_cond})")
    } else {
      in_list
    });
    params.extend(codes.iter().map(|c| (*c).to_owned()));
  } else if include_empty {
    conds.push(empty_cond.to_owned());
  }

  let where_clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };

  (where_clause, params)
}

// ─── PensionStore impl ───────────────────────────────────────────────────────

impl PensionStore for SqliteStore {
  type Error = Error;

  async fn create(&self, record: NewPensionRecord) -> Result<PensionRecord> {
    let record = record.into_record(Uuid::new_v4());

    let r = record.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pension_records (
             id, region_code, advantage_code, pension_number, pension_status,
             birth_date, entitlement_date, sex,
             net_monthly_amount, direct_rate, survivor_rate, global_rate,
             age_at_entitlement, pension_duration_months,
             category_average_age, age_risk_flag, predicted_risk_tier
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17)",
          rusqlite::params![
            encode_uuid(r.id),
            r.region_code,
            r.advantage_code,
            r.pension_number,
            r.pension_status,
            encode_dt(r.birth_date),
            encode_dt(r.entitlement_date),
            r.sex,
            r.net_monthly_amount,
            r.direct_rate,
            r.survivor_rate,
            r.global_rate,
            r.age_at_entitlement,
            r.pension_duration_months,
            r.category_average_age,
            r.age_risk_flag,
            r.predicted_risk_tier,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn get(&self, id: Uuid) -> Result<Option<PensionRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SELECT_COLUMNS} FROM pension_records WHERE id = ?1"
              ),
              rusqlite::params![id_str],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn list(&self, page: PageQuery) -> Result<(Vec<PensionRecord>, u64)> {
    let limit = page.limit as i64;
    let offset = page.offset() as i64;

    let (raws, total): (Vec<RawRecord>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM pension_records",
          [],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {SELECT_COLUMNS} FROM pension_records
           ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let raws = stmt
          .query_map(rusqlite::params![limit, offset], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((raws, total))
      })
      .await?;

    let records = raws
      .into_iter()
      .map(RawRecord::into_record)
      .collect::<Result<Vec<_>>>()?;

    Ok((records, total as u64))
  }

  async fn update(&self, record: PensionRecord) -> Result<()> {
    let r = record.clone();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE pension_records SET
             region_code = ?2, advantage_code = ?3, pension_number = ?4,
             pension_status = ?5, birth_date = ?6, entitlement_date = ?7,
             sex = ?8, net_monthly_amount = ?9, direct_rate = ?10,
             survivor_rate = ?11, global_rate = ?12, age_at_entitlement = ?13,
             pension_duration_months = ?14, category_average_age = ?15,
             age_risk_flag = ?16, predicted_risk_tier = ?17
           WHERE id = ?1",
          rusqlite::params![
            encode_uuid(r.id),
            r.region_code,
            r.advantage_code,
            r.pension_number,
            r.pension_status,
            encode_dt(r.birth_date),
            encode_dt(r.entitlement_date),
            r.sex,
            r.net_monthly_amount,
            r.direct_rate,
            r.survivor_rate,
            r.global_rate,
            r.age_at_entitlement,
            r.pension_duration_months,
            r.category_average_age,
            r.age_risk_flag,
            r.predicted_risk_tier,
          ],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::RecordNotFound(record.id));
    }
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM pension_records WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::RecordNotFound(id));
    }
    Ok(())
  }

  async fn risk_tier_counts(
    &self,
    filter: StatsFilter,
  ) -> Result<Vec<(u8, u64)>> {
    let (where_clause, params) = filter_sql(&filter);

    let counts = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT predicted_risk_tier, COUNT(*)
           FROM pension_records {where_clause}
           GROUP BY predicted_risk_tier"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)? as u64))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(counts)
  }
}
