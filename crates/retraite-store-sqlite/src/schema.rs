//! SQL schema for the retraite SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `predicted_risk_tier` and `advantage_code` are indexed for the grouped
/// stats query.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS pension_records (
    id                      TEXT PRIMARY KEY,
    region_code             TEXT NOT NULL,
    advantage_code          TEXT NOT NULL,
    pension_number          TEXT NOT NULL,
    pension_status          TEXT NOT NULL,
    birth_date              TEXT NOT NULL,   -- '%Y-%m-%d %H:%M:%S'
    entitlement_date        TEXT NOT NULL,   -- '%Y-%m-%d %H:%M:%S'
    sex                     TEXT NOT NULL,
    net_monthly_amount      REAL NOT NULL,
    direct_rate             REAL NOT NULL,
    survivor_rate           REAL NOT NULL,
    global_rate             REAL NOT NULL,
    age_at_entitlement      INTEGER NOT NULL,
    pension_duration_months INTEGER NOT NULL,
    category_average_age    INTEGER NOT NULL,
    age_risk_flag           INTEGER NOT NULL,
    predicted_risk_tier     INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS pension_records_tier_idx
    ON pension_records(predicted_risk_tier);
CREATE INDEX IF NOT EXISTS pension_records_advantage_idx
    ON pension_records(advantage_code);

PRAGMA user_version = 1;
";
