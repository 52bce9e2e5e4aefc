//! Error types for `retraite-sheet`.
//!
//! These cover source access only — per-row data problems are not errors but
//! [`RowRejection`](crate::RowRejection) outcomes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read workbook: {0}")]
  Workbook(#[from] calamine::Error),

  #[error("workbook has no sheets")]
  NoSheets,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
