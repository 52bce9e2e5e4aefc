//! Workbook reading — materialises the first sheet of a spreadsheet file as
//! ordered rows of text cells.
//!
//! Matches the upstream export convention: the first sheet carries the data
//! and the first row is a header. Date cells are rendered in the same
//! `%Y-%m-%d %H:%M:%S` form the row parser accepts.

use std::{
  io::{Cursor, Read, Seek},
  path::Path,
};

use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};

use crate::error::{Error, Result};

/// A fully-read sheet: its name plus every row as text cells.
#[derive(Debug, Clone)]
pub struct Workbook {
  /// Name of the sheet the rows came from (the workbook's first).
  pub name: String,
  /// All rows, header included, in sheet order.
  pub rows: Vec<Vec<String>>,
}

impl Workbook {
  /// Read the first sheet of the workbook at `path`.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::from_sheets(open_workbook_auto(path)?)
  }

  /// Read the first sheet of a workbook held in memory (e.g. an upload
  /// body).
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    Self::from_sheets(open_workbook_auto_from_rs(Cursor::new(bytes))?)
  }

  fn from_sheets<RS: Read + Seek>(mut sheets: Sheets<RS>) -> Result<Self> {
    let name = sheets.sheet_names().first().cloned().ok_or(Error::NoSheets)?;
    let range = sheets.worksheet_range(&name)?;

    let rows = range
      .rows()
      .map(|row| row.iter().map(cell_text).collect())
      .collect();

    Ok(Workbook { name, rows })
  }
}

/// Render one cell the way the row parser expects to see it.
fn cell_text(cell: &Data) -> String {
  match cell {
    Data::Empty => String::new(),
    // Native date cells carry an Excel serial; render them in the parser's
    // storage format instead of the raw float.
    Data::DateTime(dt) => dt
      .as_datetime()
      .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
      .unwrap_or_else(|| cell.to_string()),
    other => other.to_string(),
  }
}
