//! Spreadsheet concerns for retraite: the positional row parser and the
//! workbook reader.
//!
//! Pipeline:
//!   workbook file / upload bytes
//!     └─ Workbook::open() / from_bytes() → sheet name + rows of text cells
//!          └─ parse_row()                → NewPensionRecord | RowRejection
//!
//! Pure synchronous; no HTTP or database dependencies. The ingestion driver
//! lives in `retraite-ingest`.

pub mod error;
mod parse;
mod workbook;

pub use error::{Error, Result};
pub use parse::{MIN_COLUMNS, RejectReason, RowRejection, parse_row};
pub use workbook::Workbook;
