//! XLSX (Excel) workbook reader.
//!
//! Reads Office Open XML workbooks (.xlsx and .xlsm) into typed sheets.
//!
//! # Example
//!
//! ```no_run
//! use sheetpeek::xlsx::Workbook;
//!
//! let workbook = Workbook::open("book.xlsx")?;
//! for name in workbook.sheet_names() {
//!     println!("Sheet: {}", name);
//! }
//! # Ok::<(), sheetpeek::Error>(())
//! ```

mod shared_strings;
mod styles;
mod workbook;
mod worksheet;

pub use workbook::{SheetInfo, SheetIter, Workbook};
pub use worksheet::column_index;
