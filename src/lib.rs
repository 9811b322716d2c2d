//! # sheetpeek
//!
//! Open an Excel workbook and preview the first rows of every sheet.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetpeek::{preview_workbook, PreviewConfig};
//!
//! // Prints "Sheet: <name>" and the first 5 rows of each sheet
//! let config = PreviewConfig::new("~/Downloads/teach.xlsx");
//! preview_workbook(&config, &mut std::io::stdout().lock())?;
//! # Ok::<(), sheetpeek::Error>(())
//! ```
//!
//! ## Working with sheets directly
//!
//! ```no_run
//! use sheetpeek::{Preview, Workbook};
//!
//! let workbook = Workbook::open("book.xlsx")?;
//! for sheet in workbook.sheets() {
//!     let sheet = sheet?;
//!     let preview = Preview::of(&sheet, 3);
//!     println!("{}: {:?}", preview.sheet, preview.columns);
//! }
//! # Ok::<(), sheetpeek::Error>(())
//! ```

pub mod container;
pub mod detect;
pub mod error;
pub mod model;
pub mod path;
pub mod preview;
pub mod render;
pub mod xlsx;

// Re-exports
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, ErrorKind, Result};
pub use model::{
    CellValue, ExcelDate, Frame, Metadata, Preview, Sheet, SheetState, DEFAULT_PREVIEW_ROWS,
};
pub use preview::{load_previews, preview_sheets, preview_workbook, PreviewConfig};
pub use xlsx::{SheetIter, Workbook};

use std::path::Path;

/// Open a workbook, resolving a leading `~` in the path first.
///
/// # Example
///
/// ```no_run
/// let workbook = sheetpeek::open_workbook("~/Downloads/teach.xlsx")?;
/// println!("{:?}", workbook.sheet_names());
/// # Ok::<(), sheetpeek::Error>(())
/// ```
pub fn open_workbook(path: impl AsRef<Path>) -> Result<Workbook> {
    Workbook::open(crate::path::resolve_home(path)?)
}
