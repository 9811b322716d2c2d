//! Sheet previews.

use super::{CellValue, Sheet};
use serde::Serialize;

/// Number of rows a preview shows unless configured otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Read-only view of the first rows of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    /// Sheet name
    pub sheet: String,
    /// Inferred column headers
    pub columns: Vec<String>,
    /// At most the requested number of data rows
    pub rows: Vec<Vec<CellValue>>,
    /// Data rows in the whole sheet
    pub total_rows: usize,
}

impl Preview {
    /// Build a preview of the first `rows` data rows of `sheet`.
    pub fn of(sheet: &Sheet, rows: usize) -> Self {
        let frame = sheet.to_frame();
        Self {
            sheet: sheet.name.clone(),
            rows: frame.head(rows).to_vec(),
            total_rows: frame.row_count(),
            columns: frame.columns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
