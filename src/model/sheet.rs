//! Sheets and the frames derived from them.

use super::CellValue;
use serde::Serialize;
use std::collections::HashSet;

/// Visibility of a sheet tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

impl SheetState {
    pub fn from_attr(value: &str) -> Self {
        match value {
            "hidden" => SheetState::Hidden,
            "veryHidden" => SheetState::VeryHidden,
            _ => SheetState::Visible,
        }
    }
}

/// A named sheet holding a dense grid of cells.
///
/// Row `i` of `rows` is spreadsheet row `i + 1`; cell `j` of a row is column
/// `j` (A = 0). Rows carry no trailing blank cells and the grid carries no
/// trailing blank rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Split the grid into a header row and data rows.
    pub fn to_frame(&self) -> Frame {
        Frame::from_grid(&self.rows)
    }
}

/// A table with inferred column headers.
///
/// The first non-blank row supplies the headers; every later row is data,
/// padded with [`CellValue::Empty`] to the frame width.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Frame {
    pub fn from_grid(grid: &[Vec<CellValue>]) -> Self {
        let is_blank = |row: &Vec<CellValue>| row.iter().all(CellValue::is_empty);

        let Some(start) = grid.iter().position(|r| !is_blank(r)) else {
            return Frame::default();
        };
        let end = grid.iter().rposition(|r| !is_blank(r)).map_or(start, |i| i + 1);
        let header = &grid[start];
        let data = &grid[start + 1..end.max(start + 1)];

        let width = data
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let labels = (0..width).map(|i| header.get(i).and_then(CellValue::as_label));
        let columns = dedupe_labels(labels);

        let rows = data
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Frame { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First `n` data rows, fewer if the frame is shorter.
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Name blank headers `Unnamed: <i>` and suffix repeats with `.1`, `.2`, ...
fn dedupe_labels(labels: impl Iterator<Item = Option<String>>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();

    for (i, label) in labels.enumerate() {
        let base = label.unwrap_or_else(|| format!("Unnamed: {}", i));
        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }
        seen.insert(name.clone());
        columns.push(name);
    }

    columns
}
