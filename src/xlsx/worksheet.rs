//! Worksheet XML parsing into a typed cell grid.

use crate::error::{Error, Result};
use crate::model::{CellValue, ExcelDate};
use quick_xml::events::{BytesStart, Event};

use super::shared_strings::SharedStrings;
use super::styles::Styles;

/// Largest row number a worksheet may address.
const MAX_ROWS: usize = 1_048_576;
/// Largest column count a worksheet may address (A..XFD).
const MAX_COLUMNS: usize = 16_384;

/// Where the text of the current cell goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Value,
    InlineText,
}

/// Attributes of the `<c>` element being read.
#[derive(Debug, Default)]
struct PendingCell {
    column: usize,
    cell_type: Option<String>,
    style: Option<usize>,
    value: String,
    has_value: bool,
}

/// Resolves raw cell text against the workbook's shared tables.
pub(crate) struct CellResolver<'a> {
    pub shared_strings: &'a SharedStrings,
    pub styles: &'a Styles,
    /// Serials count from 1904-01-01 instead of 1900-01-01
    pub date_1904: bool,
}

impl CellResolver<'_> {
    /// Parse worksheet XML into rows of cells.
    ///
    /// Cells are placed by their `r` reference when present, otherwise after
    /// the previous cell. Trailing blank cells and rows are trimmed.
    pub fn parse_sheet(&self, xml: &str) -> Result<Vec<Vec<CellValue>>> {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut buf = Vec::new();

        let mut grid: Vec<Vec<CellValue>> = Vec::new();
        let mut in_sheet_data = false;
        let mut row: Option<(usize, Vec<CellValue>)> = None;
        let mut next_row = 0usize;
        let mut next_column = 0usize;
        let mut cell: Option<PendingCell> = None;
        let mut capture = Capture::None;
        let mut in_phonetic = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"sheetData" => in_sheet_data = true,
                    b"row" if in_sheet_data => {
                        let index = row_index(&e, next_row)?;
                        row = Some((index, Vec::new()));
                        next_row = index + 1;
                        next_column = 0;
                    }
                    b"c" if row.is_some() => {
                        let pending = pending_cell(&e, next_column)?;
                        next_column = pending.column + 1;
                        cell = Some(pending);
                    }
                    b"v" if cell.is_some() => capture = Capture::Value,
                    b"rPh" => in_phonetic = true,
                    b"t" if cell.is_some() && !in_phonetic => capture = Capture::InlineText,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" if in_sheet_data => {
                        next_row = row_index(&e, next_row)? + 1;
                        next_column = 0;
                    }
                    b"c" if row.is_some() => {
                        // a styled cell with no content
                        next_column = pending_cell(&e, next_column)?.column + 1;
                    }
                    _ => {}
                },
                Event::Text(e) if capture != Capture::None => {
                    if let Some(ref mut pending) = cell {
                        pending.value.push_str(&e.unescape()?);
                        pending.has_value = true;
                    }
                }
                Event::CData(e) if capture != Capture::None => {
                    if let Some(ref mut pending) = cell {
                        pending.value.push_str(&String::from_utf8_lossy(&e));
                        pending.has_value = true;
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"sheetData" => in_sheet_data = false,
                    b"row" => {
                        if let Some((index, mut cells)) = row.take() {
                            trim_trailing_empty(&mut cells);
                            if !cells.is_empty() {
                                if grid.len() <= index {
                                    grid.resize_with(index + 1, Vec::new);
                                }
                                grid[index] = cells;
                            }
                        }
                    }
                    b"c" => {
                        if let (Some(pending), Some((_, cells))) = (cell.take(), row.as_mut()) {
                            let value = self.resolve(
                                pending.cell_type.as_deref(),
                                pending.style,
                                &pending.value,
                                pending.has_value,
                            )?;
                            if !value.is_empty() {
                                if cells.len() <= pending.column {
                                    cells.resize(pending.column + 1, CellValue::Empty);
                                }
                                cells[pending.column] = value;
                            }
                        }
                        capture = Capture::None;
                    }
                    b"v" | b"t" => capture = Capture::None,
                    b"rPh" => in_phonetic = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        while grid.last().is_some_and(|r| r.is_empty()) {
            grid.pop();
        }

        Ok(grid)
    }

    /// Turn raw cell text into a typed value according to the `t` attribute.
    fn resolve(
        &self,
        cell_type: Option<&str>,
        style: Option<usize>,
        raw: &str,
        has_value: bool,
    ) -> Result<CellValue> {
        if !has_value {
            return Ok(CellValue::Empty);
        }

        let value = match cell_type {
            Some("s") => {
                let index: usize = raw.trim().parse().map_err(|_| {
                    Error::CorruptData(format!("invalid shared string index '{}'", raw))
                })?;
                let text = self.shared_strings.get(index).ok_or_else(|| {
                    Error::CorruptData(format!(
                        "shared string index {} out of range ({} strings)",
                        index,
                        self.shared_strings.len()
                    ))
                })?;
                text_value(text)
            }
            Some("str") | Some("inlineStr") => text_value(raw),
            Some("b") => match raw.trim() {
                "1" | "true" => CellValue::Bool(true),
                "0" | "false" => CellValue::Bool(false),
                other => {
                    return Err(Error::CorruptData(format!(
                        "invalid boolean cell value '{}'",
                        other
                    )))
                }
            },
            Some("e") => CellValue::Error(raw.to_string()),
            // ISO 8601 date cells are kept as written
            Some("d") => text_value(raw),
            None | Some("n") => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(CellValue::Empty);
                }
                let number: f64 = trimmed.parse().map_err(|_| {
                    Error::CorruptData(format!("invalid numeric cell value '{}'", raw))
                })?;
                match style {
                    Some(s) if self.styles.is_date_style(s) => {
                        let date = if self.date_1904 {
                            ExcelDate::from_serial_1904(number)
                        } else {
                            ExcelDate::from_serial(number)
                        };
                        CellValue::Date(date)
                    }
                    _ => CellValue::Number(number),
                }
            }
            Some(other) => {
                log::warn!("unknown cell type '{}', reading as text", other);
                text_value(raw)
            }
        };

        Ok(value)
    }
}

/// Empty strings read as blanks.
fn text_value(text: &str) -> CellValue {
    if text.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(text.to_string())
    }
}

fn trim_trailing_empty(cells: &mut Vec<CellValue>) {
    while cells.last().is_some_and(CellValue::is_empty) {
        cells.pop();
    }
}

/// Zero-based row index from a `<row r="..">` element.
fn row_index(e: &BytesStart<'_>, default: usize) -> Result<usize> {
    let Some(attr) = e
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
    else {
        return Ok(default);
    };

    let text = String::from_utf8_lossy(&attr.value);
    match text.trim().parse::<usize>() {
        Ok(n) if (1..=MAX_ROWS).contains(&n) => Ok(n - 1),
        _ => Err(Error::CorruptData(format!("invalid row number '{}'", text))),
    }
}

fn pending_cell(e: &BytesStart<'_>, default_column: usize) -> Result<PendingCell> {
    let mut pending = PendingCell {
        column: default_column,
        ..Default::default()
    };

    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.as_ref() {
            b"r" => pending.column = column_index(&value)?,
            b"t" => pending.cell_type = Some(value.into_owned()),
            b"s" => pending.style = value.trim().parse().ok(),
            _ => {}
        }
    }

    if pending.column >= MAX_COLUMNS {
        return Err(Error::CorruptData(format!(
            "column {} out of range",
            pending.column + 1
        )));
    }

    Ok(pending)
}

/// Zero-based column index from an A1-style reference such as `C7` or `$AB$12`.
pub fn column_index(reference: &str) -> Result<usize> {
    let letters = reference
        .trim_start_matches('$')
        .chars()
        .take_while(|c| c.is_ascii_alphabetic());

    let mut index = 0usize;
    let mut count = 0;
    for c in letters {
        count += 1;
        if count > 3 {
            break;
        }
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    if count == 0 || count > 3 {
        return Err(Error::CorruptData(format!(
            "invalid cell reference '{}'",
            reference
        )));
    }
    Ok(index - 1)
}
