//! Plain text renderer implementation.
//!
//! Lays previews out the way pandas prints `DataFrame.head()`: a left-aligned
//! row index followed by right-aligned columns separated by two spaces.

use crate::model::{CellValue, Preview};
use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthStr;

use super::options::RenderOptions;

const COLUMN_GAP: &str = "  ";

/// Render previews as text, one `Sheet: <name>` block per sheet.
pub fn to_text(previews: &[Preview], options: &RenderOptions) -> String {
    let mut output = String::new();
    for preview in previews {
        output.push_str(&render_preview(preview, options));
    }
    output
}

/// Render one preview: the sheet header line and its table, newline-terminated.
pub fn render_preview(preview: &Preview, options: &RenderOptions) -> String {
    let mut output = format!("Sheet: {}\n", preview.sheet);
    output.push_str(&render_table(preview, options));
    output.push('\n');
    output
}

/// Render the table part of a preview without a trailing newline.
pub fn render_table(preview: &Preview, options: &RenderOptions) -> String {
    let columns: Vec<String> = preview
        .columns
        .iter()
        .map(|c| display_text(c, options))
        .collect();

    if preview.rows.is_empty() {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            columns.join(", ")
        );
    }

    let cells: Vec<Vec<String>> = preview
        .rows
        .iter()
        .map(|row| row.iter().map(|v| cell_text(v, options)).collect())
        .collect();

    let index: Vec<String> = (0..cells.len()).map(|i| i.to_string()).collect();
    let index_width = index.iter().map(|s| s.width()).max().unwrap_or(0);

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(j, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(j))
                .map(|s| s.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 1);

    let mut header = " ".repeat(index_width);
    for (label, &width) in columns.iter().zip(&widths) {
        header.push_str(COLUMN_GAP);
        push_right_aligned(&mut header, label, width);
    }
    lines.push(header);

    for (label, row) in index.iter().zip(&cells) {
        let mut line = String::new();
        push_left_aligned(&mut line, label, index_width);
        for (j, &width) in widths.iter().enumerate() {
            line.push_str(COLUMN_GAP);
            push_right_aligned(&mut line, row.get(j).map_or("", String::as_str), width);
        }
        lines.push(line);
    }

    lines.join("\n")
}

fn push_right_aligned(out: &mut String, text: &str, width: usize) {
    out.push_str(&" ".repeat(width.saturating_sub(text.width())));
    out.push_str(text);
}

fn push_left_aligned(out: &mut String, text: &str, width: usize) {
    out.push_str(text);
    out.push_str(&" ".repeat(width.saturating_sub(text.width())));
}

fn cell_text(value: &CellValue, options: &RenderOptions) -> String {
    match value {
        CellValue::Text(s) => display_text(s, options),
        other => other.to_string(),
    }
}

/// Single-line form of a string, NFC-normalized when enabled.
fn display_text(text: &str, options: &RenderOptions) -> String {
    let escaped = text
        .replace('\r', "\\r")
        .replace('\n', "\\n")
        .replace('\t', "\\t");
    if options.normalize_text {
        escaped.nfc().collect()
    } else {
        escaped
    }
}
