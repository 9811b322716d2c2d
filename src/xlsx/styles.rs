//! XLSX styles parsing for number formats.

use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Number format information parsed from `xl/styles.xml`.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// Cell formats: style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse styles from `xl/styles.xml` content.
    ///
    /// Styles only decide whether numbers are shown as dates, so a malformed
    /// part degrades to plain numbers instead of failing the workbook.
    pub fn parse(xml: &str) -> Self {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"numFmt" if in_num_fmts => styles.add_num_fmt(e),
                    b"xf" if in_cell_xfs => styles.cell_xfs.push(num_fmt_id(e).unwrap_or(0)),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"numFmt" if in_num_fmts => styles.add_num_fmt(e),
                    b"xf" if in_cell_xfs => styles.cell_xfs.push(num_fmt_id(e).unwrap_or(0)),
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!("ignoring malformed styles part: {}", e);
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        styles
    }

    fn add_num_fmt(&mut self, e: &BytesStart<'_>) {
        let mut format_code = String::new();
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"formatCode" {
                format_code = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            }
        }
        if let Some(id) = num_fmt_id(e) {
            self.num_fmts.insert(id, format_code);
        }
    }

    /// Get the numFmtId for a cell style index.
    pub fn get_num_fmt_id(&self, style_index: usize) -> Option<u32> {
        self.cell_xfs.get(style_index).copied()
    }

    /// Whether cells with this style index hold dates.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        self.get_num_fmt_id(style_index)
            .is_some_and(|id| self.is_date_format(id))
    }

    /// Check if a numFmtId represents a date or time format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Custom formats may override built-in ids
        if let Some(format_code) = self.num_fmts.get(&num_fmt_id) {
            return Self::is_date_format_code(format_code);
        }

        // Built-in date/time formats, including the East Asian ones
        matches!(num_fmt_id, 14..=22 | 27..=36 | 45..=47 | 50..=58)
    }

    /// Check if a format code string represents a date format.
    ///
    /// Looks for d, m, y, h or s outside of quoted literals, bracketed
    /// sections and escaped characters. Only the first section counts.
    fn is_date_format_code(format_code: &str) -> bool {
        let mut in_bracket = false;
        let mut in_quote = false;
        let mut escaped = false;
        let mut bracket = String::new();

        for c in format_code.chars() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '"' => in_quote = !in_quote,
                _ if in_quote => {}
                '\\' => escaped = true,
                '[' => {
                    in_bracket = true;
                    bracket.clear();
                }
                ']' if in_bracket => {
                    in_bracket = false;
                    // elapsed time such as [h]:mm
                    let elapsed = bracket.to_ascii_lowercase();
                    if matches!(elapsed.as_str(), "h" | "hh" | "m" | "mm" | "s" | "ss") {
                        return true;
                    }
                }
                _ if in_bracket => bracket.push(c),
                ';' => return false,
                'd' | 'D' | 'm' | 'M' | 'y' | 'Y' | 'h' | 'H' | 's' | 'S' => return true,
                _ => {}
            }
        }

        false
    }
}

fn num_fmt_id(e: &BytesStart<'_>) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"numFmtId")
        .and_then(|attr| String::from_utf8_lossy(&attr.value).parse().ok())
}
