//! Builds small XLSX workbooks in memory for tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A cell to write into a fixture sheet.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(&'static str),
    Num(f64),
    Bool(bool),
    /// Serial date written with the built-in `m/d/yyyy` format
    Date(f64),
    Error(&'static str),
    Blank,
}

pub use Cell::{Blank, Bool, Date, Num, Text};

struct FixtureSheet {
    name: String,
    rows: Vec<Vec<Cell>>,
    hidden: bool,
}

/// Fluent builder for a minimal but well-formed XLSX package.
#[derive(Default)]
pub struct WorkbookFixture {
    sheets: Vec<FixtureSheet>,
    title: Option<String>,
    date_1904: bool,
}

impl WorkbookFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push(FixtureSheet {
            name: name.to_string(),
            rows,
            hidden: false,
        });
        self
    }

    pub fn hidden_sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push(FixtureSheet {
            name: name.to_string(),
            rows,
            hidden: true,
        });
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Mark the workbook as using the 1904 date system.
    pub fn date_1904(mut self) -> Self {
        self.date_1904 = true;
        self
    }

    /// Serialize the workbook into XLSX bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut shared: Vec<&'static str> = Vec::new();
        let sheet_xml: Vec<String> = self
            .sheets
            .iter()
            .map(|sheet| worksheet_xml(&sheet.rows, &mut shared))
            .collect();

        let mut parts: Vec<(String, String)> = Vec::new();

        let mut overrides = String::new();
        overrides.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
        for i in 1..=self.sheets.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i
            ));
        }
        parts.push((
            "[Content_Types].xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{}</Types>"#,
                overrides
            ),
        ));

        parts.push((
            "_rels/.rels".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#
                .to_string(),
        ));

        let mut sheet_entries = String::new();
        let mut rels = String::new();
        for (i, sheet) in self.sheets.iter().enumerate() {
            let n = i + 1;
            let state = if sheet.hidden { r#" state="hidden""# } else { "" };
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}"{} r:id="rId{}"/>"#,
                escape(&sheet.name),
                n,
                state,
                n
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                n, n
            ));
        }
        let base = self.sheets.len();
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/><Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            base + 1,
            base + 2
        ));

        parts.push((
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}<sheets>{}</sheets></workbook>"#,
                if self.date_1904 { r#"<workbookPr date1904="1"/>"# } else { "" },
                sheet_entries
            ),
        ));
        parts.push((
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                rels
            ),
        ));

        let items: String = shared
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", escape(s)))
            .collect();
        parts.push((
            "xl/sharedStrings.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
                shared.len(),
                items
            ),
        ));

        parts.push((
            "xl/styles.xml".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#
                .to_string(),
        ));

        for (i, xml) in sheet_xml.into_iter().enumerate() {
            parts.push((format!("xl/worksheets/sheet{}.xml", i + 1), xml));
        }

        let title = self
            .title
            .as_deref()
            .map(|t| format!("<dc:title>{}</dc:title>", escape(t)))
            .unwrap_or_default();
        parts.push((
            "docProps/core.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">{}<dc:creator>fixture</dc:creator></cp:coreProperties>"#,
                title
            ),
        ));

        zip_parts(&parts)
    }

    /// Write the workbook to `dir/name` and return its path.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

/// Zip arbitrary parts, for packages the builder cannot express.
pub fn zip_parts(parts: &[(String, String)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();
        for (name, body) in parts {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

/// Replace one part of a built workbook.
pub fn with_part(workbook: &[u8], name: &str, body: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(workbook)).unwrap();
    let mut parts = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut content = String::new();
        std::io::Read::read_to_string(&mut file, &mut content).unwrap();
        let part_name = file.name().to_string();
        if part_name == name {
            parts.push((part_name, body.to_string()));
        } else {
            parts.push((part_name, content));
        }
    }
    zip_parts(&parts)
}

fn worksheet_xml(rows: &[Vec<Cell>], shared: &mut Vec<&'static str>) -> String {
    let mut data = String::new();
    for (r, row) in rows.iter().enumerate() {
        let row_number = r + 1;
        data.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_name(c), row_number);
            let xml = match cell {
                Cell::Text(s) => {
                    let index = match shared.iter().position(|x| x == s) {
                        Some(i) => i,
                        None => {
                            shared.push(s);
                            shared.len() - 1
                        }
                    };
                    format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, index)
                }
                Cell::Num(n) => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n),
                Cell::Bool(b) => format!(
                    r#"<c r="{}" t="b"><v>{}</v></c>"#,
                    reference,
                    if *b { 1 } else { 0 }
                ),
                Cell::Date(serial) => {
                    format!(r#"<c r="{}" s="1"><v>{}</v></c>"#, reference, serial)
                }
                Cell::Error(e) => format!(r#"<c r="{}" t="e"><v>{}</v></c>"#, reference, e),
                Cell::Blank => continue,
            };
            data.push_str(&xml);
        }
        data.push_str("</row>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        data
    )
}

fn column_name(mut index: usize) -> String {
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
