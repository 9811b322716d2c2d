//! XLSX workbook access.

use crate::container::{read_file, OoxmlContainer, Relationships};
use crate::detect::{detect_format_from_bytes, FormatType};
use crate::error::{Error, Result};
use crate::model::{Metadata, Sheet, SheetState};
use quick_xml::events::Event;
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::styles::Styles;
use super::worksheet::CellResolver;

const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
pub struct SheetInfo {
    /// Tab name
    pub name: String,
    /// Visibility
    pub state: SheetState,
    /// Part path of the sheet inside the package, if it resolves
    part: Option<String>,
    /// Relationship kind, e.g. `worksheet` or `chartsheet`
    kind: String,
}

/// An opened XLSX workbook.
///
/// Opening reads the package index, shared strings, styles and the sheet
/// list. Sheet contents are decoded on demand by [`Workbook::sheets`] or
/// [`Workbook::sheet`].
pub struct Workbook {
    container: OoxmlContainer,
    format: FormatType,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
    date_1904: bool,
}

impl Workbook {
    /// Open a workbook file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sheetpeek::Workbook;
    ///
    /// let workbook = Workbook::open("book.xlsx")?;
    /// for sheet in workbook.sheets() {
    ///     let sheet = sheet?;
    ///     println!("{}: {} rows", sheet.name, sheet.row_count());
    /// }
    /// # Ok::<(), sheetpeek::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("opening workbook {}", path.display());
        Self::from_bytes(read_file(path)?)
    }

    /// Open a workbook from its file contents.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = detect_format_from_bytes(&data)?.ensure_supported()?;
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container, format)
    }

    fn from_container(container: OoxmlContainer, format: FormatType) -> Result<Self> {
        let workbook_part = Self::find_workbook_part(&container)?;
        let rels = container.read_relationships(&workbook_part)?;

        let related = |kind: &str, fallback: &str| {
            Self::related_part(&container, &workbook_part, &rels, kind, fallback)
        };

        let shared_strings = match related("sharedStrings", "xl/sharedStrings.xml") {
            Some(part) => SharedStrings::parse(&container.read_xml(&part)?)?,
            None => SharedStrings::default(),
        };

        let styles = match related("styles", "xl/styles.xml") {
            Some(part) => Styles::parse(&container.read_xml(&part)?),
            None => Styles::default(),
        };

        let workbook_xml = container.read_xml(&workbook_part)?;
        let (sheets, date_1904) = Self::parse_workbook(&workbook_xml, &workbook_part, &rels)?;
        log::debug!(
            "workbook lists {} sheets ({} date system)",
            sheets.len(),
            if date_1904 { 1904 } else { 1900 }
        );

        Ok(Self {
            container,
            format,
            shared_strings,
            styles,
            sheets,
            date_1904,
        })
    }

    /// Locate the workbook part through the package relationships.
    fn find_workbook_part(container: &OoxmlContainer) -> Result<String> {
        let package_rels = container.read_relationships("")?;
        let from_rels = package_rels
            .iter()
            .find(|r| r.kind() == "officeDocument" && !r.external)
            .map(|r| OoxmlContainer::resolve_path("", &r.target));

        match from_rels {
            Some(part) if container.exists(&part) => Ok(part),
            _ if container.exists(DEFAULT_WORKBOOK_PART) => Ok(DEFAULT_WORKBOOK_PART.to_string()),
            _ => Err(Error::CorruptData(
                "workbook part not found in package".to_string(),
            )),
        }
    }

    /// Find a part related to the workbook by kind, falling back to its usual path.
    fn related_part(
        container: &OoxmlContainer,
        workbook_part: &str,
        rels: &Relationships,
        kind: &str,
        fallback: &str,
    ) -> Option<String> {
        rels.iter()
            .find(|r| r.kind() == kind && !r.external)
            .map(|r| OoxmlContainer::resolve_path(workbook_part, &r.target))
            .filter(|part| container.exists(part))
            .or_else(|| container.exists(fallback).then(|| fallback.to_string()))
    }

    /// Parse workbook.xml for the sheet list, in tab order, and the date system.
    fn parse_workbook(
        xml: &str,
        workbook_part: &str,
        rels: &Relationships,
    ) -> Result<(Vec<SheetInfo>, bool)> {
        let mut sheets = Vec::new();
        let mut date_1904 = false;
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"workbookPr" => {
                    date_1904 = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"date1904")
                        .is_some_and(|a| matches!(a.value.as_ref(), b"1" | b"true"));
                }
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                    let mut name = String::new();
                    let mut state = SheetState::Visible;
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        let key = attr.key;
                        match (key.prefix().is_some(), key.local_name().as_ref()) {
                            (false, b"name") => {
                                name = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_else(|_| {
                                        String::from_utf8_lossy(&attr.value).into_owned()
                                    });
                            }
                            (false, b"state") => {
                                state =
                                    SheetState::from_attr(&String::from_utf8_lossy(&attr.value));
                            }
                            (true, b"id") => {
                                rel_id = String::from_utf8_lossy(&attr.value).into_owned();
                            }
                            _ => {}
                        }
                    }

                    if name.is_empty() {
                        return Err(Error::CorruptData(
                            "sheet entry without a name in workbook".to_string(),
                        ));
                    }

                    let rel = rels.get(&rel_id);
                    sheets.push(SheetInfo {
                        name,
                        state,
                        part: rel.map(|r| OoxmlContainer::resolve_path(workbook_part, &r.target)),
                        kind: rel.map(|r| r.kind().to_string()).unwrap_or_default(),
                    });
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date_1904))
    }

    /// Detected package format.
    pub fn format(&self) -> FormatType {
        self.format
    }

    /// Whether date serials count from 1904-01-01.
    pub fn is_1904(&self) -> bool {
        self.date_1904
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names in tab order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Sheet entries in tab order.
    pub fn sheet_infos(&self) -> &[SheetInfo] {
        &self.sheets
    }

    /// Document properties.
    pub fn metadata(&self) -> Metadata {
        self.container.parse_core_metadata()
    }

    /// Lazily load every sheet in tab order.
    pub fn sheets(&self) -> SheetIter<'_> {
        SheetIter {
            workbook: self,
            next: 0,
        }
    }

    /// Load one sheet by name.
    pub fn sheet(&self, name: &str) -> Result<Sheet> {
        let info = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;
        self.load(info)
    }

    fn load(&self, info: &SheetInfo) -> Result<Sheet> {
        let part = info.part.as_deref().ok_or_else(|| {
            Error::CorruptData(format!("sheet '{}' has no relationship target", info.name))
        })?;

        // Chartsheets hold no cells
        if info.kind == "chartsheet" || info.kind == "dialogsheet" {
            log::debug!("sheet '{}' is a {}, no cells", info.name, info.kind);
            return Ok(Sheet::new(info.name.clone()));
        }

        let xml = self.container.read_xml(part)?;
        let resolver = CellResolver {
            shared_strings: &self.shared_strings,
            styles: &self.styles,
            date_1904: self.date_1904,
        };
        let rows = resolver.parse_sheet(&xml).map_err(|e| match e {
            Error::CorruptData(msg) => {
                Error::CorruptData(format!("sheet '{}': {}", info.name, msg))
            }
            other => other,
        })?;

        log::debug!("loaded sheet '{}' ({} rows)", info.name, rows.len());
        Ok(Sheet::with_rows(info.name.clone(), rows))
    }
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("format", &self.format)
            .field("sheets", &self.sheet_names())
            .field("date_1904", &self.date_1904)
            .finish()
    }
}

/// Single-pass iterator over the sheets of a [`Workbook`].
pub struct SheetIter<'a> {
    workbook: &'a Workbook,
    next: usize,
}

impl Iterator for SheetIter<'_> {
    type Item = Result<Sheet>;

    fn next(&mut self) -> Option<Self::Item> {
        let info = self.workbook.sheets.get(self.next)?;
        self.next += 1;
        Some(self.workbook.load(info))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.workbook.sheets.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SheetIter<'_> {}
