//! Spreadsheet format detection.

use crate::container::{decode_xml_bytes, read_file};
use crate::error::{Error, Result};
use std::io::{Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound file magic, used by legacy .xls and encrypted OOXML.
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the macro-enabled XLSM workbook part.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// Detected document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Excel workbook (.xlsx)
    Xlsx,
    /// Macro-enabled Excel workbook (.xlsm)
    Xlsm,
    /// Legacy binary Excel workbook or encrypted package (.xls)
    Xls,
    /// OpenDocument spreadsheet (.ods)
    Ods,
    /// Word document (.docx)
    Docx,
    /// PowerPoint presentation (.pptx)
    Pptx,
}

impl FormatType {
    /// Returns the usual file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "xlsx",
            FormatType::Xlsm => "xlsm",
            FormatType::Xls => "xls",
            FormatType::Ods => "ods",
            FormatType::Docx => "docx",
            FormatType::Pptx => "pptx",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Xlsm => "Excel Macro-Enabled Workbook",
            FormatType::Xls => "Excel 97-2003 Workbook or encrypted package",
            FormatType::Ods => "OpenDocument Spreadsheet",
            FormatType::Docx => "Word Document",
            FormatType::Pptx => "PowerPoint Presentation",
        }
    }

    /// Whether sheets of this format can be previewed.
    pub fn is_supported(&self) -> bool {
        matches!(self, FormatType::Xlsx | FormatType::Xlsm)
    }

    /// Fail with [`Error::UnsupportedFormat`] unless this format is supported.
    pub fn ensure_supported(self) -> Result<Self> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(Error::UnsupportedFormat(format!(
                "{} (.{})",
                self.name(),
                self.extension()
            )))
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format of a file.
///
/// # Example
///
/// ```no_run
/// use sheetpeek::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("book.xlsx")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), sheetpeek::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let data = read_file(path.as_ref())?;
    detect_format_from_bytes(&data)
}

/// Detect the format from file contents.
///
/// Anything that is neither a ZIP package nor a compound file is reported as
/// [`Error::UnsupportedFormat`].
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if data.starts_with(&CFB_MAGIC) {
        return Ok(FormatType::Xls);
    }
    if !is_zip_file(data) {
        return Err(Error::UnsupportedFormat(
            "not a spreadsheet file (no ZIP or compound file signature)".to_string(),
        ));
    }

    detect_format_from_reader(std::io::Cursor::new(data))
}

/// Detect the format from a reader over a ZIP package.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<FormatType> {
    // Damaged archives map to CorruptData
    let mut archive = zip::ZipArchive::new(reader)?;

    if let Some(mimetype) = read_entry(&mut archive, "mimetype") {
        if String::from_utf8_lossy(&mimetype).trim() == ODS_MIMETYPE {
            return Ok(FormatType::Ods);
        }
    }

    let content_types = match read_entry(&mut archive, "[Content_Types].xml") {
        Some(bytes) => decode_xml_bytes(&bytes)?,
        None => return detect_by_folder_structure(&mut archive),
    };

    if content_types.contains(XLSX_CONTENT_TYPE) {
        Ok(FormatType::Xlsx)
    } else if content_types.contains(XLSM_CONTENT_TYPE) {
        Ok(FormatType::Xlsm)
    } else if content_types.contains(DOCX_CONTENT_TYPE) {
        Ok(FormatType::Docx)
    } else if content_types.contains(PPTX_CONTENT_TYPE) {
        Ok(FormatType::Pptx)
    } else {
        detect_by_folder_structure(&mut archive)
    }
}

/// Read a whole archive entry, `None` if it is missing or unreadable.
fn read_entry<R: Read + Seek>(archive: &mut zip::ZipArchive<R>, name: &str) -> Option<Vec<u8>> {
    let mut file = archive.by_name(name).ok()?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).ok()?;
    Some(bytes)
}

/// Fallback detection by checking folder structure.
fn detect_by_folder_structure<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<FormatType> {
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    let has_word = names.iter().any(|n| n.starts_with("word/"));
    let has_xl = names.iter().any(|n| n.starts_with("xl/"));
    let has_ppt = names.iter().any(|n| n.starts_with("ppt/"));

    match (has_word, has_xl, has_ppt) {
        (true, false, false) => Ok(FormatType::Docx),
        (false, true, false) => Ok(FormatType::Xlsx),
        (false, false, true) => Ok(FormatType::Pptx),
        _ => Err(Error::UnsupportedFormat(
            "ZIP archive is not an Office workbook".to_string(),
        )),
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC)
}
