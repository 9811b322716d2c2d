//! End-to-end previews of generated workbooks.

mod common;

use common::*;
use sheetpeek::render::{JsonFormat, OutputFormat};
use sheetpeek::{
    detect_format_from_path, preview_workbook, CellValue, ErrorKind, FormatType, PreviewConfig,
    SheetState, Workbook,
};
use tempfile::TempDir;

fn people() -> WorkbookFixture {
    WorkbookFixture::new().sheet(
        "People",
        vec![
            vec![Text("Name"), Text("Age"), Text("Joined"), Text("Active")],
            vec![Text("Alice"), Num(30.0), Date(44197.0), Bool(true)],
            vec![Text("Bob"), Num(25.0), Date(44562.0), Bool(false)],
        ],
    )
}

fn numbered(n: usize) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![Text("id")]];
    rows.extend((0..n).map(|i| vec![Num(i as f64)]));
    rows
}

fn run(config: &PreviewConfig) -> (sheetpeek::Result<()>, String) {
    let mut out = Vec::new();
    let result = preview_workbook(config, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_single_sheet_text_output() {
    let dir = TempDir::new().unwrap();
    let path = people().write_to(dir.path(), "people.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();
    assert_eq!(
        output,
        "Sheet: People\n\
         \x20   Name  Age      Joined  Active\n\
         0  Alice   30  2021-01-01    True\n\
         1    Bob   25  2022-01-01   False\n"
    );
}

#[test]
fn test_sheets_in_tab_order() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet("Zeta", numbered(1))
        .sheet("Alpha", numbered(2))
        .write_to(dir.path(), "two.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();

    let headers: Vec<&str> = output.lines().filter(|l| l.starts_with("Sheet: ")).collect();
    assert_eq!(headers, vec!["Sheet: Zeta", "Sheet: Alpha"]);

    // Each header is immediately followed by that sheet's table
    assert_eq!(
        output,
        "Sheet: Zeta\n   id\n0   0\nSheet: Alpha\n   id\n0   0\n1   1\n"
    );
}

#[test]
fn test_short_sheet_shows_all_rows() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet("S", numbered(3))
        .write_to(dir.path(), "short.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();
    // header line, column line, three data rows
    assert_eq!(output.lines().count(), 5);
}

#[test]
fn test_long_sheet_capped_at_five_rows() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet("S", numbered(12))
        .write_to(dir.path(), "long.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[6], "4   4");
}

#[test]
fn test_configured_row_count() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet("S", numbered(12))
        .write_to(dir.path(), "long.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path).with_rows(10));
    result.unwrap();
    assert_eq!(output.lines().count(), 12);
}

#[test]
fn test_header_only_sheet() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet("Header", vec![vec![Text("Name"), Text("Age")]])
        .sheet("Blank", vec![])
        .write_to(dir.path(), "header.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();
    assert_eq!(
        output,
        "Sheet: Header\nEmpty DataFrame\nColumns: [Name, Age]\nIndex: []\n\
         Sheet: Blank\nEmpty DataFrame\nColumns: []\nIndex: []\n"
    );
}

#[test]
fn test_blank_cells_and_headers() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet(
            "Gaps",
            vec![
                vec![Text("a"), Blank, Text("a")],
                vec![Num(1.0), Text("x"), Blank],
            ],
        )
        .write_to(dir.path(), "gaps.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();
    assert_eq!(
        output,
        "Sheet: Gaps\n   a  Unnamed: 1  a.1\n0  1           x  NaN\n"
    );
}

#[test]
fn test_hidden_sheets_are_included() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet("Shown", numbered(1))
        .hidden_sheet("Secret", numbered(1))
        .write_to(dir.path(), "hidden.xlsx");

    let workbook = Workbook::open(&path).unwrap();
    assert_eq!(workbook.sheet_infos()[1].state, SheetState::Hidden);

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();
    assert!(output.contains("Sheet: Secret\n"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::FileNotFound);
    assert!(output.is_empty());
}

#[test]
fn test_text_file_with_xlsx_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fake.xlsx");
    std::fs::write(&path, "just some text, not a workbook\n").unwrap();

    let (result, output) = run(&PreviewConfig::new(&path));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::UnsupportedFormat);
    assert!(output.is_empty());
}

#[test]
fn test_word_document_rejected() {
    let parts = vec![
        (
            "[Content_Types].xml".to_string(),
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#.to_string(),
        ),
        ("word/document.xml".to_string(), "<document/>".to_string()),
    ];
    let err = Workbook::from_bytes(zip_parts(&parts)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
}

#[test]
fn test_corrupt_sheet_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let good = WorkbookFixture::new()
        .sheet("First", numbered(2))
        .sheet("Broken", numbered(2))
        .build();
    let broken = with_part(
        &good,
        "xl/worksheets/sheet2.xml",
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>99</v></c></row></sheetData></worksheet>"#,
    );
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, broken).unwrap();

    let (result, output) = run(&PreviewConfig::new(&path));
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptData);
    assert!(err.to_string().contains("Broken"));
    assert!(output.is_empty());
}

#[test]
fn test_truncated_archive() {
    let data = people().build();
    let err = Workbook::from_bytes(data[..data.len() / 2].to_vec()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptData);
}

#[test]
fn test_output_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet("A", numbered(7))
        .sheet("B", numbered(0))
        .write_to(dir.path(), "repeat.xlsx");
    let config = PreviewConfig::new(&path);

    let (first, a) = run(&config);
    let (second, b) = run(&config);
    first.unwrap();
    second.unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let path = people().write_to(dir.path(), "people.xlsx");
    let config =
        PreviewConfig::new(&path).with_format(OutputFormat::Json(JsonFormat::Compact));

    let (result, output) = run(&config);
    result.unwrap();
    assert!(output.ends_with('\n'));

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[0]["sheet"], "People");
    assert_eq!(value[0]["columns"][2], "Joined");
    assert_eq!(value[0]["rows"][0][0], "Alice");
    assert_eq!(value[0]["rows"][0][2], "2021-01-01");
    assert_eq!(value[0]["rows"][1][3], false);
    assert_eq!(value[0]["total_rows"], 2);
}

#[test]
fn test_workbook_api() {
    let workbook = Workbook::from_bytes(people().title("Roster").build()).unwrap();

    assert_eq!(workbook.format(), FormatType::Xlsx);
    assert!(!workbook.is_1904());
    assert_eq!(workbook.sheet_names(), vec!["People"]);
    assert_eq!(workbook.sheets().len(), 1);
    assert_eq!(workbook.metadata().title.as_deref(), Some("Roster"));
    assert_eq!(workbook.metadata().author.as_deref(), Some("fixture"));

    let sheet = workbook.sheet("People").unwrap();
    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.rows[1][0], CellValue::from("Alice"));
    assert_eq!(sheet.rows[2][3], CellValue::Bool(false));

    let err = workbook.sheet("Missing").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
}

#[test]
fn test_1904_date_system() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .date_1904()
        .sheet("Mac", vec![vec![Text("when")], vec![Date(43466.0)]])
        .write_to(dir.path(), "mac.xlsx");

    assert!(Workbook::open(&path).unwrap().is_1904());

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();
    assert_eq!(output, "Sheet: Mac\n         when\n0  2023-01-02\n");
}

#[test]
fn test_date_beyond_calendar_renders_serial() {
    let dir = TempDir::new().unwrap();
    let path = WorkbookFixture::new()
        .sheet("Wide", vec![vec![Text("v")], vec![Date(1.0e12)]])
        .write_to(dir.path(), "wide.xlsx");

    let (result, output) = run(&PreviewConfig::new(&path));
    result.unwrap();
    assert_eq!(output, "Sheet: Wide\n               v\n0  1000000000000\n");
}

#[test]
fn test_detect_format_from_path() {
    let dir = TempDir::new().unwrap();
    let path = people().write_to(dir.path(), "people.xlsx");
    assert_eq!(detect_format_from_path(&path).unwrap(), FormatType::Xlsx);

    let text = dir.path().join("notes.xlsx");
    std::fs::write(&text, "plain text").unwrap();
    assert_eq!(
        detect_format_from_path(&text).unwrap_err().kind(),
        ErrorKind::UnsupportedFormat
    );

    let missing = dir.path().join("missing.xlsx");
    assert_eq!(
        detect_format_from_path(&missing).unwrap_err().kind(),
        ErrorKind::FileNotFound
    );
}
