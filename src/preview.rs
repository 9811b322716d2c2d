//! The sheet previewer.

use crate::error::Result;
use crate::model::{Preview, DEFAULT_PREVIEW_ROWS};
use crate::path::resolve_home;
use crate::render::{self, OutputFormat, RenderOptions};
use crate::xlsx::Workbook;
use std::io::Write;
use std::path::PathBuf;

/// What to preview and how to print it.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Workbook location; a leading `~` is resolved against the home directory
    pub path: PathBuf,

    /// Data rows shown per sheet
    pub rows: usize,

    /// Output rendering
    pub render: RenderOptions,
}

impl PreviewConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rows: DEFAULT_PREVIEW_ROWS,
            render: RenderOptions::default(),
        }
    }

    /// Set the number of data rows shown per sheet.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.render.format = format;
        self
    }

    /// Set all render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

/// Build previews of every sheet of an opened workbook, in tab order.
///
/// Stops at the first sheet that fails to load.
pub fn preview_sheets(workbook: &Workbook, rows: usize) -> Result<Vec<Preview>> {
    workbook
        .sheets()
        .map(|sheet| sheet.map(|s| Preview::of(&s, rows)))
        .collect()
}

/// Open the configured workbook and preview all of its sheets.
///
/// The workbook is dropped before this returns.
pub fn load_previews(config: &PreviewConfig) -> Result<Vec<Preview>> {
    let path = resolve_home(&config.path)?;
    let workbook = Workbook::open(&path)?;
    log::info!(
        "previewing {} sheets of {}",
        workbook.sheet_count(),
        path.display()
    );
    preview_sheets(&workbook, config.rows)
}

/// Preview every sheet of the configured workbook into `out`.
///
/// All sheets are loaded before anything is written, so a failing sheet
/// leaves `out` untouched.
///
/// # Example
///
/// ```no_run
/// use sheetpeek::{preview_workbook, PreviewConfig};
///
/// let config = PreviewConfig::new("~/Downloads/teach.xlsx");
/// preview_workbook(&config, &mut std::io::stdout().lock())?;
/// # Ok::<(), sheetpeek::Error>(())
/// ```
pub fn preview_workbook<W: Write>(config: &PreviewConfig, out: &mut W) -> Result<()> {
    let previews = load_previews(config)?;
    let rendered = render::render(&previews, &config.render)?;
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
