//! Output rendering for previews.
//!
//! # Example
//!
//! ```no_run
//! use sheetpeek::{load_previews, render::*, PreviewConfig};
//!
//! let previews = load_previews(&PreviewConfig::new("book.xlsx"))?;
//!
//! // Aligned text tables
//! let text = to_text(&previews, &RenderOptions::default());
//!
//! // JSON
//! let json = to_json(&previews, JsonFormat::Pretty)?;
//! # Ok::<(), sheetpeek::Error>(())
//! ```

mod json;
mod options;
mod text;

pub use json::to_json;
pub use options::{JsonFormat, OutputFormat, RenderOptions};
pub use text::{render_preview, render_table, to_text};

use crate::error::Result;
use crate::model::Preview;

/// Render previews in the format selected by `options`.
pub fn render(previews: &[Preview], options: &RenderOptions) -> Result<String> {
    match options.format {
        OutputFormat::Text => Ok(to_text(previews, options)),
        OutputFormat::Json(format) => {
            let mut json = to_json(previews, format)?;
            json.push('\n');
            Ok(json)
        }
    }
}
