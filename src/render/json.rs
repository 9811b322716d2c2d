//! JSON renderer implementation.

use crate::error::Result;
use crate::model::Preview;

use super::options::JsonFormat;

/// Convert previews to a JSON array.
pub fn to_json(previews: &[Preview], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(previews)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(previews)?,
    };
    Ok(json)
}
