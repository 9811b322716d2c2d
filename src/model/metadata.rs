//! Workbook document properties.

use serde::Serialize;

/// Properties read from `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    /// ISO 8601 creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// ISO 8601 modification timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}
