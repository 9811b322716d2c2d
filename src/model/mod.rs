//! Workbook data model.
//!
//! Parsers fill a [`Sheet`] with a typed grid of [`CellValue`]s; a
//! [`Frame`] infers headers from that grid and a [`Preview`] keeps its
//! first rows for display.

mod cell;
mod metadata;
mod preview;
mod sheet;

pub use cell::*;
pub use metadata::*;
pub use preview::*;
pub use sheet::*;
