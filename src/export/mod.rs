//! PDF export of the screenshot collection.
//!
//! This module provides:
//! - Page geometry: two images per A4 page with captions and page numbers
//! - The `lopdf` writer that turns an ordered list of records into a file

pub mod layout;
pub mod pdf;

pub use pdf::{export_pdf, ExportError, ExportSummary};
