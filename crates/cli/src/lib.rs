//! Convert a PowerPoint presentation into a browsable set of static HTML
//! pages: an index, one overview per slide, and one fragment per shape and
//! per table cell.

pub mod converter;

pub use converter::{Converter, RunSummary, Stylesheet, BUNDLED_STYLESHEET, DEFAULT_OUTPUT_DIR};
pub use deck_core::{Error, Result};
