//! Core presentation model, EMU conversion, and HTML page rendering
//! for browsing a slide deck as static pages.

pub mod error;
pub mod html;
pub mod types;
pub mod units;

pub use error::{Error, Result};
pub use html::PageRenderer;
pub use types::{
    Cell, Geometry, Paragraph, Presentation, Run, Shape, ShapeContent, ShapeType, Slide, Table,
    TableRow, TextFrame,
};
pub use units::emu_to_px;
