//! PPTX (Office Open XML) reader for the deck-core presentation model.
//!
//! Parses .pptx files, which are ZIP archives containing XML parts, into an
//! owned [`deck_core::Presentation`]: slide size, slides in presentation
//! order, and each slide's top-level shapes with their text frames and tables.

mod package;
pub mod parser;
mod shapes;

pub use parser::PptxParser;
