//! Domain types for a loaded presentation.
//!
//! The model is built once by a reader backend and only borrowed afterwards;
//! nothing in the rendering path mutates it.

use crate::units::emu_to_px;
use std::fmt;

/// Represents an entire presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    /// Slide width in EMU, if the deck declares one.
    pub slide_width: Option<i64>,

    /// Slide height in EMU, if the deck declares one.
    pub slide_height: Option<i64>,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation with the given slide size.
    pub fn new(slide_width: Option<i64>, slide_height: Option<i64>) -> Self {
        Self {
            slide_width,
            slide_height,
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Slide size in pixels, treating an absent dimension as zero.
    pub fn slide_size_px(&self) -> (i64, i64) {
        (
            emu_to_px(self.slide_width.unwrap_or(0)),
            emu_to_px(self.slide_height.unwrap_or(0)),
        )
    }
}

/// A single slide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slide {
    /// Shapes in z-order, as they appear in the shape tree.
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create an empty slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape to this slide.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }
}

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Geometry {
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The same rectangle in pixels.
    pub fn to_px(self) -> Geometry {
        Geometry {
            left: emu_to_px(self.left),
            top: emu_to_px(self.top),
            width: emu_to_px(self.width),
            height: emu_to_px(self.height),
        }
    }
}

/// Category of a shape, as reported by the reader backend.
///
/// Only used for display; rendering dispatches on [`ShapeContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    AutoShape,
    TextBox,
    Placeholder,
    Freeform,
    Picture,
    Media,
    Table,
    Chart,
    /// SmartArt diagram.
    IgxGraphic,
    EmbeddedOleObject,
    Group,
    /// Connector.
    Line,
    ContentPart,
    Unknown,
}

impl ShapeType {
    /// Symbolic name shown on overview pages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AutoShape => "AUTO_SHAPE",
            Self::TextBox => "TEXT_BOX",
            Self::Placeholder => "PLACEHOLDER",
            Self::Freeform => "FREEFORM",
            Self::Picture => "PICTURE",
            Self::Media => "MEDIA",
            Self::Table => "TABLE",
            Self::Chart => "CHART",
            Self::IgxGraphic => "IGX_GRAPHIC",
            Self::EmbeddedOleObject => "EMBEDDED_OLE_OBJECT",
            Self::Group => "GROUP",
            Self::Line => "LINE",
            Self::ContentPart => "CONTENT_PART",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a shape carries besides its rectangle.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeContent {
    Text(TextFrame),
    Table(Table),
    None,
}

/// A positioned object on a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Name from the shape's non-visual properties.
    pub name: String,

    pub shape_type: ShapeType,

    pub geometry: Geometry,

    pub content: ShapeContent,
}

impl Shape {
    pub fn new(shape_type: ShapeType, geometry: Geometry, content: ShapeContent) -> Self {
        Self {
            name: String::new(),
            shape_type,
            geometry,
            content,
        }
    }

    pub fn has_text_frame(&self) -> bool {
        matches!(self.content, ShapeContent::Text(_))
    }

    pub fn has_table(&self) -> bool {
        matches!(self.content, ShapeContent::Table(_))
    }

    pub fn text_frame(&self) -> Option<&TextFrame> {
        match &self.content {
            ShapeContent::Text(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match &self.content {
            ShapeContent::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Ordered paragraphs of a shape or table cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// A frame holding a single empty paragraph, which is what a shape
    /// without a text body presents.
    pub fn empty() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
        }
    }

    /// Plain text of the frame, one line per paragraph.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A paragraph made of runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Smallest span of uniformly formatted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A grid of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row; rows of a well-formed table all have the same width.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }
}

/// One row of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

/// A table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text_frame: TextFrame,

    /// Columns covered by this cell, at least 1.
    pub span_width: u32,

    /// Rows covered by this cell, at least 1.
    pub span_height: u32,

    /// True when the cell is absorbed into another cell's merge.
    pub is_spanned: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            text_frame: TextFrame::empty(),
            span_width: 1,
            span_height: 1,
            is_spanned: false,
        }
    }
}

impl Cell {
    /// Create an unmerged cell with the given text frame.
    pub fn new(text_frame: TextFrame) -> Self {
        Self {
            text_frame,
            ..Self::default()
        }
    }

    /// Set the merge extent, clamping each span to at least 1.
    pub fn with_span(mut self, span_width: u32, span_height: u32) -> Self {
        self.span_width = span_width.max(1);
        self.span_height = span_height.max(1);
        self
    }

    /// Mark the cell as covered by another cell's merge.
    pub fn spanned(mut self) -> Self {
        self.is_spanned = true;
        self
    }

    /// True for the top-left cell of a merged region.
    pub fn is_merge_origin(&self) -> bool {
        !self.is_spanned && (self.span_width > 1 || self.span_height > 1)
    }

    pub fn text(&self) -> String {
        self.text_frame.text()
    }
}
