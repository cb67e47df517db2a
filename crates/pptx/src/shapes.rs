//! Shape tree parsing for slides, layouts, and masters.
//!
//! Only the direct children of `p:spTree` become shapes. Group members stay
//! inside their group, which is reported as a single shape.

use deck_core::{
    Cell, Error, Geometry, Paragraph, Result, Run, Shape, ShapeContent, ShapeType, Table,
    TableRow, TextFrame,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

type XmlReader<'a> = Reader<&'a [u8]>;

/// Element kinds that make up a shape tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeElement {
    Sp,
    Pic,
    GraphicFrame,
    GrpSp,
    CxnSp,
    ContentPart,
}

impl ShapeElement {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::Sp),
            b"pic" => Some(Self::Pic),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::GrpSp),
            b"cxnSp" => Some(Self::CxnSp),
            b"contentPart" => Some(Self::ContentPart),
            _ => None,
        }
    }
}

/// `p:ph` of a placeholder shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaceholderRef {
    /// `type` attribute; `obj` when absent.
    pub kind: String,
    /// `idx` attribute; 0 when absent.
    pub idx: u32,
}

/// Transform fields a shape declares itself. Placeholders inherit each
/// missing field separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Transform {
    pub left: Option<i64>,
    pub top: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl Transform {
    /// True when all four fields are declared.
    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.top.is_some() && self.width.is_some() && self.height.is_some()
    }

    /// Fill the fields missing here from `base`.
    pub fn or(self, base: Transform) -> Transform {
        Transform {
            left: self.left.or(base.left),
            top: self.top.or(base.top),
            width: self.width.or(base.width),
            height: self.height.or(base.height),
        }
    }

    /// Geometry with undeclared fields as zero.
    pub fn to_geometry(self) -> Geometry {
        Geometry::new(
            self.left.unwrap_or(0),
            self.top.unwrap_or(0),
            self.width.unwrap_or(0),
            self.height.unwrap_or(0),
        )
    }
}

/// A shape as it appears in the part, before placeholder inheritance.
#[derive(Debug, Clone)]
pub(crate) struct ParsedShape {
    pub shape: Shape,
    /// The transform fields the shape declares itself.
    pub xfrm: Transform,
    pub placeholder: Option<PlaceholderRef>,
}

/// Parse the shape tree of a slide, layout, or master part.
pub(crate) fn parse_shape_tree(xml: &str) -> Result<Vec<ParsedShape>> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"spTree" => {
                return parse_tree_children(&mut reader);
            }
            Ok(Event::Eof) => return Ok(Vec::new()),
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
    }
}

fn parse_tree_children(reader: &mut XmlReader<'_>) -> Result<Vec<ParsedShape>> {
    let mut shapes = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                match ShapeElement::from_local_name(e.local_name().as_ref()) {
                    Some(kind) => {
                        let mut builder = ShapeBuilder::new(kind);
                        builder.parse_body(reader)?;
                        shapes.push(builder.finish());
                    }
                    // nvGrpSpPr, grpSpPr, mc:AlternateContent, extLst
                    None => skip(reader, e)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(kind) = ShapeElement::from_local_name(e.local_name().as_ref()) {
                    shapes.push(ShapeBuilder::new(kind).finish());
                }
            }
            Ok(Event::End(_)) => return Ok(shapes),
            Ok(Event::Eof) => return Err(unexpected_eof("spTree")),
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
    }
}

/// Accumulates what one shape element declares.
struct ShapeBuilder {
    kind: ShapeElement,
    name: Option<String>,
    text_box: bool,
    custom_geometry: bool,
    media: bool,
    placeholder: Option<PlaceholderRef>,
    xfrm: Transform,
    graphic_uri: Option<String>,
    text_frame: Option<TextFrame>,
    table: Option<Table>,
}

impl ShapeBuilder {
    fn new(kind: ShapeElement) -> Self {
        Self {
            kind,
            name: None,
            text_box: false,
            custom_geometry: false,
            media: false,
            placeholder: None,
            xfrm: Transform::default(),
            graphic_uri: None,
            text_frame: None,
            table: None,
        }
    }

    /// Consume events up to and including the shape's end tag.
    fn parse_body(&mut self, reader: &mut XmlReader<'_>) -> Result<()> {
        // Local names of the open elements below the shape element.
        let mut path: Vec<Vec<u8>> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let local = e.local_name();
                    let local = local.as_ref();

                    if ShapeElement::from_local_name(local).is_some() {
                        // group member
                        skip(reader, e)?;
                    } else if local == b"txBody" && self.kind == ShapeElement::Sp && path.is_empty() {
                        self.text_frame = Some(parse_text_body(reader)?);
                    } else if local == b"tbl" && self.kind == ShapeElement::GraphicFrame {
                        self.table = Some(parse_table(reader)?);
                    } else {
                        self.visit(e, &path);
                        path.push(local.to_vec());
                    }
                }
                Ok(Event::Empty(ref e)) => self.visit(e, &path),
                Ok(Event::End(_)) => {
                    if path.pop().is_none() {
                        return Ok(());
                    }
                }
                Ok(Event::Eof) => return Err(unexpected_eof("shape")),
                Err(e) => return Err(xml_error(reader, e)),
                _ => {}
            }
        }
    }

    /// Record the attributes of an element whose parent chain is `path`.
    fn visit(&mut self, e: &BytesStart<'_>, path: &[Vec<u8>]) {
        match e.local_name().as_ref() {
            b"cNvPr" if self.name.is_none() => {
                self.name = attr_string(e, b"name");
            }
            b"cNvSpPr" => {
                self.text_box = attr_string(e, b"txBox").is_some_and(|v| is_true(&v));
            }
            b"ph" => {
                self.placeholder = Some(PlaceholderRef {
                    kind: attr_string(e, b"type").unwrap_or_else(|| "obj".to_string()),
                    idx: attr_parse(e, b"idx").unwrap_or(0),
                });
            }
            b"off" if in_shape_xfrm(path) => {
                self.xfrm.left = attr_parse(e, b"x");
                self.xfrm.top = attr_parse(e, b"y");
            }
            b"ext" if in_shape_xfrm(path) => {
                self.xfrm.width = attr_parse(e, b"cx");
                self.xfrm.height = attr_parse(e, b"cy");
            }
            b"custGeom" => self.custom_geometry = true,
            b"videoFile" | b"audioFile" | b"quickTimeFile" => self.media = true,
            b"graphicData" => self.graphic_uri = attr_string(e, b"uri"),
            _ => {}
        }
    }

    fn shape_type(&self) -> ShapeType {
        if self.placeholder.is_some() && self.kind != ShapeElement::GrpSp {
            return ShapeType::Placeholder;
        }

        match self.kind {
            ShapeElement::Sp if self.text_box => ShapeType::TextBox,
            ShapeElement::Sp if self.custom_geometry => ShapeType::Freeform,
            ShapeElement::Sp => ShapeType::AutoShape,
            ShapeElement::Pic if self.media => ShapeType::Media,
            ShapeElement::Pic => ShapeType::Picture,
            ShapeElement::GraphicFrame => graphic_frame_type(self.graphic_uri.as_deref()),
            ShapeElement::GrpSp => ShapeType::Group,
            ShapeElement::CxnSp => ShapeType::Line,
            ShapeElement::ContentPart => ShapeType::ContentPart,
        }
    }

    fn finish(self) -> ParsedShape {
        let shape_type = self.shape_type();
        let content = match self.kind {
            // Every p:sp has a text frame; one without a body reads as a
            // single empty paragraph.
            ShapeElement::Sp => ShapeContent::Text(self.text_frame.unwrap_or_else(TextFrame::empty)),
            ShapeElement::GraphicFrame => match self.table {
                Some(table) => ShapeContent::Table(table),
                None => ShapeContent::None,
            },
            _ => ShapeContent::None,
        };

        let mut shape = Shape::new(shape_type, self.xfrm.to_geometry(), content);
        shape.name = self.name.unwrap_or_default();

        ParsedShape {
            shape,
            xfrm: self.xfrm,
            placeholder: self.placeholder,
        }
    }
}

/// True when the element being visited is the shape's own `xfrm`: a direct
/// child of the shape (graphic frames) or of its `spPr`/`grpSpPr`.
fn in_shape_xfrm(path: &[Vec<u8>]) -> bool {
    match path {
        [xfrm] => xfrm.as_slice() == b"xfrm",
        [props, xfrm] => {
            xfrm.as_slice() == b"xfrm"
                && (props.as_slice() == b"spPr" || props.as_slice() == b"grpSpPr")
        }
        _ => false,
    }
}

fn graphic_frame_type(uri: Option<&str>) -> ShapeType {
    match uri {
        Some(uri) if uri.ends_with("/table") => ShapeType::Table,
        Some(uri) if uri.ends_with("/chart") || uri.contains("chartex") => ShapeType::Chart,
        Some(uri) if uri.ends_with("/diagram") => ShapeType::IgxGraphic,
        Some(uri) if uri.ends_with("/ole") => ShapeType::EmbeddedOleObject,
        _ => ShapeType::Unknown,
    }
}

/// Parse `txBody` children up to its end tag.
fn parse_text_body(reader: &mut XmlReader<'_>) -> Result<TextFrame> {
    let mut frame = TextFrame::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"p" => {
                frame.paragraphs.push(parse_paragraph(reader)?);
            }
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"p" => {
                frame.paragraphs.push(Paragraph::default());
            }
            Ok(Event::Start(ref e)) => skip(reader, e)?,
            Ok(Event::End(_)) => return Ok(frame),
            Ok(Event::Eof) => return Err(unexpected_eof("txBody")),
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
    }
}

/// Runs are `a:r` only; fields and line breaks are not runs.
fn parse_paragraph(reader: &mut XmlReader<'_>) -> Result<Paragraph> {
    let mut paragraph = Paragraph::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"r" => {
                paragraph.runs.push(parse_run(reader)?);
            }
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"r" => {
                paragraph.runs.push(Run::default());
            }
            Ok(Event::Start(ref e)) => skip(reader, e)?,
            Ok(Event::End(_)) => return Ok(paragraph),
            Ok(Event::Eof) => return Err(unexpected_eof("p")),
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
    }
}

fn parse_run(reader: &mut XmlReader<'_>) -> Result<Run> {
    let mut run = Run::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"t" => {
                run.text.push_str(&read_text(reader)?);
            }
            Ok(Event::Start(ref e)) => skip(reader, e)?,
            Ok(Event::End(_)) => return Ok(run),
            Ok(Event::Eof) => return Err(unexpected_eof("r")),
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
    }
}

/// Character content of an `a:t`, whitespace preserved.
fn read_text(reader: &mut XmlReader<'_>) -> Result<String> {
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let unescaped = e.unescape().map_err(|e| xml_error(reader, e))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Start(ref e)) => skip(reader, e)?,
            Ok(Event::End(_)) => return Ok(text),
            Ok(Event::Eof) => return Err(unexpected_eof("t")),
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
    }
}

fn parse_table(reader: &mut XmlReader<'_>) -> Result<Table> {
    let mut table = Table::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"tr" => {
                table.rows.push(parse_row(reader)?);
            }
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"tr" => {
                table.rows.push(TableRow::default());
            }
            Ok(Event::Start(ref e)) => skip(reader, e)?,
            Ok(Event::End(_)) => return Ok(table),
            Ok(Event::Eof) => return Err(unexpected_eof("tbl")),
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
    }
}

fn parse_row(reader: &mut XmlReader<'_>) -> Result<TableRow> {
    let mut row = TableRow::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"tc" => {
                let text_frame = parse_cell_body(reader)?;
                row.cells.push(cell_from_attributes(e, text_frame));
            }
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"tc" => {
                row.cells.push(cell_from_attributes(e, TextFrame::empty()));
            }
            Ok(Event::Start(ref e)) => skip(reader, e)?,
            Ok(Event::End(_)) => return Ok(row),
            Ok(Event::Eof) => return Err(unexpected_eof("tr")),
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
    }
}

/// The text frame of an `a:tc`; a cell without a body has one empty paragraph.
fn parse_cell_body(reader: &mut XmlReader<'_>) -> Result<TextFrame> {
    let mut text_frame = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"txBody" => {
                text_frame = Some(parse_text_body(reader)?);
            }
            Ok(Event::Start(ref e)) => skip(reader, e)?,
            Ok(Event::End(_)) => return Ok(text_frame.unwrap_or_else(TextFrame::empty)),
            Ok(Event::Eof) => return Err(unexpected_eof("tc")),
            Err(e) => return Err(xml_error(reader, e)),
            _ => {}
        }
    }
}

fn cell_from_attributes(e: &BytesStart<'_>, text_frame: TextFrame) -> Cell {
    let cell = Cell::new(text_frame).with_span(
        attr_parse(e, b"gridSpan").unwrap_or(1),
        attr_parse(e, b"rowSpan").unwrap_or(1),
    );

    let merged = |key: &[u8]| attr_string(e, key).is_some_and(|v| is_true(&v));
    if merged(b"hMerge") || merged(b"vMerge") {
        cell.spanned()
    } else {
        cell
    }
}

/// Skip an element and everything inside it.
fn skip(reader: &mut XmlReader<'_>, e: &BytesStart<'_>) -> Result<()> {
    reader
        .read_to_end(e.name())
        .map(|_| ())
        .map_err(|err| xml_error(reader, err))
}

fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

fn attr_parse<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    let value = attr_string(e, key)?;
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!(
                "Ignoring unparseable {}=\"{}\"",
                String::from_utf8_lossy(key),
                value
            );
            None
        }
    }
}

fn is_true(value: &str) -> bool {
    value == "1" || value == "true"
}

fn xml_error(reader: &XmlReader<'_>, e: quick_xml::Error) -> Error {
    Error::XmlError(format!("{} at byte {}", e, reader.buffer_position()))
}

fn unexpected_eof(element: &str) -> Error {
    Error::XmlError(format!("Unexpected end of document inside <{}>", element))
}
