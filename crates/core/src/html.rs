//! HTML page rendering.
//!
//! Produces the index page, one overview page per slide, and the fragment
//! pages for shapes and table cells. Every page links `style.css` and every
//! piece of document text is escaped before it is interpolated.

use crate::types::{Presentation, Shape, ShapeContent, Slide, Table, TextFrame};
use quick_xml::escape::escape;

/// File name of the copied stylesheet.
pub const STYLESHEET_FILE: &str = "style.css";

/// File name of the index page.
pub const INDEX_FILE: &str = "index.html";

/// File name of a slide overview page.
pub fn slide_file(slide_id: usize) -> String {
    format!("slide_{}.html", slide_id)
}

/// File name of a shape fragment page.
pub fn fragment_file(slide_id: usize, shape_id: usize) -> String {
    format!("frag_{}_{}.html", slide_id, shape_id)
}

/// File name of a table cell fragment page.
pub fn cell_fragment_file(slide_id: usize, shape_id: usize, row: usize, col: usize) -> String {
    format!("frag_{}_{}_({},{}).html", slide_id, shape_id, row, col)
}

/// Renders the pages of one presentation.
#[derive(Debug, Clone)]
pub struct PageRenderer<'a> {
    presentation: &'a Presentation,
    /// Input path as shown on the index page.
    source_label: String,
    slide_width_px: i64,
    slide_height_px: i64,
}

impl<'a> PageRenderer<'a> {
    /// Create a renderer for a loaded presentation.
    pub fn new(presentation: &'a Presentation, source_label: impl Into<String>) -> Self {
        let (slide_width_px, slide_height_px) = presentation.slide_size_px();
        Self {
            presentation,
            source_label: source_label.into(),
            slide_width_px,
            slide_height_px,
        }
    }

    /// Slide size in pixels.
    pub fn slide_size_px(&self) -> (i64, i64) {
        (self.slide_width_px, self.slide_height_px)
    }

    /// Render `index.html`: the input path and one link per slide.
    pub fn index(&self) -> String {
        let mut body = format!(
            "<div>\n<p>Input File Path: {}</p>\n</div>\n<ol class='ppt-slides'>\n",
            escape(&self.source_label)
        );
        for slide_id in 0..self.presentation.slides.len() {
            body.push_str(&format!(
                "<li><a href='{}'>Slide #{}</a></li>\n",
                slide_file(slide_id),
                slide_id + 1
            ));
        }
        body.push_str("</ol>\n");
        page("Slides", &body)
    }

    /// Render `slide_{S}.html`: one positioned, linked rectangle per shape.
    pub fn slide_overview(&self, slide_id: usize, slide: &Slide) -> String {
        let mut body = format!(
            "<div class=\"slide\" style=\"width:{}px; height:{}px;\">\n",
            self.slide_width_px, self.slide_height_px
        );

        for (shape_id, shape) in slide.shapes.iter().enumerate() {
            let px = shape.geometry.to_px();
            body.push_str(&format!(
                "<a class='fragment-link' href='{}'>\
                 <div class=\"shape\" style=\"left:{}px; top:{}px; width:{}px; height:{}px;\">\n\
                 <p>Shape ID: {}<br>Type: {}</p>\n\
                 </div></a>\n",
                fragment_file(slide_id, shape_id),
                px.left,
                px.top,
                px.width,
                px.height,
                shape_id,
                escape(shape.shape_type.name())
            ));
        }

        body.push_str("</div>\n");
        body.push_str(&format!(
            "<div class=\"slide-footer\"><p class=\"slide-id\">Slide ID: {}</p>\
             <a href='{}'>Back to index</a></div>\n",
            slide_id, INDEX_FILE
        ));
        page(&format!("Slide #{}", slide_id + 1), &body)
    }

    /// Render `frag_{S}_{H}.html`, dispatching on what the shape carries.
    pub fn shape_fragment(&self, slide_id: usize, shape_id: usize, shape: &Shape) -> String {
        let mut body = breadcrumbs(&[
            (INDEX_FILE.to_string(), "Index".to_string()),
            (slide_file(slide_id), format!("Slide #{}", slide_id + 1)),
        ]);

        let header = format!("Slide / Shape ID: {}, {}", slide_id, shape_id);
        match &shape.content {
            ShapeContent::Text(frame) => body.push_str(&text_frame_markup(&header, frame)),
            ShapeContent::Table(table) => {
                body.push_str(&table_markup(&header, slide_id, shape_id, table))
            }
            ShapeContent::None => body.push_str(&format!(
                "<p class='unsupported'>Sorry, shape type: '{}' not supported yet.</p>\n",
                escape(shape.shape_type.name())
            )),
        }

        page(&format!("Slide #{} / Shape #{}", slide_id + 1, shape_id), &body)
    }

    /// Render `frag_{S}_{H}_({R},{C}).html` for one table cell.
    pub fn cell_fragment(
        &self,
        slide_id: usize,
        shape_id: usize,
        row: usize,
        col: usize,
        frame: &TextFrame,
    ) -> String {
        let mut body = breadcrumbs(&[
            (INDEX_FILE.to_string(), "Index".to_string()),
            (slide_file(slide_id), format!("Slide #{}", slide_id + 1)),
            (fragment_file(slide_id, shape_id), format!("Shape #{}", shape_id)),
        ]);
        let header = format!(
            "Slide / Shape / Cell ID: {}, {}, ({}, {})",
            slide_id, shape_id, row, col
        );
        body.push_str(&text_frame_markup(&header, frame));

        page(
            &format!(
                "Slide #{} / Shape #{} / Cell ({}, {})",
                slide_id + 1,
                shape_id,
                row,
                col
            ),
            &body,
        )
    }
}

/// Wrap a body in a complete document.
fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>\n<title>{}</title>\n\
         <link rel='stylesheet' href='{}'>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        STYLESHEET_FILE,
        body
    )
}

fn breadcrumbs(links: &[(String, String)]) -> String {
    let links: Vec<String> = links
        .iter()
        .map(|(href, label)| format!("<a href='{}'>{}</a>", href, escape(label.as_str())))
        .collect();
    format!("<nav class='breadcrumbs'>{}</nav>\n", links.join(" / "))
}

/// Nested paragraph and run blocks, in document order.
fn text_frame_markup(header: &str, frame: &TextFrame) -> String {
    let mut markup = format!(
        "<div class='text-frame'><p class='slide-shape-id'>{}</p>\n",
        escape(header)
    );
    for (para_id, para) in frame.paragraphs.iter().enumerate() {
        markup.push_str(&format!(
            "<div class='text-frame-para'><p class='para-id'>Para ID: {}</p>\n",
            para_id
        ));
        for (run_id, run) in para.runs.iter().enumerate() {
            markup.push_str(&format!(
                "<div class='text-frame-run'><p class='run-id'>Run ID: {}</p>\
                 <p class='run-text'>{}</p></div>\n",
                run_id,
                escape(run.text.as_str())
            ));
        }
        markup.push_str("</div>\n");
    }
    markup.push_str("</div>\n");
    markup
}

/// A `<table>` mirroring the grid. Spanned cells are covered by their
/// origin's colspan/rowspan and emit no `<td>`.
fn table_markup(header: &str, slide_id: usize, shape_id: usize, table: &Table) -> String {
    let mut markup = format!(
        "<div class='table'><p class='slide-shape-id'>{}</p>\n<table>\n",
        escape(header)
    );
    for (row_id, row) in table.rows.iter().enumerate() {
        markup.push_str("<tr>");
        for (col_id, cell) in row.cells.iter().enumerate() {
            if cell.is_spanned {
                continue;
            }
            markup.push_str(&format!(
                "<td colspan='{}' rowspan='{}'><a class='fragment-link' href='{}'>Cell ({}, {})</a>\
                 <p class='cell-text'>{}</p></td>",
                cell.span_width,
                cell.span_height,
                cell_fragment_file(slide_id, shape_id, row_id, col_id),
                row_id,
                col_id,
                escape(cell.text().as_str())
            ));
        }
        markup.push_str("</tr>\n");
    }
    markup.push_str("</table>\n</div>\n");
    markup
}
