//! PPTX file parser implementation.

use crate::package::{rel_types, Package, Relationships, DEFAULT_PRESENTATION_PART};
use crate::shapes::{parse_shape_tree, ParsedShape, PlaceholderRef, Transform};
use deck_core::{Error, Presentation, Result, Slide};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Open and parse a .pptx file from disk.
    pub fn open(&self, path: &Path) -> Result<Presentation> {
        if !path.is_file() {
            return Err(Error::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        self.parse(BufReader::new(file))
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Presentation> {
        let mut package = Package::open(reader)?;

        let presentation_part = package
            .relationships("")?
            .first_of_type(rel_types::OFFICE_DOCUMENT)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string());
        log::debug!("Main presentation part: {}", presentation_part);

        let info = parse_presentation_part(&package.read_part(&presentation_part)?)?;
        let rels = package.relationships(&presentation_part)?;

        let mut presentation = Presentation::new(info.slide_width, info.slide_height);
        let mut templates = TemplateCache::default();

        for (idx, rel_id) in info.slide_rel_ids.iter().enumerate() {
            let slide_path = rels.target(rel_id).ok_or_else(|| {
                Error::CorruptedFile(format!("Slide relationship '{}' has no target", rel_id))
            })?;
            let slide = self.parse_slide(&mut package, slide_path, &mut templates)?;
            log::debug!(
                "Parsed slide {} ({}): {} shapes",
                idx,
                slide_path,
                slide.shapes.len()
            );
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Parse a single slide, resolving placeholder geometry from its layout
    /// and master.
    fn parse_slide<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        slide_path: &str,
        templates: &mut TemplateCache,
    ) -> Result<Slide> {
        let content = package.read_part(slide_path)?;
        let parsed = parse_shape_tree(&content)?;

        let needs_inheritance = parsed
            .iter()
            .any(|p| p.placeholder.is_some() && !p.xfrm.is_complete());
        let layout_path = if needs_inheritance {
            package
                .relationships(slide_path)?
                .first_of_type(rel_types::SLIDE_LAYOUT)
                .map(str::to_string)
        } else {
            None
        };

        let mut slide = Slide::new();
        for ParsedShape {
            mut shape,
            xfrm,
            placeholder,
        } in parsed
        {
            if let (false, Some(placeholder), Some(layout_path)) =
                (xfrm.is_complete(), placeholder.as_ref(), layout_path.as_deref())
            {
                let inherited = templates.inherited_transform(package, layout_path, placeholder)?;
                let resolved = xfrm.or(inherited);
                if !resolved.is_complete() {
                    log::debug!(
                        "Placeholder {} (idx {}) on {} has no full transform; missing fields are zero",
                        placeholder.kind,
                        placeholder.idx,
                        slide_path
                    );
                }
                shape.geometry = resolved.to_geometry();
            }
            slide.add_shape(shape);
        }

        Ok(slide)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// What the slide walk needs from `presentation.xml`.
#[derive(Debug, Default, PartialEq)]
struct PresentationInfo {
    slide_width: Option<i64>,
    slide_height: Option<i64>,
    /// `r:id` of each `p:sldId`, in presentation order.
    slide_rel_ids: Vec<String>,
}

fn parse_presentation_part(xml: &str) -> Result<PresentationInfo> {
    let mut reader = Reader::from_str(xml);
    let mut info = PresentationInfo::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"sldId" => {
                    // The prefixed r:id, not the numeric id
                    let rel_id = e.attributes().flatten().find(|attr| {
                        attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id"
                    });
                    match rel_id {
                        Some(attr) => info
                            .slide_rel_ids
                            .push(String::from_utf8_lossy(&attr.value).to_string()),
                        None => log::warn!("Skipping p:sldId without a relationship id"),
                    }
                }
                b"sldSz" => {
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value);
                        match attr.key.as_ref() {
                            b"cx" => info.slide_width = value.parse().ok(),
                            b"cy" => info.slide_height = value.parse().ok(),
                            _ => {}
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation part: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(info)
}

/// Placeholder of a layout or master with the transform it declares.
#[derive(Debug, Clone)]
struct TemplatePlaceholder {
    placeholder: PlaceholderRef,
    xfrm: Transform,
}

/// Placeholders of a layout or master part.
#[derive(Debug, Clone, Default)]
struct Template {
    placeholders: Vec<TemplatePlaceholder>,
    /// Master of a layout; `None` for masters.
    master: Option<String>,
}

/// Layouts and masters parsed so far, keyed by part name.
#[derive(Default)]
struct TemplateCache {
    templates: HashMap<String, Template>,
}

impl TemplateCache {
    /// Transform a slide placeholder inherits: fields from the layout
    /// placeholder with the same idx, with those still missing taken from the
    /// master placeholder of the matching type.
    fn inherited_transform<R: Read + Seek>(
        &mut self,
        package: &mut Package<R>,
        layout_path: &str,
        placeholder: &PlaceholderRef,
    ) -> Result<Transform> {
        let layout = self.load(package, layout_path, true)?.clone();
        let Some(layout_ph) = layout
            .placeholders
            .iter()
            .find(|p| p.placeholder.idx == placeholder.idx)
        else {
            return Ok(Transform::default());
        };
        if layout_ph.xfrm.is_complete() {
            return Ok(layout_ph.xfrm);
        }

        let Some(master_path) = layout.master.as_deref() else {
            return Ok(layout_ph.xfrm);
        };
        let master_kind = master_placeholder_kind(&layout_ph.placeholder.kind);
        let master = self.load(package, master_path, false)?;
        let master_xfrm = master
            .placeholders
            .iter()
            .find(|p| master_placeholder_kind(&p.placeholder.kind) == master_kind)
            .map(|p| p.xfrm)
            .unwrap_or_default();
        Ok(layout_ph.xfrm.or(master_xfrm))
    }

    fn load<R: Read + Seek>(
        &mut self,
        package: &mut Package<R>,
        path: &str,
        is_layout: bool,
    ) -> Result<&Template> {
        if !self.templates.contains_key(path) {
            let template = match package.read_optional_part(path)? {
                Some(xml) => {
                    let master = if is_layout {
                        relationship_target(package, path, rel_types::SLIDE_MASTER)?
                    } else {
                        None
                    };
                    Template {
                        placeholders: parse_shape_tree(&xml)?
                            .into_iter()
                            .filter_map(|p| {
                                p.placeholder.map(|placeholder| TemplatePlaceholder {
                                    placeholder,
                                    xfrm: p.xfrm,
                                })
                            })
                            .collect(),
                        master,
                    }
                }
                None => {
                    log::warn!("Template part '{}' is missing", path);
                    Template::default()
                }
            };
            log::debug!(
                "Loaded template {} with {} placeholders",
                path,
                template.placeholders.len()
            );
            self.templates.insert(path.to_string(), template);
        }

        self.templates
            .get(path)
            .ok_or_else(|| Error::CorruptedFile(format!("Template '{}' not cached", path)))
    }
}

fn relationship_target<R: Read + Seek>(
    package: &mut Package<R>,
    part: &str,
    rel_type: &str,
) -> Result<Option<String>> {
    let rels: Relationships = package.relationships(part)?;
    Ok(rels.first_of_type(rel_type).map(str::to_string))
}

/// Master placeholder type a layout placeholder of `kind` inherits from.
fn master_placeholder_kind(kind: &str) -> &str {
    match kind {
        "title" | "ctrTitle" => "title",
        "dt" => "dt",
        "ftr" => "ftr",
        "sldNum" => "sldNum",
        _ => "body",
    }
}
