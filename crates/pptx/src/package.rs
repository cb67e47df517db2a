//! OPC package access: ZIP parts and their relationships.

use deck_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

/// Relationship type suffixes this reader follows.
pub(crate) mod rel_types {
    pub const OFFICE_DOCUMENT: &str = "/officeDocument";
    pub const SLIDE_LAYOUT: &str = "/slideLayout";
    pub const SLIDE_MASTER: &str = "/slideMaster";
}

/// Default location of the main presentation part.
pub(crate) const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// An opened .pptx ZIP container.
pub(crate) struct Package<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        Ok(Self { archive })
    }

    /// Read a part that must exist.
    pub fn read_part(&mut self, path: &str) -> Result<String> {
        self.read_optional_part(path)?
            .ok_or_else(|| Error::CorruptedFile(format!("Missing part '{}'", path)))
    }

    /// Read a part, returning `None` when the archive has no such entry.
    pub fn read_optional_part(&mut self, path: &str) -> Result<Option<String>> {
        let mut file = match self.archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(Error::ZipError(format!(
                    "Failed to open '{}' in archive: {}",
                    path, e
                )))
            }
        };

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(Some(content))
    }

    /// Relationships of a part. A part without a `.rels` file has none.
    pub fn relationships(&mut self, part_path: &str) -> Result<Relationships> {
        let rels_path = rels_path_for(part_path);
        match self.read_optional_part(&rels_path)? {
            Some(xml) => Relationships::parse(&xml, part_path),
            None => Ok(Relationships::default()),
        }
    }
}

/// One `Relationship` entry with its target resolved to a part name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// The relationships declared by one part.
#[derive(Debug, Clone, Default)]
pub(crate) struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Parse a `.rels` document. Targets are resolved against `source_part`;
    /// external targets are dropped.
    pub fn parse(xml: &str, source_part: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut entries = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map_err(|e| Error::XmlError(format!("Bad relationship attribute: {}", e)))?
                            .into_owned();
                        match attr.key.as_ref() {
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"Id" => id = value,
                            b"TargetMode" => external = value == "External",
                            _ => {}
                        }
                    }

                    if !external {
                        entries.push(Relationship {
                            id,
                            rel_type,
                            target: resolve_target(source_part, &target),
                        });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships of '{}': {}",
                        source_part, e
                    )));
                }
                _ => {}
            }
        }

        Ok(Self { entries })
    }

    /// Target part of the relationship with the given id.
    pub fn target(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.target.as_str())
    }

    /// Target of the first relationship whose type URI ends with `suffix`.
    pub fn first_of_type(&self, suffix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|r| r.rel_type.ends_with(suffix))
            .map(|r| r.target.as_str())
    }
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
pub(crate) fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Resolve a relationship target relative to the directory of its source part.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize_part_name(absolute);
    }

    let base = source_part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    if base.is_empty() {
        normalize_part_name(target)
    } else {
        normalize_part_name(&format!("{}/{}", base, target))
    }
}

/// Collapse `.` and `..` segments.
fn normalize_part_name(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESENTATION_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_path_for("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
        assert_eq!(rels_path_for(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(resolve_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
    }

    #[test]
    fn test_parse_relationships() {
        let rels = Relationships::parse(PRESENTATION_RELS, "ppt/presentation.xml").unwrap();

        assert_eq!(rels.target("rId2"), Some("ppt/slides/slide1.xml"));
        assert_eq!(rels.target("rId3"), Some("ppt/slides/slide2.xml"));
        assert_eq!(
            rels.first_of_type(rel_types::SLIDE_MASTER),
            Some("ppt/slideMasters/slideMaster1.xml")
        );
        assert_eq!(rels.first_of_type(rel_types::SLIDE_LAYOUT), None);
        assert_eq!(rels.target("rId9"), None);
    }
}
